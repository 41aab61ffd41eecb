use std::fmt::Write;

use crate::models::{HazardSummary, Report, ScoredRoute, Severity, Weather};
use crate::scoring;

/// Groups reports by problem type, most frequent first. Ties on count break
/// toward the worse severity.
pub fn summarize_hazards(reports: &[Report]) -> Vec<HazardSummary> {
    let mut map: std::collections::HashMap<_, (usize, Severity)> =
        std::collections::HashMap::new();

    for report in reports {
        let entry = map
            .entry(report.problem_type)
            .or_insert((0, Severity::Low));
        entry.0 += 1;
        entry.1 = entry.1.max(report.severity);
    }

    let mut summaries: Vec<HazardSummary> = map
        .into_iter()
        .map(|(problem_type, (count, worst_severity))| HazardSummary {
            problem_type,
            count,
            worst_severity,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(b.worst_severity.cmp(&a.worst_severity))
    });
    summaries
}

/// Builds a markdown comparison of the ranked routes with advisories and
/// the mix of hazards reported in the area.
pub fn build_summary(
    routes: &[ScoredRoute],
    reports: &[Report],
    weather: Option<&Weather>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Route Accessibility Summary");
    match weather {
        Some(weather) => {
            let _ = writeln!(
                output,
                "Conditions: {:?}, {:.0} degC",
                weather.condition, weather.temperature
            );
        }
        None => {
            let _ = writeln!(output, "Conditions: unavailable");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Ranked Routes");

    if routes.is_empty() {
        let _ = writeln!(output, "No candidate routes.");
    } else {
        for scored in routes {
            let _ = writeln!(
                output,
                "- {}: score {}/100, {:.1} km, {}",
                scored.route.kind,
                scored.accessibility_score,
                scored.route.distance,
                scored.route.duration
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Advisories");

    let summaries = summarize_hazards(reports);
    let mut advisories = routes
        .first()
        .map(|best| scoring::route_warnings(&best.route, reports, weather))
        .unwrap_or_default();
    for summary in &summaries {
        if scoring::should_avoid_route(weather, summary.problem_type) {
            advisories.push(format!(
                "Consider avoiding segments with {} hazards today",
                summary.problem_type
            ));
        }
    }
    if advisories.is_empty() {
        let _ = writeln!(output, "No advisories for current conditions.");
    } else {
        for advisory in &advisories {
            let _ = writeln!(output, "- {advisory}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Reported Hazards");
    if summaries.is_empty() {
        let _ = writeln!(output, "No hazards reported in this area.");
    } else {
        for summary in &summaries {
            let _ = writeln!(
                output,
                "- {}: {} report(s), worst severity {}",
                summary.problem_type, summary.count, summary.worst_severity
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisabilityType, ProblemType, Route, WeatherCondition};

    fn sample_report(problem_type: ProblemType, severity: Severity) -> Report {
        Report {
            id: "r".to_string(),
            latitude: 28.61,
            longitude: 77.2,
            problem_type,
            disability_types: vec![DisabilityType::Wheelchair],
            severity,
            description: "hazard".to_string(),
            photo: None,
        }
    }

    fn scored_route(kind: &str, score: u8) -> ScoredRoute {
        ScoredRoute {
            route: Route {
                coordinates: vec![[77.2, 28.6], [77.21, 28.61]],
                distance: 2.0,
                duration: "12 mins".to_string(),
                kind: kind.to_string(),
            },
            accessibility_score: score,
        }
    }

    #[test]
    fn hazards_group_by_type_with_worst_severity() {
        let reports = vec![
            sample_report(ProblemType::BrokenRamp, Severity::Medium),
            sample_report(ProblemType::BrokenRamp, Severity::Critical),
            sample_report(ProblemType::PoorLighting, Severity::Low),
        ];

        let summaries = summarize_hazards(&reports);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].problem_type, ProblemType::BrokenRamp);
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].worst_severity, Severity::Critical);
        assert_eq!(summaries[1].problem_type, ProblemType::PoorLighting);
    }

    #[test]
    fn summary_lists_routes_advisories_and_hazards() {
        let routes = vec![scored_route("safest", 96), scored_route("fastest", 80)];
        let reports = vec![sample_report(ProblemType::BlockedPath, Severity::Critical)];
        let weather = Weather {
            condition: WeatherCondition::Rain,
            temperature: 20.0,
        };

        let summary = build_summary(&routes, &reports, Some(&weather));
        assert!(summary.contains("# Route Accessibility Summary"));
        assert!(summary.contains("- safest: score 96/100"));
        assert!(summary.contains("- fastest: score 80/100"));
        assert!(summary.contains("1 critical accessibility issue(s) on route"));
        assert!(summary.contains("Rainy conditions - slippery surfaces possible"));
        assert!(summary.contains("- Blocked Path: 1 report(s), worst severity Critical"));
    }

    #[test]
    fn rain_flags_slippery_hazards_for_avoidance() {
        let routes = vec![scored_route("safest", 90)];
        let reports = vec![sample_report(ProblemType::SlipperySurface, Severity::Medium)];
        let weather = Weather {
            condition: WeatherCondition::Rain,
            temperature: 18.0,
        };

        let summary = build_summary(&routes, &reports, Some(&weather));
        assert!(summary.contains("Consider avoiding segments with Slippery Surface hazards today"));
    }

    #[test]
    fn empty_inputs_render_placeholders() {
        let summary = build_summary(&[], &[], None);
        assert!(summary.contains("No candidate routes."));
        assert!(summary.contains("No advisories for current conditions."));
        assert!(summary.contains("No hazards reported in this area."));
        assert!(summary.contains("Conditions: unavailable"));
    }
}
