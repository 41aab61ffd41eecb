use crate::models::{
    ProblemType, Report, Route, ScoredRoute, Severity, Weather, WeatherCondition,
};

const DISTANCE_PENALTY_CAP: f64 = 20.0;
const WEATHER_PENALTY: f64 = 5.0;
const HOT_THRESHOLD_C: f64 = 35.0;
const COLD_THRESHOLD_C: f64 = 5.0;

/// Scores a route from 0 (hostile) to 100 (clear), starting at 100 and
/// subtracting penalties for distance, reported hazards, and weather.
///
/// Low-severity hazards carry no penalty; they are informational only.
pub fn calculate_route_score(route: &Route, reports: &[Report], weather: Option<&Weather>) -> u8 {
    let mut score = 100.0;

    score -= (route.distance / 5.0 * 10.0).min(DISTANCE_PENALTY_CAP);

    for report in reports {
        score -= match report.severity {
            Severity::Critical => 15.0,
            Severity::High => 10.0,
            Severity::Medium => 5.0,
            Severity::Low => 0.0,
        };
    }

    if let Some(weather) = weather {
        if weather.condition == WeatherCondition::Rain {
            score -= WEATHER_PENALTY;
        }
        if weather.temperature > HOT_THRESHOLD_C {
            score -= WEATHER_PENALTY;
        }
        if weather.temperature < COLD_THRESHOLD_C {
            score -= WEATHER_PENALTY;
        }
    }

    score.round().clamp(0.0, 100.0) as u8
}

/// Scores every route against the shared hazard/weather context and sorts
/// descending by score. The sort is stable, so routes with equal scores keep
/// their input order.
pub fn rank_routes(routes: &[Route], reports: &[Report], weather: Option<&Weather>) -> Vec<ScoredRoute> {
    let mut scored: Vec<ScoredRoute> = routes
        .iter()
        .map(|route| ScoredRoute {
            route: route.clone(),
            accessibility_score: calculate_route_score(route, reports, weather),
        })
        .collect();

    scored.sort_by(|a, b| b.accessibility_score.cmp(&a.accessibility_score));
    scored
}

/// Human-readable advisories for a route, in fixed display order:
/// critical-hazard count, then rain, then heat.
///
/// The report list is the same global list used for scoring; it is not
/// filtered down to reports near this route's polyline.
pub fn route_warnings(_route: &Route, reports: &[Report], weather: Option<&Weather>) -> Vec<String> {
    let mut warnings = Vec::new();

    let critical = reports
        .iter()
        .filter(|r| r.severity == Severity::Critical)
        .count();
    if critical > 0 {
        warnings.push(format!("{critical} critical accessibility issue(s) on route"));
    }

    if let Some(weather) = weather {
        if weather.condition == WeatherCondition::Rain {
            warnings.push("Rainy conditions - slippery surfaces possible".to_string());
        }
        if weather.temperature > HOT_THRESHOLD_C {
            warnings.push("High temperature - limited shade available".to_string());
        }
    }

    warnings
}

/// Whether current weather makes a particular hazard type worth routing
/// around entirely.
pub fn should_avoid_route(weather: Option<&Weather>, problem_type: ProblemType) -> bool {
    let Some(weather) = weather else {
        return false;
    };

    if weather.condition == WeatherCondition::Rain && problem_type == ProblemType::SlipperySurface {
        return true;
    }

    weather.temperature > HOT_THRESHOLD_C && problem_type == ProblemType::NoSidewalk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisabilityType;

    fn sample_route(distance: f64, kind: &str) -> Route {
        Route {
            coordinates: vec![[77.2, 28.6], [77.21, 28.61]],
            distance,
            duration: "12 mins".to_string(),
            kind: kind.to_string(),
        }
    }

    fn sample_report(severity: Severity) -> Report {
        Report {
            id: "r-1".to_string(),
            latitude: 28.61,
            longitude: 77.205,
            problem_type: ProblemType::BrokenRamp,
            disability_types: vec![DisabilityType::Wheelchair],
            severity,
            description: "ramp unusable".to_string(),
            photo: None,
        }
    }

    #[test]
    fn short_clear_route_scores_ninety_six() {
        let route = sample_route(2.0, "fastest");
        assert_eq!(calculate_route_score(&route, &[], None), 96);
    }

    #[test]
    fn distance_penalty_caps_at_twenty() {
        let at_cap = sample_route(10.0, "fastest");
        let beyond_cap = sample_route(42.0, "fastest");
        assert_eq!(calculate_route_score(&at_cap, &[], None), 80);
        assert_eq!(calculate_route_score(&beyond_cap, &[], None), 80);
    }

    #[test]
    fn hazards_and_rain_stack_penalties() {
        let route = sample_route(12.0, "fastest");
        let reports = vec![
            sample_report(Severity::Critical),
            sample_report(Severity::High),
        ];
        let weather = Weather {
            condition: WeatherCondition::Rain,
            temperature: 20.0,
        };
        assert_eq!(calculate_route_score(&route, &reports, Some(&weather)), 50);
    }

    #[test]
    fn low_severity_reports_are_free() {
        let route = sample_route(2.0, "fastest");
        let reports = vec![sample_report(Severity::Low), sample_report(Severity::Low)];
        assert_eq!(calculate_route_score(&route, &reports, None), 96);
    }

    #[test]
    fn temperature_extremes_each_cost_five() {
        let route = sample_route(0.0, "fastest");
        let hot = Weather {
            condition: WeatherCondition::Clear,
            temperature: 36.0,
        };
        let cold = Weather {
            condition: WeatherCondition::Clear,
            temperature: 2.0,
        };
        assert_eq!(calculate_route_score(&route, &[], Some(&hot)), 95);
        assert_eq!(calculate_route_score(&route, &[], Some(&cold)), 95);
    }

    #[test]
    fn hot_rain_penalties_combine() {
        let route = sample_route(0.0, "fastest");
        let weather = Weather {
            condition: WeatherCondition::Rain,
            temperature: 38.0,
        };
        assert_eq!(calculate_route_score(&route, &[], Some(&weather)), 90);
    }

    #[test]
    fn score_floors_at_zero() {
        let route = sample_route(50.0, "fastest");
        let reports: Vec<Report> = (0..8).map(|_| sample_report(Severity::Critical)).collect();
        assert_eq!(calculate_route_score(&route, &reports, None), 0);
    }

    #[test]
    fn ranking_sorts_descending() {
        let routes = vec![
            sample_route(12.0, "fastest"),
            sample_route(2.0, "safest"),
            sample_route(6.0, "route_3"),
        ];
        let ranked = rank_routes(&routes, &[], None);
        assert_eq!(ranked[0].route.kind, "safest");
        assert_eq!(ranked[1].route.kind, "route_3");
        assert_eq!(ranked[2].route.kind, "fastest");
        assert!(ranked[0].accessibility_score >= ranked[1].accessibility_score);
    }

    #[test]
    fn ranking_keeps_input_order_on_ties() {
        let routes = vec![
            sample_route(3.0, "route_1"),
            sample_route(3.0, "route_2"),
            sample_route(3.0, "route_3"),
        ];
        let ranked = rank_routes(&routes, &[], None);
        let kinds: Vec<&str> = ranked.iter().map(|r| r.route.kind.as_str()).collect();
        assert_eq!(kinds, ["route_1", "route_2", "route_3"]);
    }

    #[test]
    fn ranking_does_not_mutate_inputs() {
        let routes = vec![sample_route(2.0, "fastest")];
        let snapshot = routes.clone();
        let _ = rank_routes(&routes, &[], None);
        assert_eq!(routes, snapshot);
    }

    #[test]
    fn warnings_emit_in_fixed_order() {
        let route = sample_route(2.0, "fastest");
        let reports = vec![sample_report(Severity::Critical)];
        let weather = Weather {
            condition: WeatherCondition::Clear,
            temperature: 36.0,
        };
        let warnings = route_warnings(&route, &reports, Some(&weather));
        assert_eq!(
            warnings,
            [
                "1 critical accessibility issue(s) on route",
                "High temperature - limited shade available",
            ]
        );
    }

    #[test]
    fn clear_conditions_yield_no_warnings() {
        let route = sample_route(2.0, "fastest");
        let weather = Weather {
            condition: WeatherCondition::Clear,
            temperature: 22.0,
        };
        assert!(route_warnings(&route, &[], Some(&weather)).is_empty());
        assert!(route_warnings(&route, &[], None).is_empty());
    }

    #[test]
    fn avoids_slippery_hazards_in_rain() {
        let rain = Weather {
            condition: WeatherCondition::Rain,
            temperature: 20.0,
        };
        assert!(should_avoid_route(Some(&rain), ProblemType::SlipperySurface));
        assert!(!should_avoid_route(Some(&rain), ProblemType::BrokenRamp));
        assert!(!should_avoid_route(None, ProblemType::SlipperySurface));
    }
}
