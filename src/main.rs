use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

mod api;
mod models;
mod queue;
mod report;
mod scoring;
mod store;
mod sync;

use api::{Connectivity, HttpReportApi, ProbeConnectivity, ReportApi, StaticConnectivity};
use models::{
    Coordinates, DisabilityProfile, DisabilityType, ProblemType, Report, ReportDraft, Route,
    Severity, UserPreferences, Weather, WeatherCondition, MAX_DESCRIPTION_CHARS,
};
use queue::ReportQueue;
use store::SqliteStore;

#[derive(Parser)]
#[command(name = "saarthi")]
#[command(about = "Accessibility route scoring and offline hazard reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidate routes by accessibility score
    Score {
        /// JSON file with the candidate routes
        #[arg(long)]
        routes: PathBuf,
        /// CSV file with hazard reports near the routes
        #[arg(long)]
        reports: Option<PathBuf>,
        /// Fetch hazard reports and weather from the remote service
        #[arg(long, default_value_t = false)]
        from_api: bool,
        /// Narrow fetched reports to these disability tags; repeatable
        #[arg(long = "for-disability")]
        for_disability: Vec<DisabilityType>,
        #[arg(long)]
        condition: Option<WeatherCondition>,
        #[arg(long)]
        temperature: Option<f64>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Write a markdown route accessibility summary
    Report {
        #[arg(long)]
        routes: PathBuf,
        #[arg(long)]
        reports: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        from_api: bool,
        #[arg(long = "for-disability")]
        for_disability: Vec<DisabilityType>,
        #[arg(long)]
        condition: Option<WeatherCondition>,
        #[arg(long)]
        temperature: Option<f64>,
        #[arg(long, default_value = "summary.md")]
        out: PathBuf,
    },
    /// Submit a hazard report, queueing it offline when needed
    Submit {
        #[arg(long)]
        latitude: f64,
        #[arg(long)]
        longitude: f64,
        #[arg(long)]
        problem_type: ProblemType,
        /// Affected disability tags; repeat for more than one
        #[arg(long = "disability-type", required = true)]
        disability_types: Vec<DisabilityType>,
        #[arg(long, default_value = "medium")]
        severity: Severity,
        #[arg(long)]
        description: String,
        /// URI of a locally captured photo
        #[arg(long)]
        photo: Option<String>,
        /// Skip the connectivity probe and queue directly
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// List reports waiting in the offline queue
    Pending,
    /// Remove a pending report by its queue timestamp
    Remove {
        #[arg(long)]
        timestamp: i64,
    },
    /// Drop every pending report
    Clear,
    /// Push pending reports to the remote service
    Sync,
    /// Show or set the saved disability profile
    Profile {
        #[arg(long)]
        set: Option<DisabilityProfile>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let db_path = std::env::var("SAARTHI_DB").unwrap_or_else(|_| "saarthi.db".to_string());
    let api_url =
        std::env::var("SAARTHI_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let api_token = std::env::var("SAARTHI_API_TOKEN").ok();

    let store = SqliteStore::open(&db_path)
        .await
        .with_context(|| format!("failed to open local store at {db_path}"))?;
    let queue = ReportQueue::new(store);

    match cli.command {
        Commands::Score {
            routes,
            reports,
            from_api,
            for_disability,
            condition,
            temperature,
            limit,
        } => {
            let routes = load_routes(&routes)?;
            let api = HttpReportApi::new(&api_url, api_token)?;
            let (reports, weather) = scoring_context(
                reports.as_deref(),
                from_api,
                &for_disability,
                &api,
                condition,
                temperature,
                &routes,
            )
            .await?;

            let ranked = scoring::rank_routes(&routes, &reports, weather.as_ref());
            if ranked.is_empty() {
                println!("No candidate routes.");
                return Ok(());
            }

            println!("Routes by accessibility score:");
            for scored in ranked.iter().take(limit) {
                println!(
                    "- {}: {}/100 ({:.1} km, {})",
                    scored.route.kind,
                    scored.accessibility_score,
                    scored.route.distance,
                    scored.route.duration
                );
            }
            if let Some(best) = ranked.first() {
                for warning in scoring::route_warnings(&best.route, &reports, weather.as_ref()) {
                    println!("  ! {warning}");
                }
            }
        }
        Commands::Report {
            routes,
            reports,
            from_api,
            for_disability,
            condition,
            temperature,
            out,
        } => {
            let routes = load_routes(&routes)?;
            let api = HttpReportApi::new(&api_url, api_token)?;
            let (reports, weather) = scoring_context(
                reports.as_deref(),
                from_api,
                &for_disability,
                &api,
                condition,
                temperature,
                &routes,
            )
            .await?;

            let ranked = scoring::rank_routes(&routes, &reports, weather.as_ref());
            let summary = report::build_summary(&ranked, &reports, weather.as_ref());
            std::fs::write(&out, summary)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Summary written to {}.", out.display());
        }
        Commands::Submit {
            latitude,
            longitude,
            problem_type,
            disability_types,
            severity,
            description,
            photo,
            offline,
        } => {
            let draft = ReportDraft {
                location: Coordinates {
                    latitude,
                    longitude,
                },
                problem_type,
                disability_types,
                severity,
                description: clamp_description(&description),
                photo,
            };

            let api = HttpReportApi::new(&api_url, api_token)?;
            let connected = if offline {
                false
            } else {
                ProbeConnectivity::new(&api_url)?.is_connected().await
            };

            match sync::submit_report(&queue, &api, &StaticConnectivity(connected), draft).await {
                sync::SubmissionOutcome::Submitted(report) => {
                    println!("Report submitted (id {}).", report.id);
                }
                sync::SubmissionOutcome::SavedOffline => {
                    println!("Saved offline. It will be submitted on the next sync.");
                }
                sync::SubmissionOutcome::NotSaved => {
                    anyhow::bail!("report could not be submitted or saved offline");
                }
            }
        }
        Commands::Pending => {
            let pending = queue.pending_reports().await;
            if pending.is_empty() {
                println!("No pending reports.");
                return Ok(());
            }
            println!("Pending reports:");
            for entry in &pending {
                println!(
                    "- [{}] {} ({}) at {:.5}, {:.5}: {}",
                    entry.timestamp,
                    entry.report.problem_type,
                    entry.report.severity,
                    entry.report.location.latitude,
                    entry.report.location.longitude,
                    entry.report.description
                );
            }
        }
        Commands::Remove { timestamp } => {
            if !queue.remove_pending(timestamp).await {
                anyhow::bail!("failed to update the pending queue");
            }
            println!("Removed entries queued at {timestamp}.");
        }
        Commands::Clear => {
            if !queue.clear_pending().await {
                anyhow::bail!("failed to clear the pending queue");
            }
            println!("Pending queue cleared.");
        }
        Commands::Sync => {
            let api = HttpReportApi::new(&api_url, api_token)?;
            let outcome = sync::sync_pending_reports(&queue, &api).await;
            println!(
                "{} report(s) synced, {} still pending.",
                outcome.synced,
                queue.pending_reports().await.len()
            );
        }
        Commands::Profile { set } => match set {
            Some(profile) => {
                let preferences = UserPreferences {
                    disability_profile: profile,
                };
                if !queue.save_preferences(&preferences).await {
                    anyhow::bail!("failed to save preferences");
                }
                println!("Profile saved.");
            }
            None => match queue.preferences().await {
                Some(preferences) => {
                    println!("Current profile: {:?}", preferences.disability_profile);
                }
                None => println!("No profile saved."),
            },
        },
    }

    Ok(())
}

fn load_routes(path: &Path) -> anyhow::Result<Vec<Route>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let routes: Vec<Route> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid routes in {}", path.display()))?;
    Ok(routes)
}

fn load_reports_csv(path: &Path) -> anyhow::Result<Vec<Report>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: Option<String>,
        latitude: f64,
        longitude: f64,
        problem_type: ProblemType,
        // Semicolon-separated display names, e.g. "Wheelchair;Mobility Issues"
        disability_types: String,
        severity: Severity,
        description: String,
        photo: Option<String>,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut reports = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("bad row {} in {}", index + 1, path.display()))?;
        let disability_types = row
            .disability_types
            .split(';')
            .filter(|name| !name.trim().is_empty())
            .map(|name| {
                DisabilityType::from_name(name)
                    .with_context(|| format!("unknown disability type {name:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        reports.push(Report {
            id: row.id.unwrap_or_else(|| format!("local-{}", index + 1)),
            latitude: row.latitude,
            longitude: row.longitude,
            problem_type: row.problem_type,
            disability_types,
            severity: row.severity,
            description: row.description,
            photo: row.photo,
        });
    }

    Ok(reports)
}

/// Resolves the hazard reports and weather a scoring command runs against:
/// an explicit CSV or the live service for reports, explicit flags or the
/// live service for weather.
async fn scoring_context(
    reports_csv: Option<&Path>,
    from_api: bool,
    for_disability: &[DisabilityType],
    api: &HttpReportApi,
    condition: Option<WeatherCondition>,
    temperature: Option<f64>,
    routes: &[Route],
) -> anyhow::Result<(Vec<Report>, Option<Weather>)> {
    let reports = match reports_csv {
        Some(path) => load_reports_csv(path)?,
        None if from_api => api
            .list(for_disability)
            .await
            .context("failed to fetch reports")?,
        None => Vec::new(),
    };

    let weather = match (condition, temperature) {
        (Some(condition), Some(temperature)) => Some(Weather {
            condition,
            temperature,
        }),
        (None, None) => match routes.first().and_then(|route| route.coordinates.first()) {
            Some([longitude, latitude]) if from_api => {
                api.current_weather(*latitude, *longitude).await
            }
            _ => None,
        },
        _ => anyhow::bail!("--condition and --temperature must be given together"),
    };

    Ok((reports, weather))
}

fn clamp_description(description: &str) -> String {
    description.chars().take(MAX_DESCRIPTION_CHARS).collect()
}
