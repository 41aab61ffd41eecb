use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Upper bound on report descriptions; longer text is clamped by callers
/// before a draft is built.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Hazard impact classification, ordered by impact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of accessibility hazard a user can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ProblemType {
    #[serde(rename = "Broken Ramp")]
    BrokenRamp,
    #[serde(rename = "Steep Slope")]
    SteepSlope,
    #[serde(rename = "Slippery Surface")]
    SlipperySurface,
    #[serde(rename = "No Sidewalk")]
    NoSidewalk,
    #[serde(rename = "Narrow Path")]
    NarrowPath,
    #[serde(rename = "Poor Lighting")]
    PoorLighting,
    #[serde(rename = "Blocked Path")]
    BlockedPath,
    #[serde(rename = "Missing Tactile Paving")]
    MissingTactilePaving,
    Other,
}

impl ProblemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::BrokenRamp => "Broken Ramp",
            ProblemType::SteepSlope => "Steep Slope",
            ProblemType::SlipperySurface => "Slippery Surface",
            ProblemType::NoSidewalk => "No Sidewalk",
            ProblemType::NarrowPath => "Narrow Path",
            ProblemType::PoorLighting => "Poor Lighting",
            ProblemType::BlockedPath => "Blocked Path",
            ProblemType::MissingTactilePaving => "Missing Tactile Paving",
            ProblemType::Other => "Other",
        }
    }
}

impl std::fmt::Display for ProblemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disability tags a report can be marked as affecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum DisabilityType {
    Wheelchair,
    #[serde(rename = "Visual Impairment")]
    VisualImpairment,
    #[serde(rename = "Hearing Impairment")]
    HearingImpairment,
    #[serde(rename = "Mobility Issues")]
    MobilityIssues,
    #[serde(rename = "Cognitive Disabilities")]
    CognitiveDisabilities,
}

impl DisabilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisabilityType::Wheelchair => "Wheelchair",
            DisabilityType::VisualImpairment => "Visual Impairment",
            DisabilityType::HearingImpairment => "Hearing Impairment",
            DisabilityType::MobilityIssues => "Mobility Issues",
            DisabilityType::CognitiveDisabilities => "Cognitive Disabilities",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "Wheelchair" => Some(DisabilityType::Wheelchair),
            "Visual Impairment" => Some(DisabilityType::VisualImpairment),
            "Hearing Impairment" => Some(DisabilityType::HearingImpairment),
            "Mobility Issues" => Some(DisabilityType::MobilityIssues),
            "Cognitive Disabilities" => Some(DisabilityType::CognitiveDisabilities),
            _ => None,
        }
    }
}

impl std::fmt::Display for DisabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A hazard report as entered by the user, before it has been accepted by
/// the remote service or assigned a queue timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub location: Coordinates,
    pub problem_type: ProblemType,
    pub disability_types: Vec<DisabilityType>,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A draft waiting in the offline queue. The timestamp is assigned at
/// enqueue time and is the entry's identity for removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReport {
    #[serde(flatten)]
    pub report: ReportDraft,
    pub timestamp: i64,
}

/// A report confirmed by the remote service. The service flattens the
/// location into top-level latitude/longitude fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub problem_type: ProblemType,
    pub disability_types: Vec<DisabilityType>,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A candidate path between two points. Coordinates are (longitude,
/// latitude) pairs and must describe a polyline of at least two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub coordinates: Vec<[f64; 2]>,
    pub distance: f64,
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A route augmented with its derived accessibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    #[serde(flatten)]
    pub route: Route,
    pub accessibility_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Fog,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub condition: WeatherCondition,
    pub temperature: f64,
}

/// Routing profile the user navigates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisabilityProfile {
    Wheelchair,
    Visual,
    Hearing,
    Mobility,
}

/// Preferences persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub disability_profile: DisabilityProfile,
}

/// Aggregate of the reports sharing a problem type, for the summary output.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardSummary {
    pub problem_type: ProblemType,
    pub count: usize,
    pub worst_severity: Severity,
}
