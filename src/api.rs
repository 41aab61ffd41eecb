use std::time::Duration;

use async_trait::async_trait;
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::models::{DisabilityType, Report, ReportDraft, Weather};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Wire payload for report creation. This is the serialization adapter
/// between the nested `ReportDraft` shape and the flat field names the
/// remote service accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateReport {
    pub latitude: f64,
    pub longitude: f64,
    pub problem_type: String,
    pub disability_types: Vec<String>,
    pub severity: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl CreateReport {
    pub fn from_draft(draft: &ReportDraft) -> Self {
        Self {
            latitude: draft.location.latitude,
            longitude: draft.location.longitude,
            problem_type: draft.problem_type.as_str().to_string(),
            disability_types: draft
                .disability_types
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            severity: draft.severity.as_str().to_string(),
            description: draft.description.clone(),
            photo: draft.photo.clone(),
        }
    }
}

/// Comma-joined disability tags for transports that take them as a single
/// query parameter rather than a JSON array.
pub fn disability_types_param(kinds: &[DisabilityType]) -> String {
    kinds
        .iter()
        .map(DisabilityType::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// The remote reporting service.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Submits a new report; the returned record carries the server-assigned id.
    async fn create(&self, report: &CreateReport) -> Result<Report, ApiError>;

    /// Confirmed reports for the map view and route scoring, optionally
    /// narrowed to the disability tags the user navigates with.
    async fn list(&self, disability_types: &[DisabilityType]) -> Result<Vec<Report>, ApiError>;
}

/// Device connectivity, consulted before deciding between direct submission
/// and the offline queue.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_connected(&self) -> bool;
}

/// HTTP client for the Saarthi backend.
pub struct HttpReportApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpReportApi {
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Current weather at a location. Fetch failures are logged and read as
    /// "no weather context" rather than failing the caller.
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> Option<Weather> {
        let result = self
            .request(reqwest::Method::GET, "/weather/")
            .query(&[("lat", latitude), ("lon", longitude)])
            .send()
            .await
            .and_then(|response| response.error_for_status());
        match result {
            Ok(response) => match response.json::<Weather>().await {
                Ok(weather) => Some(weather),
                Err(err) => {
                    error!("weather fetch error: {err}");
                    None
                }
            },
            Err(err) => {
                error!("weather fetch error: {err}");
                None
            }
        }
    }
}

#[async_trait]
impl ReportApi for HttpReportApi {
    async fn create(&self, report: &CreateReport) -> Result<Report, ApiError> {
        let response = self
            .request(reqwest::Method::POST, "/reports/")
            .json(report)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn list(&self, disability_types: &[DisabilityType]) -> Result<Vec<Report>, ApiError> {
        let mut request = self.request(reqwest::Method::GET, "/reports/");
        if !disability_types.is_empty() {
            request = request.query(&[(
                "disability_types",
                disability_types_param(disability_types),
            )]);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Connectivity check that probes the API base URL.
pub struct ProbeConnectivity {
    client: reqwest::Client,
    url: String,
}

impl ProbeConnectivity {
    pub fn new(url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Connectivity for ProbeConnectivity {
    async fn is_connected(&self) -> bool {
        self.client
            .head(&self.url)
            .send()
            .await
            .is_ok()
    }
}

/// Fixed connectivity state, for the CLI's `--offline` override and tests.
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl Connectivity for StaticConnectivity {
    async fn is_connected(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, DisabilityType, ProblemType, Severity};

    fn sample_draft() -> ReportDraft {
        ReportDraft {
            location: Coordinates {
                latitude: 28.6139,
                longitude: 77.209,
            },
            problem_type: ProblemType::MissingTactilePaving,
            disability_types: vec![
                DisabilityType::VisualImpairment,
                DisabilityType::Wheelchair,
            ],
            severity: Severity::High,
            description: "crossing has no tactile strip".to_string(),
            photo: None,
        }
    }

    #[test]
    fn create_report_flattens_location_and_names() {
        let wire = CreateReport::from_draft(&sample_draft());
        let value = serde_json::to_value(&wire).unwrap();

        assert_eq!(value["latitude"], 28.6139);
        assert_eq!(value["longitude"], 77.209);
        assert_eq!(value["problem_type"], "Missing Tactile Paving");
        assert_eq!(value["severity"], "High");
        assert_eq!(
            value["disability_types"],
            serde_json::json!(["Visual Impairment", "Wheelchair"])
        );
        assert!(value.get("photo").is_none());
    }

    #[test]
    fn photo_is_sent_when_present() {
        let mut draft = sample_draft();
        draft.photo = Some("file:///tmp/kerb.jpg".to_string());
        let value = serde_json::to_value(CreateReport::from_draft(&draft)).unwrap();
        assert_eq!(value["photo"], "file:///tmp/kerb.jpg");
    }

    #[test]
    fn disability_types_param_is_comma_joined() {
        let param = disability_types_param(&[
            DisabilityType::VisualImpairment,
            DisabilityType::Wheelchair,
        ]);
        assert_eq!(param, "Visual Impairment,Wheelchair");
        assert_eq!(disability_types_param(&[]), "");
    }
}
