use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OpsimError, Result};

/// Deployment target environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

pub const ENVIRONMENTS: [Environment; 3] = [
    Environment::Development,
    Environment::Staging,
    Environment::Production,
];

impl Environment {
    /// Base probability that a pipeline run in this environment succeeds.
    pub fn build_success_probability(self) -> f64 {
        match self {
            Environment::Development => 0.85,
            Environment::Staging => 0.92,
            Environment::Production => 0.97,
        }
    }

    /// Probability that a deployment to this environment succeeds.
    pub fn deploy_success_probability(self) -> f64 {
        match self {
            Environment::Production => 0.95,
            _ => 0.90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = OpsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(OpsimError::Config(format!(
                "unknown environment: {other}"
            ))),
        }
    }
}

/// Environment selector used by the generator surface: either a single
/// environment or all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvFilter {
    #[default]
    All,
    Only(Environment),
}

impl fmt::Display for EnvFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvFilter::All => f.write_str("all"),
            EnvFilter::Only(env) => env.fmt(f),
        }
    }
}

impl FromStr for EnvFilter {
    type Err = OpsimError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            Ok(EnvFilter::All)
        } else {
            Ok(EnvFilter::Only(s.parse()?))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Success,
    Running,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

/// Kind of metric a time series tracks. Unrecognized names parse to `Other`,
/// which samples uniformly instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Memory,
    ResponseTime,
    ErrorRate,
    Other,
}

impl FromStr for MetricKind {
    type Err = OpsimError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_lowercase().as_str() {
            "cpu" => MetricKind::Cpu,
            "memory" => MetricKind::Memory,
            "response_time" => MetricKind::ResponseTime,
            "error_rate" => MetricKind::ErrorRate,
            _ => MetricKind::Other,
        })
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::ResponseTime => "response_time",
            MetricKind::ErrorRate => "error_rate",
            MetricKind::Other => "other",
        })
    }
}

/// A single CI pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: String,
    pub pipeline_name: String,
    pub environment: Environment,
    pub status: PipelineStatus,
    pub timestamp: DateTime<Utc>,
    /// Build duration in minutes.
    pub duration: f64,
    pub commit_hash: String,
    pub branch: String,
}

/// A deployment of a service version to an environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub environment: Environment,
    pub status: DeploymentStatus,
    pub timestamp: DateTime<Utc>,
    /// Rollout duration in minutes.
    pub duration: f64,
    pub version: String,
    pub service: String,
    pub deployed_by: String,
}

/// An infrastructure or application alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub environment: Environment,
    pub status: AlertStatus,
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub description: String,
    /// Present iff the alert is resolved; always strictly after `timestamp`.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// Checks the resolution invariant: resolved alerts carry a `resolved_at`
    /// strictly after `timestamp`, active alerts carry none.
    pub fn validate(&self) -> Result<()> {
        match (self.status, self.resolved_at) {
            (AlertStatus::Resolved, None) => Err(OpsimError::InvalidRecord(format!(
                "alert {} is resolved but has no resolved_at",
                self.id
            ))),
            (AlertStatus::Resolved, Some(resolved_at)) if resolved_at <= self.timestamp => {
                Err(OpsimError::InvalidRecord(format!(
                    "alert {} resolved_at does not follow its timestamp",
                    self.id
                )))
            }
            (AlertStatus::Active, Some(_)) => Err(OpsimError::InvalidRecord(format!(
                "alert {} is active but carries a resolved_at",
                self.id
            ))),
            _ => Ok(()),
        }
    }
}

/// Validates a batch of alerts before they flow into the metrics layer.
pub fn validate_alerts(alerts: &[Alert]) -> Result<()> {
    alerts.iter().try_for_each(Alert::validate)
}

/// One sample of a metric time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub metric_type: MetricKind,
}
