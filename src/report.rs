use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Composite health of one environment, each component scaled to [0,100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    pub overall_health: f64,
    pub build_success_rate: f64,
    pub deployment_success_rate: f64,
    pub alert_score: f64,
}

/// The seven delivery metrics computed over one observation window.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeliveryMetrics {
    pub build_success_rate: f64,
    pub deployments_per_day: f64,
    pub average_build_duration_minutes: f64,
    pub lead_time_minutes: f64,
    pub mttr_minutes: f64,
    pub change_failure_rate: f64,
    pub availability: f64,
}

/// Top-level output of `opsim report`: generated record counts, the delivery
/// metrics, and per-environment health.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitoringSnapshot {
    pub generated_at: DateTime<Utc>,
    pub window_hours: i64,
    pub environment: String,
    pub pipelines_analyzed: usize,
    pub deployments_analyzed: usize,
    pub alerts_analyzed: usize,
    pub active_alerts: usize,
    pub metrics: DeliveryMetrics,
    pub environment_health: IndexMap<String, HealthScore>,
}
