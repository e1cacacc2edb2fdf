//! Synthetic record generation. Every function is a pure function of its
//! parameters and the injected random source; nothing is cached between
//! calls and no I/O happens here.

mod alerts;
mod canary;
mod deployments;
mod pipelines;
mod timeseries;

pub use alerts::alerts;
pub use canary::{canary_snapshot, CanaryRollout, CanarySample, CanarySnapshot, CanaryStatus};
pub use deployments::deployments;
pub use pipelines::pipeline_runs;
pub use timeseries::time_series;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{EnvFilter, Environment, ENVIRONMENTS};

/// Service catalog shared by pipelines, deployments, and alerts.
pub(crate) const SERVICE_NAMES: [&str; 9] = [
    "frontend-build",
    "backend-api",
    "database-migration",
    "mobile-app",
    "auth-service",
    "payment-service",
    "notification-service",
    "data-pipeline",
    "ml-model-training",
];

pub(crate) const BRANCHES: [&str; 4] = ["main", "develop", "feature/new-ui", "hotfix/critical-bug"];

pub(crate) const DEPLOYERS: [&str; 4] = ["john.doe", "jane.smith", "bob.wilson", "alice.johnson"];

pub(crate) const ALERT_TYPES: [&str; 8] = [
    "High CPU Usage",
    "Memory Leak",
    "Disk Space Low",
    "High Error Rate",
    "Slow Response Time",
    "Service Down",
    "Database Connection Failed",
    "Cache Miss Rate High",
];

pub(crate) const ALERT_DESCRIPTIONS: [&str; 10] = [
    "CPU usage exceeded 85% for more than 5 minutes",
    "Memory usage reached 90% threshold",
    "Error rate increased to 8.5% in the last 10 minutes",
    "Response time exceeded 2000ms for critical endpoints",
    "Database connection pool exhausted",
    "Disk space usage above 90% on primary volume",
    "Service health check failed 3 consecutive times",
    "Cache hit ratio dropped below 70%",
    "SSL certificate expires in 7 days",
    "Unusual spike in 5xx HTTP errors detected",
];

/// Picks an environment honoring the filter: uniform over all three when the
/// filter is `All`, otherwise the filtered one.
pub(crate) fn pick_environment<R: Rng>(rng: &mut R, filter: EnvFilter) -> Environment {
    match filter {
        EnvFilter::All => *ENVIRONMENTS
            .choose(rng)
            .unwrap_or(&Environment::Development),
        EnvFilter::Only(env) => env,
    }
}

pub(crate) fn pick<'a, R: Rng>(rng: &mut R, catalog: &'a [&'a str]) -> String {
    catalog.choose(rng).copied().unwrap_or_default().to_string()
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
