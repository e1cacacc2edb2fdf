use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::{pick, pick_environment, round1, DEPLOYERS, SERVICE_NAMES};
use crate::models::{Deployment, DeploymentStatus, EnvFilter};

/// Generates roughly one deployment every four hours, scattered uniformly
/// across the window (deployments are not evenly paced the way builds are)
/// and sorted ascending. At least one record is always produced.
pub fn deployments<R: Rng>(rng: &mut R, hours: i64, filter: EnvFilter) -> Vec<Deployment> {
    deployments_at(rng, Utc::now(), hours, filter)
}

pub(crate) fn deployments_at<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    hours: i64,
    filter: EnvFilter,
) -> Vec<Deployment> {
    let window_hours = hours.max(0);
    let count = (window_hours / 4).max(1);
    let window_seconds = window_hours * 3600;

    let mut records: Vec<Deployment> = (0..count)
        .map(|i| {
            let environment = pick_environment(rng, filter);
            let offset = if window_seconds > 0 {
                rng.gen_range(0..window_seconds)
            } else {
                0
            };
            let status = if rng.gen::<f64>() < environment.deploy_success_probability() {
                DeploymentStatus::Success
            } else {
                DeploymentStatus::Failed
            };

            Deployment {
                id: format!("deploy-{}", i + 1),
                environment,
                status,
                timestamp: now - Duration::seconds(offset),
                duration: round1(rng.gen_range(2.0..20.0)),
                version: format!(
                    "v{}.{}.{}",
                    rng.gen_range(1..=5),
                    rng.gen_range(0..=20),
                    rng.gen_range(0..=100)
                ),
                service: pick(rng, &SERVICE_NAMES),
                deployed_by: pick(rng, &DEPLOYERS),
            }
        })
        .collect();

    records.sort_by_key(|d| d.timestamp);
    records
}
