use chrono::{DateTime, Duration, Utc};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use super::{pick, pick_environment, ALERT_DESCRIPTIONS, ALERT_TYPES, SERVICE_NAMES};
use crate::models::{Alert, AlertSeverity, AlertStatus, EnvFilter};

/// Relative likelihood of low:medium:high:critical alerts.
const SEVERITY_WEIGHTS: [u32; 4] = [30, 40, 25, 5];

const SEVERITIES: [AlertSeverity; 4] = [
    AlertSeverity::Low,
    AlertSeverity::Medium,
    AlertSeverity::High,
    AlertSeverity::Critical,
];

/// Probability that a generated alert has already been resolved.
const RESOLVED_PROBABILITY: f64 = 0.7;

/// Generates between `hours/6` and `hours/2` alerts scattered across the
/// window, sorted ascending. Roughly 70% arrive resolved, with a resolution
/// lag of 5-120 minutes. A non-positive window yields no alerts.
pub fn alerts<R: Rng>(rng: &mut R, hours: i64, filter: EnvFilter) -> Vec<Alert> {
    alerts_at(rng, Utc::now(), hours, filter)
}

pub(crate) fn alerts_at<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    hours: i64,
    filter: EnvFilter,
) -> Vec<Alert> {
    let window_hours = hours.max(0);
    let count = rng.gen_range(window_hours / 6..=window_hours / 2);
    let window_seconds = window_hours * 3600;

    // Weights are non-zero constants, so the index always constructs.
    let Ok(severity_index) = WeightedIndex::new(SEVERITY_WEIGHTS) else {
        return Vec::new();
    };

    let mut records: Vec<Alert> = (0..count)
        .map(|i| {
            let timestamp = now - Duration::seconds(rng.gen_range(0..window_seconds.max(1)));
            let status = if rng.gen::<f64>() < RESOLVED_PROBABILITY {
                AlertStatus::Resolved
            } else {
                AlertStatus::Active
            };
            let resolved_at = (status == AlertStatus::Resolved)
                .then(|| timestamp + Duration::minutes(rng.gen_range(5..=120)));

            Alert {
                id: format!("alert-{}", i + 1),
                alert_type: pick(rng, &ALERT_TYPES),
                severity: SEVERITIES[severity_index.sample(rng)],
                environment: pick_environment(rng, filter),
                status,
                timestamp,
                service: pick(rng, &SERVICE_NAMES),
                description: pick(rng, &ALERT_DESCRIPTIONS),
                resolved_at,
            }
        })
        .collect();

    records.sort_by_key(|a| a.timestamp);
    records
}
