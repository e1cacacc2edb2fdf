use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::round2;
use crate::models::Environment;

/// Services that currently take part in canary rollouts.
const CANARY_SERVICES: [&str; 3] = ["payment-service", "auth-service", "frontend-app"];

/// How far back the side-by-side comparison window reaches.
const COMPARISON_WINDOW_HOURS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanaryStatus {
    Completed,
    RolledBack,
}

/// One five-minute sample comparing the canary against the stable fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanarySample {
    pub timestamp: DateTime<Utc>,
    pub response_time_canary: f64,
    pub response_time_production: f64,
    pub error_rate_canary: f64,
    pub error_rate_production: f64,
    pub cpu_usage_canary: f64,
    pub cpu_usage_production: f64,
    pub memory_usage_canary: f64,
    pub memory_usage_production: f64,
}

/// A past canary rollout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanaryRollout {
    pub service: String,
    pub version: String,
    pub environment: Environment,
    pub status: CanaryStatus,
    pub duration_minutes: i64,
    pub timestamp: DateTime<Utc>,
    pub max_traffic_percent: u8,
}

/// Canary control-panel payload: a comparison series over the last two hours
/// plus recent rollout history.
#[derive(Debug, Serialize, Deserialize)]
pub struct CanarySnapshot {
    pub generated_at: DateTime<Utc>,
    /// How the canary performs relative to the stable fleet; below 1.0 means
    /// the canary is doing better.
    pub performance_factor: f64,
    pub samples: Vec<CanarySample>,
    pub history: Vec<CanaryRollout>,
}

pub fn canary_snapshot<R: Rng>(rng: &mut R) -> CanarySnapshot {
    canary_snapshot_at(rng, Utc::now())
}

pub(crate) fn canary_snapshot_at<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> CanarySnapshot {
    let performance_factor = rng.gen_range(0.8..1.2);

    CanarySnapshot {
        generated_at: now,
        performance_factor: round2(performance_factor),
        samples: comparison_samples(rng, now, performance_factor),
        history: rollout_history(rng, now),
    }
}

fn comparison_samples<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    factor: f64,
) -> Vec<CanarySample> {
    let window_start = now - Duration::hours(COMPARISON_WINDOW_HOURS);
    let points = COMPARISON_WINDOW_HOURS * 12;

    (0..=points)
        .map(|i| CanarySample {
            timestamp: window_start + Duration::minutes(5 * i),
            response_time_canary: round2(sample_normal(rng, 200.0 * factor, 30.0)),
            response_time_production: round2(sample_normal(rng, 250.0, 40.0)),
            error_rate_canary: round2(rng.gen_range(0.0..2.0 * factor)),
            error_rate_production: round2(rng.gen_range(1.0..4.0)),
            cpu_usage_canary: round2(sample_normal(rng, 45.0 * factor, 10.0)),
            cpu_usage_production: round2(sample_normal(rng, 55.0, 12.0)),
            memory_usage_canary: round2(sample_normal(rng, 60.0 * factor, 8.0)),
            memory_usage_production: round2(sample_normal(rng, 70.0, 10.0)),
        })
        .collect()
}

/// Five rollouts, one every other day back, newest first. Roughly one in
/// five gets rolled back.
fn rollout_history<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Vec<CanaryRollout> {
    (0..5)
        .map(|i| {
            let days_ago = i * 2 + 1;
            let status = if rng.gen::<f64>() < 0.2 {
                CanaryStatus::RolledBack
            } else {
                CanaryStatus::Completed
            };

            CanaryRollout {
                service: CANARY_SERVICES
                    .choose(rng)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                version: format!("v2.1.{}", 4 - i),
                environment: Environment::Production,
                status,
                duration_minutes: rng.gen_range(30..180),
                timestamp: now - Duration::days(days_ago),
                max_traffic_percent: rng.gen_range(25..100),
            }
        })
        .collect()
}

fn sample_normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    match Normal::new(mean, std_dev) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mean,
    }
}
