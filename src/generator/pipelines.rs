use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::{pick, pick_environment, round1, BRANCHES, SERVICE_NAMES};
use crate::models::{EnvFilter, PipelineRun, PipelineStatus};

/// Generates roughly three pipeline runs per hour, evenly spread across
/// `[now - hours, now]` and sorted ascending by timestamp. A non-positive
/// window yields no runs.
pub fn pipeline_runs<R: Rng>(rng: &mut R, hours: i64, filter: EnvFilter) -> Vec<PipelineRun> {
    pipeline_runs_at(rng, Utc::now(), hours, filter)
}

pub(crate) fn pipeline_runs_at<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    hours: i64,
    filter: EnvFilter,
) -> Vec<PipelineRun> {
    if hours <= 0 {
        return Vec::new();
    }

    let count = hours * 3;
    let window_start = now - Duration::hours(hours);
    let step_seconds = hours * 3600 / count;

    (0..count)
        .map(|i| {
            let environment = pick_environment(rng, filter);
            let status = sample_status(rng, environment.build_success_probability());

            PipelineRun {
                id: format!("build-{}", i + 1),
                pipeline_name: pick(rng, &SERVICE_NAMES),
                environment,
                status,
                timestamp: window_start + Duration::seconds(step_seconds * i),
                duration: sample_duration(rng, status),
                commit_hash: format!("{:x}", rng.gen_range(1_000_000..=9_999_999)),
                branch: pick(rng, &BRANCHES),
            }
        })
        .collect()
}

/// A draw below the environment's base probability is a success, the next
/// five-point band is still running, the rest failed.
fn sample_status<R: Rng>(rng: &mut R, success_probability: f64) -> PipelineStatus {
    let draw: f64 = rng.gen();

    if draw < success_probability {
        PipelineStatus::Success
    } else if draw < success_probability + 0.05 {
        PipelineStatus::Running
    } else {
        PipelineStatus::Failed
    }
}

/// Builds take 5-45 minutes; failed builds cut off early or drag on, so they
/// get an extra 0.3-1.2 scale factor.
fn sample_duration<R: Rng>(rng: &mut R, status: PipelineStatus) -> f64 {
    let mut duration = rng.gen_range(5.0..45.0);
    if status == PipelineStatus::Failed {
        duration *= rng.gen_range(0.3..1.2);
    }
    round1(duration)
}
