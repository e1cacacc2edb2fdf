use rand::Rng;

use crate::models::{
    Alert, AlertSeverity, AlertStatus, Deployment, DeploymentStatus, Environment, PipelineRun,
    PipelineStatus,
};
use crate::report::HealthScore;

/// Each critical alert is modeled as this many minutes of downtime.
const DOWNTIME_MINUTES_PER_CRITICAL_ALERT: f64 = 30.0;

/// Percentage of pipeline runs that succeeded; 0.0 for no runs.
pub fn success_rate(pipelines: &[PipelineRun]) -> f64 {
    if pipelines.is_empty() {
        return 0.0;
    }

    let successful = pipelines
        .iter()
        .filter(|p| p.status == PipelineStatus::Success)
        .count();

    percentage(successful, pipelines.len())
}

/// Deployments per day over the observed span. The span floors at one day,
/// so sub-day windows report at most `count` per day.
pub fn deployment_frequency(deployments: &[Deployment]) -> f64 {
    if deployments.is_empty() {
        return 0.0;
    }

    let newest = deployments.iter().map(|d| d.timestamp).max();
    let oldest = deployments.iter().map(|d| d.timestamp).min();

    let span_days = match (newest, oldest) {
        (Some(newest), Some(oldest)) => {
            #[allow(clippy::cast_precision_loss)]
            let days = (newest - oldest).num_seconds() as f64 / (24.0 * 3600.0);
            days.max(1.0)
        }
        _ => 1.0,
    };

    #[allow(clippy::cast_precision_loss)]
    let frequency = deployments.len() as f64 / span_days;
    frequency
}

/// Arithmetic mean of build durations in minutes; 0.0 for no runs.
pub fn average_duration(pipelines: &[PipelineRun]) -> f64 {
    mean(pipelines.iter().map(|p| p.duration))
}

/// Estimated commit-to-deploy lead time in minutes: mean build time plus mean
/// rollout time plus a sampled queue-wait term of 30-120 minutes.
///
/// This is a randomized estimator, not a pure aggregate. The wait term is
/// drawn from `rng` on every call, so two calls agree only when given
/// identically seeded sources.
pub fn lead_time<R: Rng>(
    pipelines: &[PipelineRun],
    deployments: &[Deployment],
    rng: &mut R,
) -> f64 {
    if pipelines.is_empty() || deployments.is_empty() {
        return 0.0;
    }

    let avg_build = mean(pipelines.iter().map(|p| p.duration));
    let avg_deploy = mean(deployments.iter().map(|d| d.duration));

    avg_build + avg_deploy + rng.gen_range(30.0..120.0)
}

/// Mean time to recovery in minutes, over alerts that were resolved and carry
/// a resolution timestamp; 0.0 when none qualify.
pub fn mttr(alerts: &[Alert]) -> f64 {
    let resolution_minutes: Vec<f64> = alerts
        .iter()
        .filter(|a| a.status == AlertStatus::Resolved)
        .filter_map(|a| a.resolved_at.map(|resolved| resolved - a.timestamp))
        .map(|gap| {
            #[allow(clippy::cast_precision_loss)]
            let minutes = gap.num_seconds() as f64 / 60.0;
            minutes
        })
        .collect();

    mean(resolution_minutes.into_iter())
}

/// Percentage of deployments that failed; 0.0 for no deployments.
pub fn change_failure_rate(deployments: &[Deployment]) -> f64 {
    if deployments.is_empty() {
        return 0.0;
    }

    let failed = deployments
        .iter()
        .filter(|d| d.status == DeploymentStatus::Failed)
        .count();

    percentage(failed, deployments.len())
}

/// Availability estimate over the window. Without critical alerts the system
/// is assumed 99.9% available; otherwise each critical alert charges 30
/// minutes of downtime against the window, floored at 95.0.
pub fn availability(alerts: &[Alert], hours: i64) -> f64 {
    let critical = alerts
        .iter()
        .filter(|a| a.severity == AlertSeverity::Critical)
        .count();

    if critical == 0 {
        return 99.9;
    }

    #[allow(clippy::cast_precision_loss)]
    let downtime = critical as f64 * DOWNTIME_MINUTES_PER_CRITICAL_ALERT;
    #[allow(clippy::cast_precision_loss)]
    let total = (hours * 60) as f64;

    let uptime_percentage = ((total - downtime) / total) * 100.0;
    uptime_percentage.max(95.0)
}

/// Weighted composite health for one environment:
/// 0.4 * build success + 0.3 * deployment success + 0.3 * alert score,
/// where every active alert costs the alert score 10 points.
pub fn environment_health(
    pipelines: &[PipelineRun],
    deployments: &[Deployment],
    alerts: &[Alert],
    environment: Environment,
) -> HealthScore {
    let env_pipelines: Vec<PipelineRun> = pipelines
        .iter()
        .filter(|p| p.environment == environment)
        .cloned()
        .collect();
    let env_deployments: Vec<Deployment> = deployments
        .iter()
        .filter(|d| d.environment == environment)
        .cloned()
        .collect();

    let build_success_rate = success_rate(&env_pipelines);
    let deployment_success_rate = 100.0 - change_failure_rate(&env_deployments);

    let active_alerts = alerts
        .iter()
        .filter(|a| a.environment == environment && a.status == AlertStatus::Active)
        .count();

    #[allow(clippy::cast_precision_loss)]
    let alert_score = (100.0 - active_alerts as f64 * 10.0).max(0.0);

    let overall_health =
        build_success_rate * 0.4 + deployment_success_rate * 0.3 + alert_score * 0.3;

    HealthScore {
        overall_health: round1(overall_health),
        build_success_rate: round1(build_success_rate),
        deployment_success_rate: round1(deployment_success_rate),
        alert_score: round1(alert_score),
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let rate = (part as f64 / total.max(1) as f64) * 100.0;
    rate
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (count, sum) = values.fold((0usize, 0.0), |(count, sum), v| (count + 1, sum + v));

    if count == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let avg = sum / count as f64;
    avg
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(status: PipelineStatus, environment: Environment, duration: f64) -> PipelineRun {
        PipelineRun {
            id: "build-1".to_string(),
            pipeline_name: "backend-api".to_string(),
            environment,
            status,
            timestamp: Utc::now(),
            duration,
            commit_hash: "a1b2c3".to_string(),
            branch: "main".to_string(),
        }
    }

    fn deployment(
        status: DeploymentStatus,
        environment: Environment,
        hours_ago: i64,
    ) -> Deployment {
        Deployment {
            id: "deploy-1".to_string(),
            environment,
            status,
            timestamp: Utc::now() - Duration::hours(hours_ago),
            duration: 10.0,
            version: "v1.2.3".to_string(),
            service: "backend-api".to_string(),
            deployed_by: "jane.smith".to_string(),
        }
    }

    fn alert(
        severity: AlertSeverity,
        status: AlertStatus,
        environment: Environment,
        resolution_minutes: i64,
    ) -> Alert {
        let timestamp = Utc::now();
        Alert {
            id: "alert-1".to_string(),
            alert_type: "Service Down".to_string(),
            severity,
            environment,
            status,
            timestamp,
            service: "backend-api".to_string(),
            description: "Service health check failed".to_string(),
            resolved_at: (status == AlertStatus::Resolved)
                .then(|| timestamp + Duration::minutes(resolution_minutes)),
        }
    }

    #[test]
    fn test_success_rate_empty_is_zero() {
        assert_eq!(success_rate(&[]), 0.0);
    }

    #[test]
    fn test_success_rate_all_success_is_hundred() {
        let runs: Vec<_> = (0..5)
            .map(|_| run(PipelineStatus::Success, Environment::Production, 10.0))
            .collect();
        assert_eq!(success_rate(&runs), 100.0);
    }

    #[test]
    fn test_success_rate_counts_only_success() {
        let runs = vec![
            run(PipelineStatus::Success, Environment::Production, 10.0),
            run(PipelineStatus::Running, Environment::Production, 10.0),
            run(PipelineStatus::Failed, Environment::Production, 10.0),
            run(PipelineStatus::Success, Environment::Production, 10.0),
        ];
        assert_eq!(success_rate(&runs), 50.0);
    }

    #[test]
    fn test_deployment_frequency_empty_is_zero() {
        assert_eq!(deployment_frequency(&[]), 0.0);
    }

    #[test]
    fn test_deployment_frequency_floors_span_at_one_day() {
        // Three deployments inside two hours: span floors to 1 day.
        let deployments = vec![
            deployment(DeploymentStatus::Success, Environment::Production, 2),
            deployment(DeploymentStatus::Success, Environment::Production, 1),
            deployment(DeploymentStatus::Success, Environment::Production, 0),
        ];
        assert!((deployment_frequency(&deployments) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_deployment_frequency_divides_by_span() {
        // Span of 48h, four deployments: two per day.
        let deployments = vec![
            deployment(DeploymentStatus::Success, Environment::Production, 48),
            deployment(DeploymentStatus::Success, Environment::Production, 30),
            deployment(DeploymentStatus::Success, Environment::Production, 12),
            deployment(DeploymentStatus::Success, Environment::Production, 0),
        ];
        assert!((deployment_frequency(&deployments) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_average_duration_empty_is_zero() {
        assert_eq!(average_duration(&[]), 0.0);
    }

    #[test]
    fn test_average_duration_is_mean() {
        let runs = vec![
            run(PipelineStatus::Success, Environment::Staging, 10.0),
            run(PipelineStatus::Failed, Environment::Staging, 30.0),
        ];
        assert!((average_duration(&runs) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_lead_time_empty_inputs_are_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let runs = vec![run(PipelineStatus::Success, Environment::Production, 10.0)];
        let deployments = vec![deployment(
            DeploymentStatus::Success,
            Environment::Production,
            0,
        )];

        assert_eq!(lead_time(&[], &deployments, &mut rng), 0.0);
        assert_eq!(lead_time(&runs, &[], &mut rng), 0.0);
    }

    #[test]
    fn test_lead_time_bounds_and_reproducibility() {
        let runs = vec![run(PipelineStatus::Success, Environment::Production, 20.0)];
        let deployments = vec![deployment(
            DeploymentStatus::Success,
            Environment::Production,
            0,
        )];

        let first = lead_time(&runs, &deployments, &mut StdRng::seed_from_u64(42));
        let second = lead_time(&runs, &deployments, &mut StdRng::seed_from_u64(42));

        // 20 build + 10 deploy + wait in [30,120).
        assert!(first >= 60.0 && first < 150.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_mttr_no_resolved_alerts_is_zero() {
        let alerts = vec![alert(
            AlertSeverity::High,
            AlertStatus::Active,
            Environment::Production,
            0,
        )];
        assert_eq!(mttr(&[]), 0.0);
        assert_eq!(mttr(&alerts), 0.0);
    }

    #[test]
    fn test_mttr_averages_resolution_gaps() {
        let alerts = vec![
            alert(
                AlertSeverity::Low,
                AlertStatus::Resolved,
                Environment::Staging,
                20,
            ),
            alert(
                AlertSeverity::High,
                AlertStatus::Resolved,
                Environment::Staging,
                60,
            ),
            alert(
                AlertSeverity::Medium,
                AlertStatus::Active,
                Environment::Staging,
                0,
            ),
        ];
        assert!((mttr(&alerts) - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_change_failure_rate() {
        assert_eq!(change_failure_rate(&[]), 0.0);

        let deployments = vec![
            deployment(DeploymentStatus::Success, Environment::Production, 3),
            deployment(DeploymentStatus::Failed, Environment::Production, 2),
            deployment(DeploymentStatus::Success, Environment::Production, 1),
            deployment(DeploymentStatus::Failed, Environment::Production, 0),
        ];
        assert_eq!(change_failure_rate(&deployments), 50.0);
    }

    #[test]
    fn test_availability_no_alerts_is_baseline() {
        assert_eq!(availability(&[], 24), 99.9);
    }

    #[test]
    fn test_availability_no_critical_alerts_is_baseline() {
        let alerts = vec![alert(
            AlertSeverity::High,
            AlertStatus::Active,
            Environment::Production,
            0,
        )];
        assert_eq!(availability(&alerts, 24), 99.9);
    }

    #[test]
    fn test_availability_charges_downtime_per_critical() {
        // One critical alert = 30 minutes over a 24h window.
        let alerts = vec![alert(
            AlertSeverity::Critical,
            AlertStatus::Resolved,
            Environment::Production,
            30,
        )];
        let expected = ((24.0 * 60.0 - 30.0) / (24.0 * 60.0)) * 100.0;
        assert!((availability(&alerts, 24) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_availability_floors_at_95() {
        // 10 criticals in one hour: raw value goes negative and must clamp.
        let alerts: Vec<_> = (0..10)
            .map(|_| {
                alert(
                    AlertSeverity::Critical,
                    AlertStatus::Active,
                    Environment::Production,
                    0,
                )
            })
            .collect();
        assert_eq!(availability(&alerts, 1), 95.0);
    }

    #[test]
    fn test_environment_health_weighted_formula() {
        let pipelines = vec![
            run(PipelineStatus::Success, Environment::Production, 10.0),
            run(PipelineStatus::Failed, Environment::Production, 10.0),
            // A staging run that must not count.
            run(PipelineStatus::Failed, Environment::Staging, 10.0),
        ];
        let deployments = vec![
            deployment(DeploymentStatus::Success, Environment::Production, 1),
            deployment(DeploymentStatus::Failed, Environment::Production, 0),
        ];
        let alerts = vec![alert(
            AlertSeverity::Medium,
            AlertStatus::Active,
            Environment::Production,
            0,
        )];

        let score = environment_health(&pipelines, &deployments, &alerts, Environment::Production);

        assert_eq!(score.build_success_rate, 50.0);
        assert_eq!(score.deployment_success_rate, 50.0);
        assert_eq!(score.alert_score, 90.0);
        // 0.4*50 + 0.3*50 + 0.3*90 = 62.0
        assert_eq!(score.overall_health, 62.0);
    }

    #[test]
    fn test_environment_health_components_in_range() {
        let alerts: Vec<_> = (0..15)
            .map(|_| {
                alert(
                    AlertSeverity::Low,
                    AlertStatus::Active,
                    Environment::Development,
                    0,
                )
            })
            .collect();

        let score = environment_health(&[], &[], &alerts, Environment::Development);

        for value in [
            score.overall_health,
            score.build_success_rate,
            score.deployment_success_rate,
            score.alert_score,
        ] {
            assert!((0.0..=100.0).contains(&value), "{value} out of range");
        }
        // 15 active alerts saturate the alert score at 0.
        assert_eq!(score.alert_score, 0.0);
    }

    #[test]
    fn test_metrics_are_idempotent() {
        let runs = vec![
            run(PipelineStatus::Success, Environment::Production, 12.5),
            run(PipelineStatus::Failed, Environment::Production, 7.0),
        ];
        assert_eq!(success_rate(&runs), success_rate(&runs));
        assert_eq!(average_duration(&runs), average_duration(&runs));
    }
}
