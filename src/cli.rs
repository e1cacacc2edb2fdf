use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;

use crate::generator;
use crate::metrics;
use crate::models::{validate_alerts, AlertStatus, EnvFilter, MetricKind, ENVIRONMENTS};
use crate::report::{DeliveryMetrics, MonitoringSnapshot};

#[derive(Parser)]
#[command(name = "opsim")]
#[command(author, version, about = "CI/CD Monitoring Data Simulator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Seed for the random source (omit for fresh entropy)
    #[arg(short, long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate pipeline run records
    Pipelines {
        /// Observation window in hours
        #[arg(long, default_value_t = 24)]
        hours: i64,

        /// Environment filter: all, development, staging or production
        #[arg(short, long, default_value = "all")]
        environment: EnvFilter,
    },
    /// Generate deployment records
    Deployments {
        #[arg(long, default_value_t = 24)]
        hours: i64,

        #[arg(short, long, default_value = "all")]
        environment: EnvFilter,
    },
    /// Generate alert records
    Alerts {
        #[arg(long, default_value_t = 24)]
        hours: i64,

        #[arg(short, long, default_value = "all")]
        environment: EnvFilter,
    },
    /// Generate a metric time series
    Timeseries {
        #[arg(long, default_value_t = 24)]
        hours: i64,

        /// Metric kind: cpu, memory, response_time or error_rate
        #[arg(short, long, default_value = "cpu")]
        metric: MetricKind,
    },
    /// Generate a canary comparison series and rollout history
    Canary,
    /// Generate a full monitoring snapshot with delivery metrics
    Report {
        #[arg(long, default_value_t = 24)]
        hours: i64,

        #[arg(short, long, default_value = "all")]
        environment: EnvFilter,
    },
}

impl Cli {
    pub fn execute(&self) -> Result<()> {
        let mut rng = self.rng();

        match &self.command {
            Commands::Pipelines { hours, environment } => {
                let runs = generator::pipeline_runs(&mut rng, *hours, *environment);
                info!("Generated {} pipeline runs", runs.len());
                self.emit(&runs)
            }
            Commands::Deployments { hours, environment } => {
                let records = generator::deployments(&mut rng, *hours, *environment);
                info!("Generated {} deployments", records.len());
                self.emit(&records)
            }
            Commands::Alerts { hours, environment } => {
                let records = generator::alerts(&mut rng, *hours, *environment);
                info!("Generated {} alerts", records.len());
                self.emit(&records)
            }
            Commands::Timeseries { hours, metric } => {
                let points = generator::time_series(&mut rng, *hours, *metric);
                info!("Generated {} {metric} points", points.len());
                self.emit(&points)
            }
            Commands::Canary => {
                let snapshot = generator::canary_snapshot(&mut rng);
                info!("Generated canary snapshot with {} samples", snapshot.samples.len());
                self.emit(&snapshot)
            }
            Commands::Report { hours, environment } => {
                let snapshot = build_snapshot(&mut rng, *hours, *environment)?;
                info!(
                    "Computed delivery metrics over {} pipeline runs",
                    snapshot.pipelines_analyzed
                );
                self.emit(&snapshot)
            }
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{json_output}");
        }

        Ok(())
    }
}

/// Generates one window of records, validates them, and folds them into a
/// monitoring snapshot the way the dashboard's overview page does.
fn build_snapshot(rng: &mut StdRng, hours: i64, filter: EnvFilter) -> Result<MonitoringSnapshot> {
    let pipelines = generator::pipeline_runs(rng, hours, filter);
    let deployments = generator::deployments(rng, hours, filter);
    let alerts = generator::alerts(rng, hours, filter);

    validate_alerts(&alerts)?;

    let delivery = DeliveryMetrics {
        build_success_rate: metrics::success_rate(&pipelines),
        deployments_per_day: metrics::deployment_frequency(&deployments),
        average_build_duration_minutes: metrics::average_duration(&pipelines),
        lead_time_minutes: metrics::lead_time(&pipelines, &deployments, rng),
        mttr_minutes: metrics::mttr(&alerts),
        change_failure_rate: metrics::change_failure_rate(&deployments),
        availability: metrics::availability(&alerts, hours),
    };

    let environment_health: IndexMap<String, _> = ENVIRONMENTS
        .iter()
        .map(|&env| {
            (
                env.to_string(),
                metrics::environment_health(&pipelines, &deployments, &alerts, env),
            )
        })
        .collect();

    let active_alerts = alerts
        .iter()
        .filter(|a| a.status == AlertStatus::Active)
        .count();

    Ok(MonitoringSnapshot {
        generated_at: Utc::now(),
        window_hours: hours,
        environment: filter.to_string(),
        pipelines_analyzed: pipelines.len(),
        deployments_analyzed: deployments.len(),
        alerts_analyzed: alerts.len(),
        active_alerts,
        metrics: delivery,
        environment_health,
    })
}
