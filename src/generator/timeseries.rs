use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand_distr::{Distribution, Exp, LogNormal, Normal, Uniform};

use super::round2;
use crate::models::{MetricKind, MetricPoint};

/// Generates a metric series at a fixed five-minute cadence across
/// `[now - hours, now]`, using a per-kind distribution clamped to the
/// plausible range for that metric. A non-positive window yields no points.
pub fn time_series<R: Rng>(rng: &mut R, hours: i64, kind: MetricKind) -> Vec<MetricPoint> {
    time_series_at(rng, Utc::now(), hours, kind)
}

pub(crate) fn time_series_at<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    hours: i64,
    kind: MetricKind,
) -> Vec<MetricPoint> {
    if hours <= 0 {
        return Vec::new();
    }

    let window_start = now - Duration::hours(hours);
    let points = hours * 12;

    (0..points)
        .map(|i| MetricPoint {
            timestamp: window_start + Duration::minutes(5 * i),
            value: round2(sample_value(rng, kind)),
            metric_type: kind,
        })
        .collect()
}

fn sample_value<R: Rng>(rng: &mut R, kind: MetricKind) -> f64 {
    match kind {
        MetricKind::Cpu => sample_normal(rng, 45.0, 15.0).clamp(0.0, 100.0),
        MetricKind::Memory => sample_normal(rng, 60.0, 20.0).clamp(0.0, 100.0),
        MetricKind::ResponseTime => match LogNormal::<f64>::new(5.5, 0.5) {
            Ok(dist) => dist.sample(rng).clamp(50.0, 5000.0),
            Err(_) => 50.0,
        },
        MetricKind::ErrorRate => match Exp::<f64>::new(1.0 / 1.5) {
            Ok(dist) => dist.sample(rng).clamp(0.0, 20.0),
            Err(_) => 0.0,
        },
        MetricKind::Other => Uniform::new(0.0, 100.0).sample(rng),
    }
}

fn sample_normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    match Normal::new(mean, std_dev) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_twelve_points_per_hour() {
        let mut rng = StdRng::seed_from_u64(24);
        assert_eq!(time_series(&mut rng, 24, MetricKind::Cpu).len(), 288);
        assert_eq!(time_series(&mut rng, 1, MetricKind::Memory).len(), 12);
    }

    #[test]
    fn test_non_positive_hours_yield_empty() {
        let mut rng = StdRng::seed_from_u64(25);
        assert!(time_series(&mut rng, 0, MetricKind::Cpu).is_empty());
        assert!(time_series(&mut rng, -3, MetricKind::Cpu).is_empty());
    }

    #[test]
    fn test_five_minute_spacing() {
        let mut rng = StdRng::seed_from_u64(26);
        let points = time_series(&mut rng, 6, MetricKind::ErrorRate);
        for pair in points.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(5));
        }
    }

    #[test]
    fn test_values_within_clamp_ranges() {
        let mut rng = StdRng::seed_from_u64(27);

        let ranges = [
            (MetricKind::Cpu, 0.0, 100.0),
            (MetricKind::Memory, 0.0, 100.0),
            (MetricKind::ResponseTime, 50.0, 5000.0),
            (MetricKind::ErrorRate, 0.0, 20.0),
            (MetricKind::Other, 0.0, 100.0),
        ];

        for (kind, low, high) in ranges {
            let points = time_series(&mut rng, 50, kind);
            for point in &points {
                assert!(
                    point.value >= low && point.value <= high,
                    "{kind}: {} out of [{low}, {high}]",
                    point.value
                );
                assert_eq!(point.metric_type, kind);
            }
        }
    }

    #[test]
    fn test_cpu_centers_near_mean() {
        let mut rng = StdRng::seed_from_u64(28);
        let points = time_series(&mut rng, 500, MetricKind::Cpu);

        #[allow(clippy::cast_precision_loss)]
        let mean = points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64;
        assert!((mean - 45.0).abs() < 2.0, "mean {mean}");
    }
}
