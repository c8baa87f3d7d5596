use log::warn;

use crate::config::ScoreConfig;

/// Turns raw bucket counts into the values to plot.
///
/// In percentage mode every bucket is divided by the sum of all the buckets.
/// An all-zero array has no meaningful fractions: it is returned as zeros
/// and a warning is logged.
pub fn normalize(config: &ScoreConfig, raw_counts: Vec<f64>) -> Vec<f64> {
    if !config.percentage {
        return raw_counts;
    }
    let total: f64 = raw_counts.iter().sum();
    if total == 0.0 {
        warn!(
            "normalize: question {:?}: no responses to compute percentages from, reporting zeros",
            config.id
        );
        return vec![0.0; raw_counts.len()];
    }
    raw_counts.iter().map(|c| c / total).collect()
}

/// Builds the (scores, response count) pair returned by every question.
pub(crate) fn finish(config: &ScoreConfig, raw_counts: Vec<f64>) -> (Vec<f64>, f64) {
    let total: f64 = raw_counts.iter().sum();
    (normalize(config, raw_counts), total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_mode_is_identity() {
        let config = ScoreConfig::new("q");
        assert_eq!(normalize(&config, vec![3.0, 0.0, 1.0]), vec![3.0, 0.0, 1.0]);
    }

    #[test]
    fn percentages_sum_to_one() {
        let mut config = ScoreConfig::new("q");
        config.percentage = true;
        let res = normalize(&config, vec![3.0, 0.0, 1.0, 7.0, 2.0]);
        let total: f64 = res.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((res[0] - 3.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn percentages_of_nothing_are_zero() {
        let mut config = ScoreConfig::new("q");
        config.percentage = true;
        assert_eq!(normalize(&config, vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn finish_reports_raw_total() {
        let mut config = ScoreConfig::new("q");
        config.percentage = true;
        let (scores, total) = finish(&config, vec![1.0, 3.0]);
        assert_eq!(total, 4.0);
        assert_eq!(scores, vec![0.25, 0.75]);
    }
}
