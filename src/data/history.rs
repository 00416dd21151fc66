//! Rolling rate history for trend sparklines.

use std::collections::VecDeque;
use std::time::Instant;

/// Maximum number of samples kept per circuit.
pub const MAX_TREND_SIZE: usize = 200;

/// One rate reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSample {
    pub value: f64,
    pub at: Instant,
}

/// Bounded FIFO of rate samples for one circuit.
///
/// A freshly discovered circuit would otherwise show a ramp up from zero on
/// its first two readings, so a leading zero is dropped as soon as a
/// non-zero reading follows it.
#[derive(Debug, Clone, Default)]
pub struct Trend {
    samples: VecDeque<TrendSample>,
}

impl Trend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading, evicting the oldest beyond [`MAX_TREND_SIZE`].
    pub fn record(&mut self, value: f64, at: Instant) {
        self.samples.push_back(TrendSample { value, at });
        while self.samples.len() > MAX_TREND_SIZE {
            self.samples.pop_front();
        }

        if self.samples.len() > 1 && self.samples[0].value == 0.0 && self.samples[1].value != 0.0
        {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &TrendSample> {
        self.samples.iter()
    }

    /// Values to draw, oldest first, or `None` when nothing meaningful can
    /// be drawn (no samples, or a single zero).
    pub fn render_values(&self) -> Option<Vec<f64>> {
        match self.samples.len() {
            0 => None,
            1 if self.samples[0].value == 0.0 => None,
            _ => Some(self.samples.iter().map(|s| s.value).collect()),
        }
    }

    /// The last `width` values normalized to 0-7 for 8 bar levels.
    ///
    /// Unknown (non-finite) rates draw as the lowest bar.
    pub fn sparkline(&self, width: usize) -> Vec<u8> {
        let Some(values) = self.render_values() else {
            return Vec::new();
        };

        let start = values.len().saturating_sub(width);
        let values: Vec<f64> = values[start..]
            .iter()
            .map(|v| if v.is_finite() { *v } else { 0.0 })
            .collect();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        if range <= 0.0 {
            return vec![0; values.len()];
        }

        values
            .iter()
            .map(|&v| (((v - min) / range * 7.0) as u8).min(7))
            .collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_all(trend: &mut Trend, values: &[f64]) {
        let now = Instant::now();
        for v in values {
            trend.record(*v, now);
        }
    }

    #[test]
    fn new_trend_is_empty() {
        let t = Trend::new();
        assert!(t.is_empty());
        assert!(t.render_values().is_none());
        assert!(t.sparkline(8).is_empty());
    }

    #[test]
    fn trend_caps_at_max_size() {
        let mut t = Trend::new();
        let values: Vec<f64> = (1..=201).map(f64::from).collect();
        record_all(&mut t, &values);

        assert_eq!(t.len(), MAX_TREND_SIZE);
        let kept: Vec<f64> = t.samples().map(|s| s.value).collect();
        assert_eq!(kept.first(), Some(&2.0));
        assert_eq!(kept.last(), Some(&201.0));
    }

    #[test]
    fn single_zero_is_suppressed() {
        let mut t = Trend::new();
        record_all(&mut t, &[0.0]);
        assert_eq!(t.len(), 1);
        assert!(t.render_values().is_none());
    }

    #[test]
    fn single_non_zero_is_drawn() {
        let mut t = Trend::new();
        record_all(&mut t, &[3.5]);
        assert_eq!(t.render_values(), Some(vec![3.5]));
    }

    #[test]
    fn leading_zero_is_dropped() {
        let mut t = Trend::new();
        record_all(&mut t, &[0.0, 5.0]);
        assert_eq!(t.render_values(), Some(vec![5.0]));
    }

    #[test]
    fn zeros_followed_by_zero_are_kept() {
        let mut t = Trend::new();
        record_all(&mut t, &[0.0, 0.0, 0.0]);
        assert_eq!(t.render_values(), Some(vec![0.0, 0.0, 0.0]));
    }

    #[test]
    fn sparkline_normalizes_to_eight_levels() {
        let mut t = Trend::new();
        record_all(&mut t, &[1.0, 2.0, 4.0, 8.0]);
        let levels = t.sparkline(8);
        assert_eq!(levels.len(), 4);
        assert_eq!(*levels.last().unwrap(), 7);
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn sparkline_takes_most_recent_values() {
        let mut t = Trend::new();
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        record_all(&mut t, &values);
        assert_eq!(t.sparkline(8).len(), 8);
    }

    #[test]
    fn sparkline_flat_line() {
        let mut t = Trend::new();
        record_all(&mut t, &[0.0, 0.0]);
        assert_eq!(t.sparkline(8), vec![0, 0]);
    }

    #[test]
    fn sparkline_with_unknown_rates() {
        let mut t = Trend::new();
        record_all(&mut t, &[f64::NAN, 4.0]);
        assert_eq!(t.sparkline(8), vec![0, 7]);
    }
}
