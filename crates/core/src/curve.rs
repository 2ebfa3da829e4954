use crate::types::HeatmapSample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Step-function polyline rebuilt from heatmap samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    pub points: Vec<CurvePoint>,
    pub max_time: f64,
}

impl Curve {
    /// Rebuild the curve from ordered samples.
    ///
    /// Every sample contributes its `(start, value)` point, every sample but the last
    /// also its `(end, value)` point, and the last sample closes the curve at its end.
    /// Gaps between samples are kept as-is.
    pub fn from_samples(samples: &[HeatmapSample]) -> Self {
        let mut points = Vec::with_capacity(samples.len() * 2);

        for (i, sample) in samples.iter().enumerate() {
            points.push(CurvePoint::new(sample.start_time, sample.value));
            if i + 1 < samples.len() {
                points.push(CurvePoint::new(sample.end_time, sample.value));
            }
        }

        if let Some(last) = samples.last() {
            points.push(CurvePoint::new(last.end_time, last.value));
        }

        Self {
            points,
            max_time: max_end_time(samples),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, i.e. the polyline segments.
    pub fn segments(&self) -> impl Iterator<Item = (CurvePoint, CurvePoint)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Largest `end_time` over all samples, 0 when there are none.
pub fn max_end_time(samples: &[HeatmapSample]) -> f64 {
    samples
        .iter()
        .map(|s| s.end_time)
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |m| m.max(t))))
        .unwrap_or(0.0)
}
