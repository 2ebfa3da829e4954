/// Closed data interval shown along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// A zero or inverted span (e.g. an empty heatmap) is widened to one unit so
    /// projection never divides by zero.
    pub fn new(min: f64, max: f64) -> Self {
        if max.is_finite() && min.is_finite() && max > min {
            Self { min, max }
        } else {
            let min = if min.is_finite() { min } else { 0.0 };
            Self { min, max: min + 1.0 }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` inside the range, 0 at `min` and 1 at `max`.
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    pub fn contains(&self, value: f64) -> bool {
        let eps = self.span() * 1e-9;
        value >= self.min - eps && value <= self.max + eps
    }
}

/// Major and minor tick positions for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub step: f64,
    pub major: Vec<f64>,
    pub minor: Vec<f64>,
}

impl Ticks {
    pub fn for_range(range: AxisRange, max_intervals: usize) -> Self {
        let step = nice_step(range.span(), max_intervals);
        let major = multiples_in(range, step);

        let minor_step = step / minor_divisions(step) as f64;
        let minor = multiples_in(range, minor_step)
            .into_iter()
            .filter(|v| !major.iter().any(|m| (m - v).abs() < minor_step * 1e-6))
            .collect();

        Self { step, major, minor }
    }
}

/// Smallest step from the 1-2-2.5-5-10 ladder giving at most `max_intervals` intervals.
pub fn nice_step(span: f64, max_intervals: usize) -> f64 {
    if !(span.is_finite() && span > 0.0) {
        return 1.0;
    }
    let raw = span / max_intervals.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}

fn minor_divisions(step: f64) -> usize {
    let magnitude = 10f64.powf(step.log10().floor());
    let mantissa = step / magnitude;
    if (mantissa - 2.0).abs() < 1e-9 { 4 } else { 5 }
}

fn multiples_in(range: AxisRange, step: f64) -> Vec<f64> {
    let first = (range.min / step - 1e-9).ceil() as i64;
    let last = (range.max / step + 1e-9).floor() as i64;
    // snap away float noise like 0.6000000000000001
    let decimals = (2 - step.log10().floor() as i32).max(0);
    let scale = 10f64.powi(decimals);
    (first..=last)
        .map(|k| (k as f64 * step * scale).round() / scale)
        .filter(|v| range.contains(*v))
        .collect()
}
