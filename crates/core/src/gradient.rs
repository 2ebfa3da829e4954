/// Linear RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Color, t: f64) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// dark blue → medium blue → red → dark red
pub const REPLAY_ANCHORS: [Color; 4] = [
    Color::new(0.1, 0.1, 0.5),
    Color::new(0.2, 0.2, 0.8),
    Color::new(0.8, 0.2, 0.2),
    Color::new(0.5, 0.0, 0.0),
];

pub const REPLAY_STEPS: usize = 100;

/// Color lookup table sampled from evenly spaced anchors.
#[derive(Debug, Clone)]
pub struct Gradient {
    lut: Vec<Color>,
}

impl Gradient {
    pub fn new(anchors: &[Color], steps: usize) -> Self {
        let steps = steps.max(2);
        let lut = (0..steps)
            .map(|k| blend_anchors(anchors, k as f64 / (steps - 1) as f64))
            .collect();
        Self { lut }
    }

    /// The "Most Replayed" blue-to-red map.
    pub fn replay() -> Self {
        Self::new(&REPLAY_ANCHORS, REPLAY_STEPS)
    }

    pub fn steps(&self) -> usize {
        self.lut.len()
    }

    /// Color for `value`, clamped into `[0, 1]`. NaN maps to the low end.
    pub fn map(&self, value: f64) -> Color {
        self.lut[self.index(value)]
    }

    pub fn index(&self, value: f64) -> usize {
        let n = self.lut.len();
        if value.is_nan() || value <= 0.0 {
            return 0;
        }
        ((value * n as f64).floor() as usize).min(n - 1)
    }

    pub fn colors(&self) -> &[Color] {
        &self.lut
    }
}

fn blend_anchors(anchors: &[Color], position: f64) -> Color {
    match anchors {
        [] => Color::new(0.0, 0.0, 0.0),
        [only] => *only,
        _ => {
            let scaled = position.clamp(0.0, 1.0) * (anchors.len() - 1) as f64;
            let lo = (scaled.floor() as usize).min(anchors.len() - 2);
            anchors[lo].lerp(anchors[lo + 1], scaled - lo as f64)
        }
    }
}
