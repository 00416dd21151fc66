//! Visual encoding of rate and error signals.
//!
//! Each entity is drawn as a circle whose position and radius follow its
//! per-host request rate and whose colour follows its error percentage.
//! Renderers that cannot draw circles (the terminal UI) still use the
//! colours.

use serde::Serialize;

/// Circle position range, in percent of the chart area.
const POSITION_RANGE: (f64, f64) = (30.0, 40.0);
/// Circle radius range, in pixels.
const RADIUS_RANGE: (f64, f64) = (5.0, 125.0);

/// Rate domain for circuits (requests per second per host).
pub const CIRCUIT_RATE_DOMAIN: f64 = 400.0;
/// Rate domain for thread pools (executions per second per host).
pub const THREAD_POOL_RATE_DOMAIN: f64 = 2000.0;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const AMBER: Rgb = Rgb(0xFF, 0xCC, 0x00);
    pub const ORANGE: Rgb = Rgb(0xFF, 0x99, 0x00);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREY: Rgb = Rgb(128, 128, 128);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Piecewise-linear colour scale over ascending stops.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    stops: [(f64, Rgb); 4],
}

/// Circle fill by error percentage.
pub const HEALTH_COLORS: ColorScale = ColorScale {
    stops: [
        (10.0, Rgb::GREEN),
        (25.0, Rgb::AMBER),
        (40.0, Rgb::ORANGE),
        (50.0, Rgb::RED),
    ],
};

/// Error percentage text colour.
pub const ERROR_TEXT_COLORS: ColorScale = ColorScale {
    stops: [
        (0.0, Rgb::GREY),
        (10.0, Rgb::BLACK),
        (35.0, Rgb::ORANGE),
        (50.0, Rgb::RED),
    ],
};

impl ColorScale {
    /// Colour for `value`. Values outside the stops clamp to the end colours;
    /// NaN maps to the first stop.
    pub fn color(&self, value: f64) -> Rgb {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if value.is_nan() || value <= first.0 {
            return first.1;
        }
        if value >= last.0 {
            return last.1;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if value <= hi.0 {
                let t = (value - lo.0) / (hi.0 - lo.0);
                return lo.1.lerp(hi.1, t);
            }
        }
        last.1
    }
}

/// Where and how to draw an entity's circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Indicator {
    /// Horizontal centre, percent.
    pub x: f64,
    /// Vertical centre, percent.
    pub y: f64,
    /// Radius in pixels.
    pub radius: f64,
    pub color: Rgb,
}

impl Default for Indicator {
    fn default() -> Self {
        Self {
            x: POSITION_RANGE.0,
            y: POSITION_RANGE.0,
            radius: RADIUS_RANGE.0,
            color: Rgb::GREEN,
        }
    }
}

impl Indicator {
    /// Encode a per-host rate over `[0, domain]` and an error signal.
    ///
    /// An unknown (NaN) rate draws the smallest circle; position and radius
    /// are capped at the top of their ranges.
    pub fn encode(rate_per_host: f64, error_percentage: f64, domain: f64) -> Self {
        let rate = if rate_per_host.is_nan() {
            0.0
        } else {
            rate_per_host
        };
        let position = linear(rate, domain, POSITION_RANGE).min(POSITION_RANGE.1);
        let radius = sqrt_scale(rate, domain, RADIUS_RANGE).min(RADIUS_RANGE.1);
        Self {
            x: position,
            y: position,
            radius,
            color: HEALTH_COLORS.color(error_percentage),
        }
    }
}

fn linear(value: f64, domain: f64, range: (f64, f64)) -> f64 {
    range.0 + (value / domain) * (range.1 - range.0)
}

/// Power scale with exponent 0.5 over `[0, domain]`. Negative inputs keep
/// their sign, as d3's pow scale does.
fn sqrt_scale(value: f64, domain: f64, range: (f64, f64)) -> f64 {
    let t = value.signum() * value.abs().sqrt() / domain.sqrt();
    range.0 + t * (range.1 - range.0)
}
