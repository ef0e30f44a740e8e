//! Decorative sine-wave banner drawn behind the header text.

use ratatui::{
    Frame,
    layout::Rect,
    style::Color,
    widgets::canvas::{Canvas, Points},
};

/// Phase advance per animation tick, in radians.
const PHASE_STEP: f64 = 0.12;

struct Layer {
    amplitude: f64,
    /// Full periods across the banner width.
    periods: f64,
    speed: f64,
    offset: f64,
    color: Color,
}

const LAYERS: [Layer; 3] = [
    Layer {
        amplitude: 0.9,
        periods: 1.5,
        speed: 1.0,
        offset: 0.0,
        color: Color::Magenta,
    },
    Layer {
        amplitude: 0.6,
        periods: 2.5,
        speed: -1.4,
        offset: 1.3,
        color: Color::Cyan,
    },
    Layer {
        amplitude: 0.35,
        periods: 4.0,
        speed: 2.1,
        offset: 2.6,
        color: Color::Blue,
    },
];

/// Start/cancel handle for the header animation.
///
/// The banner never touches playback or the catalog; it only needs a tick per frame.
#[derive(Debug, Clone, Default)]
pub struct WaveBanner {
    phase: f64,
    running: bool,
}

impl WaveBanner {
    pub fn start() -> Self {
        Self {
            phase: 0.0,
            running: true,
        }
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self) {
        if self.running {
            self.phase = (self.phase + PHASE_STEP) % std::f64::consts::TAU;
        }
    }

    /// One point list per wave layer, `width` samples each, with y in `-1.0..=1.0`.
    ///
    /// A cancelled banner yields nothing.
    pub fn layers(&self, width: u16) -> Vec<Vec<(f64, f64)>> {
        if !self.running || width == 0 {
            return Vec::new();
        }
        let w = f64::from(width);
        LAYERS
            .iter()
            .map(|l| {
                (0..width)
                    .map(|x| {
                        let x = f64::from(x);
                        let angle = x / w * l.periods * std::f64::consts::TAU
                            + self.phase * l.speed
                            + l.offset;
                        (x, l.amplitude * angle.sin())
                    })
                    .collect()
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.running || area.width == 0 || area.height == 0 {
            return;
        }
        // Braille cells hold two dots across.
        let samples = area.width.saturating_mul(2);
        let layers = self.layers(samples);
        let canvas = Canvas::default()
            .x_bounds([0.0, f64::from(samples)])
            .y_bounds([-1.0, 1.0])
            .paint(|ctx| {
                for (points, layer) in layers.iter().zip(LAYERS.iter()) {
                    ctx.draw(&Points {
                        coords: points,
                        color: layer.color,
                    });
                }
            });
        frame.render_widget(canvas, area);
    }
}
