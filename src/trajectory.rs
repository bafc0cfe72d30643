//! Closed-form arc sampling and letter selection.
//!
//! Everything here lives in one virtual coordinate space: 1000 units wide,
//! 400 tall, y growing downward, with the ground line at y = 350. A shot
//! may travel past the right edge; such landings are simply off target.

use crate::controls::Controls;

pub(crate) const VIEW_WIDTH: f64 = 1000.0;
pub(crate) const VIEW_HEIGHT: f64 = 400.0;
pub(crate) const GROUND_Y: f64 = 350.0;
pub(crate) const LANDING_TOLERANCE: f64 = 10.0;

pub(crate) const MAX_RANGE: f64 = 1500.0;
pub(crate) const SAMPLE_STEPS: usize = 200;

pub(crate) const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl Point {
    pub(crate) fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A sampled flight path. Always holds `SAMPLE_STEPS + 1` points.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Trajectory {
    points: Vec<Point>,
}

impl Trajectory {
    pub(crate) fn from_controls(c: &Controls) -> Self {
        compute_trajectory(c.power() as f64, c.gravity() as f64, c.scale() as f64)
    }

    #[cfg(test)]
    pub(crate) fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    /// The first `len` points, capped at the full path.
    pub(crate) fn prefix(&self, len: usize) -> &[Point] {
        &self.points[..len.min(self.points.len())]
    }

    pub(crate) fn landing_point(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

pub(crate) fn compute_trajectory(power: f64, gravity: f64, scale: f64) -> Trajectory {
    let range = (power / 100.0) * MAX_RANGE;
    let max_height = 10.0 + (scale / 100.0) * 600.0;
    let gravity_factor = 1.0 + gravity / 25.0;

    let points = (0..=SAMPLE_STEPS)
        .map(|i| {
            let t = i as f64 / SAMPLE_STEPS as f64;
            let h = 4.0 * max_height * t * (1.0 - t);
            let y_offset = (h / gravity_factor).clamp(-200.0, 550.0);
            Point::new(t * range, GROUND_Y - y_offset)
        })
        .collect();

    Trajectory { points }
}

/// Maps x onto 26 equal bins across the visible width.
pub(crate) fn select_letter(x: f64) -> char {
    let idx = ((x / VIEW_WIDTH) * ALPHABET.len() as f64).floor();
    let idx = idx.clamp(0.0, (ALPHABET.len() - 1) as f64) as usize;
    ALPHABET[idx]
}

/// Centre of the bin for the letter at `index`; used for tick marks.
pub(crate) fn letter_center_x(index: usize) -> f64 {
    let w = VIEW_WIDTH / ALPHABET.len() as f64;
    index as f64 * w + w / 2.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Landing {
    Letter(char),
    OffTarget,
}

impl Landing {
    pub(crate) fn letter(self) -> Option<char> {
        match self {
            Landing::Letter(c) => Some(c),
            Landing::OffTarget => None,
        }
    }
}

/// Accepts only points on the visible ground band.
pub(crate) fn judge_landing(p: Point) -> Landing {
    let on_strip = (0.0..=VIEW_WIDTH).contains(&p.x);
    let near_ground =
        ((GROUND_Y - LANDING_TOLERANCE)..=(GROUND_Y + LANDING_TOLERANCE)).contains(&p.y);
    if on_strip && near_ground {
        Landing::Letter(select_letter(p.x))
    } else {
        Landing::OffTarget
    }
}
