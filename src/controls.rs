use crate::error::ControlError;
use std::fmt;
use std::ops::RangeInclusive;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Param {
    Power,
    Gravity,
    Scale,
}

impl Param {
    pub(crate) const ALL: [Param; 3] = [Param::Power, Param::Gravity, Param::Scale];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Param::Power => "Power",
            Param::Gravity => "Gravity",
            Param::Scale => "Scale",
        }
    }

    /// What the slider visibly does to the arc.
    pub(crate) fn hint(self) -> &'static str {
        match self {
            Param::Power => "distance",
            Param::Gravity => "height",
            Param::Scale => "curveness",
        }
    }

    pub(crate) fn range(self) -> RangeInclusive<u8> {
        match self {
            Param::Power | Param::Gravity => 0..=100,
            Param::Scale => 1..=100,
        }
    }

    /// Cycles through the sliders; wraps at both ends.
    pub(crate) fn step(self, delta: i32) -> Param {
        let len = Self::ALL.len() as i32;
        let cur = Self::ALL.iter().position(|p| *p == self).unwrap_or(0) as i32;
        let next = (cur + delta).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three launch parameters. Values are always inside `Param::range`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Controls {
    power: u8,
    gravity: u8,
    scale: u8,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            power: 50,
            gravity: 50,
            scale: 50,
        }
    }
}

impl Controls {
    pub(crate) fn new(power: i64, gravity: i64, scale: i64) -> Result<Self, ControlError> {
        Self::default()
            .with(Param::Power, power)?
            .with(Param::Gravity, gravity)?
            .with(Param::Scale, scale)
    }

    pub(crate) fn get(&self, param: Param) -> u8 {
        match param {
            Param::Power => self.power,
            Param::Gravity => self.gravity,
            Param::Scale => self.scale,
        }
    }

    pub(crate) fn power(&self) -> u8 {
        self.power
    }

    pub(crate) fn gravity(&self) -> u8 {
        self.gravity
    }

    pub(crate) fn scale(&self) -> u8 {
        self.scale
    }

    /// Returns a copy with `param` set to `value`, rejecting values outside its range.
    pub(crate) fn with(self, param: Param, value: i64) -> Result<Self, ControlError> {
        let range = param.range();
        let (min, max) = (*range.start(), *range.end());
        if value < min as i64 || value > max as i64 {
            return Err(ControlError::OutOfRange {
                param,
                value,
                min,
                max,
            });
        }
        let mut next = self;
        let v = value as u8;
        match param {
            Param::Power => next.power = v,
            Param::Gravity => next.gravity = v,
            Param::Scale => next.scale = v,
        }
        Ok(next)
    }

    /// Slider nudge: moves `param` by `delta`, saturating at the bounds.
    pub(crate) fn nudged(self, param: Param, delta: i32) -> Self {
        let range = param.range();
        let v = (self.get(param) as i64 + delta as i64)
            .clamp(*range.start() as i64, *range.end() as i64);
        // clamped above, so `with` cannot fail
        self.with(param, v).unwrap_or(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_starting_sliders() {
        let c = Controls::default();
        assert_eq!((c.power(), c.gravity(), c.scale()), (50, 50, 50));
    }

    #[test]
    fn scale_rejects_zero_but_power_accepts_it() {
        assert!(Controls::new(0, 0, 1).is_ok());
        let err = Controls::new(0, 0, 0).unwrap_err();
        assert_eq!(
            err,
            ControlError::OutOfRange {
                param: Param::Scale,
                value: 0,
                min: 1,
                max: 100
            }
        );
        assert_eq!(err.to_string(), "Scale must be within 1..=100, got 0");
    }

    #[test]
    fn out_of_range_values_are_errors() {
        assert!(Controls::new(101, 50, 50).is_err());
        assert!(Controls::new(50, -1, 50).is_err());
        assert!(Controls::new(50, 50, 500).is_err());
    }

    #[test]
    fn nudge_saturates_at_bounds() {
        let c = Controls::new(98, 2, 3).unwrap();
        let c = c.nudged(Param::Power, 10);
        assert_eq!(c.power(), 100);
        let c = c.nudged(Param::Gravity, -10);
        assert_eq!(c.gravity(), 0);
        let c = c.nudged(Param::Scale, -10);
        assert_eq!(c.scale(), 1);
        assert_eq!(c.nudged(Param::Power, -1).power(), 99);
    }

    #[test]
    fn param_step_wraps() {
        assert_eq!(Param::Power.step(1), Param::Gravity);
        assert_eq!(Param::Scale.step(1), Param::Power);
        assert_eq!(Param::Power.step(-1), Param::Scale);
    }
}
