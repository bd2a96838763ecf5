use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Clamp `v` into `[vmin, vmax]` and map it affinely onto `[tmin, tmax]`.
///
/// Never panics. A degenerate source range (`vmin == vmax`) or a NaN input
/// yields `tmin`. Infinite inputs clamp like any other. The target range may
/// be inverted.
pub fn remap(v: f32, vmin: f32, vmax: f32, tmin: f32, tmax: f32) -> f32 {
    if v.is_nan() {
        return tmin;
    }
    let clamped = v.min(vmax).max(vmin);
    let dv = vmax - vmin;
    if dv == 0.0 {
        return tmin;
    }
    let fraction = (clamped - vmin) / dv;
    tmin + fraction * (tmax - tmin)
}

/// A validated source-to-target range mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeMap {
    pub source_min: f32,
    pub source_max: f32,
    pub target_min: f32,
    pub target_max: f32,
}

impl RangeMap {
    pub fn new(
        source_min: f32,
        source_max: f32,
        target_min: f32,
        target_max: f32,
    ) -> Result<Self, ConfigError> {
        let map = Self {
            source_min,
            source_max,
            target_min,
            target_max,
        };
        map.validate()?;
        Ok(map)
    }

    /// The source range must be finite and strictly increasing; the target
    /// only needs to be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.source_min,
            self.source_max,
            self.target_min,
            self.target_max,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite || self.source_min >= self.source_max {
            return Err(ConfigError::DegenerateRange {
                source_min: self.source_min,
                source_max: self.source_max,
            });
        }
        Ok(())
    }

    pub fn apply(&self, v: f32) -> f32 {
        remap(
            v,
            self.source_min,
            self.source_max,
            self.target_min,
            self.target_max,
        )
    }
}
