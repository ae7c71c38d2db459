use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::physics::ColliderMaterial;

/// Errors raised while loading a [`FieldConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid field config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fixed_dt must be positive, got {0}")]
    NonPositiveDt(f32),

    #[error("max_steps_per_frame must be at least 1")]
    ZeroMaxSteps,
}

/// Configuration for a [`ShapeField`](crate::ShapeField).
///
/// Every key is optional when loading from JSON; missing keys fall back to
/// the values of [`FieldConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Gravity vector. Y-down coordinates, so positive Y pulls downward.
    /// Default: zero (no gravity).
    pub gravity: Vec2,
    /// Fixed physics timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum physics steps run for a single `advance` call (default: 10).
    pub max_steps_per_frame: u32,
    /// Material applied to the collider of every shape that does not set its own.
    pub material: ColliderMaterial,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::ZERO,
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            material: ColliderMaterial::default(),
        }
    }
}

impl FieldConfig {
    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checked by `from_json` and by `ShapeField::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_dt.is_nan() || self.fixed_dt <= 0.0 {
            return Err(ConfigError::NonPositiveDt(self.fixed_dt));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        Ok(())
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_fixed_dt(mut self, dt: f32) -> Self {
        self.fixed_dt = dt;
        self
    }

    pub fn with_max_steps_per_frame(mut self, steps: u32) -> Self {
        self.max_steps_per_frame = steps;
        self
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.material = material;
        self
    }
}
