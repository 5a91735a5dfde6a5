use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use jset_core::capacity::MAX_COEFFICIENTS;
use jset_core::gradient::default_gradient;
use jset_core::{PolarCoefficient, RawGradientStep, ViewportState};

// ---------------------------------------------------------------------------
// Polynomial form defaults
// ---------------------------------------------------------------------------

/// Initial contents of the polynomial iterator inputs in the settings panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialDefaults {
    /// Number of active coefficients (polynomial degree + 1).
    #[serde(default = "default_coefficient_count")]
    pub count: usize,
    /// One `(r, t)` pair per slot, constant term first.
    #[serde(default = "default_coefficients")]
    pub coefficients: Vec<PolarCoefficient>,
}

fn default_coefficient_count() -> usize {
    3
}

fn default_coefficients() -> Vec<PolarCoefficient> {
    let mut coefficients = vec![
        PolarCoefficient::new(0.8151, 0.9387),
        PolarCoefficient::new(0.0, 0.0),
        PolarCoefficient::new(1.0, 0.0),
    ];
    coefficients.resize(MAX_COEFFICIENTS, PolarCoefficient::new(0.0, 0.0));
    coefficients
}

impl Default for PolynomialDefaults {
    fn default() -> Self {
        Self {
            count: default_coefficient_count(),
            coefficients: default_coefficients(),
        }
    }
}

impl PolynomialDefaults {
    /// Force the count into `1..=MAX_COEFFICIENTS` and pad the slots with
    /// zero coefficients, so the form always has every slot to show.
    fn normalize(&mut self) {
        self.count = self.count.clamp(1, MAX_COEFFICIENTS);
        self.coefficients
            .retain(|c| c.r.is_finite() && c.t.is_finite());
        self.coefficients
            .resize(MAX_COEFFICIENTS, PolarCoefficient::new(0.0, 0.0));
    }
}

// ---------------------------------------------------------------------------
// Viewer config
// ---------------------------------------------------------------------------

/// Startup settings, read once from `jset.json` next to the executable.
///
/// The file is never written; every field falls back to its default when
/// missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default)]
    pub viewport: ViewportState,
    #[serde(default = "default_gradient")]
    pub gradient: Vec<RawGradientStep>,
    #[serde(default)]
    pub polynomial: PolynomialDefaults,
    /// Engine smoothing amount; below 0.05 means off.
    #[serde(default)]
    pub smoothing: f32,
}

fn default_window_width() -> f32 {
    1280.0
}

fn default_window_height() -> f32 {
    900.0
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            viewport: ViewportState::default(),
            gradient: default_gradient(),
            polynomial: PolynomialDefaults::default(),
            smoothing: 0.0,
        }
    }
}

impl ViewerConfig {
    /// Load the config at `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    error!("Failed to parse config: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read config file: {e}");
                Self::default()
            }
        }
    }

    /// Parse and sanitize. An invalid startup view is replaced by the default
    /// view rather than rejecting the whole file.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        if let Err(e) = config.viewport.validate() {
            warn!("Ignoring configured viewport: {e}");
            config.viewport = ViewportState::default();
        }
        config.polynomial.normalize();
        if !(config.window_width > 0.0 && config.window_height > 0.0) {
            config.window_width = default_window_width();
            config.window_height = default_window_height();
        }
        Ok(config)
    }
}
