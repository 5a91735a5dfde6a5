use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::capacity::MAX_COEFFICIENTS;
use crate::complex::Complex;
use crate::error::CoreError;

/// A polynomial coefficient as entered on the form: magnitude `r` and a
/// phase given as a fraction `t` of π.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarCoefficient {
    pub r: f64,
    pub t: f64,
}

impl PolarCoefficient {
    pub fn new(r: f64, t: f64) -> Self {
        Self { r, t }
    }

    /// The coefficient value `r · e^(iπt)` sent to the engine.
    #[inline]
    pub fn to_complex(self) -> Complex {
        Complex::from_polar(self.r, PI * self.t)
    }
}

/// Engine-side iterator selector passed to the reiterate entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorKind {
    Mandelbrot,
    Polynomial,
}

/// Which escape-time iterator the engine runs.
///
/// `Polynomial` iterates `z ← Σ cₖ zᵏ` starting from the pixel's own point;
/// `coefficients[0]` is the constant term.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IteratorSpec {
    #[default]
    Mandelbrot,
    Polynomial { coefficients: Vec<PolarCoefficient> },
}

impl IteratorSpec {
    /// Build a validated polynomial iterator.
    pub fn polynomial(coefficients: Vec<PolarCoefficient>) -> crate::Result<Self> {
        let spec = Self::Polynomial { coefficients };
        spec.validate()?;
        Ok(spec)
    }

    /// Range and count checks only; the polynomial itself may be anything.
    pub fn validate(&self) -> crate::Result<()> {
        let Self::Polynomial { coefficients } = self else {
            return Ok(());
        };
        if coefficients.is_empty() || coefficients.len() > MAX_COEFFICIENTS {
            return Err(CoreError::InvalidIterator {
                reason: format!(
                    "coefficient count must be 1..={MAX_COEFFICIENTS}, got {}",
                    coefficients.len()
                ),
            });
        }
        if let Some((n, c)) = coefficients
            .iter()
            .enumerate()
            .find(|(_, c)| !c.r.is_finite() || !c.t.is_finite())
        {
            return Err(CoreError::InvalidIterator {
                reason: format!("coefficient {n} is not finite (r = {}, t = {})", c.r, c.t),
            });
        }
        Ok(())
    }

    pub fn kind(&self) -> IteratorKind {
        match self {
            Self::Mandelbrot => IteratorKind::Mandelbrot,
            Self::Polynomial { .. } => IteratorKind::Polynomial,
        }
    }

    /// Coefficients in engine form, capped at the engine's slot count.
    ///
    /// Empty for the Mandelbrot iterator, which takes no parameters.
    pub fn engine_coefficients(&self) -> Vec<Complex> {
        match self {
            Self::Mandelbrot => Vec::new(),
            Self::Polynomial { coefficients } => coefficients
                .iter()
                .take(MAX_COEFFICIENTS)
                .map(|c| c.to_complex())
                .collect(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Polynomial { .. } => "Polynomial",
        }
    }
}
