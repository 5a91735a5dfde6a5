use serde::{Deserialize, Serialize};

use crate::capacity::{MAX_PIXEL_HEIGHT, MAX_PIXEL_WIDTH};
use crate::error::CoreError;
use crate::iterator::IteratorSpec;

/// The visible region of the complex plane and the image it is drawn into.
///
/// `(origin_x, origin_y)` is the plane point under the upper-left pixel.
/// Only the plane *width* is stored; the height is always derived from the
/// pixel aspect ratio so the two can never drift apart.
///
/// Transitions never patch a state in place: every gesture produces a new
/// `ViewportState` that the owner installs wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Image width in pixels.
    pub pixel_width: u32,

    /// Image height in pixels.
    pub pixel_height: u32,

    /// Real coordinate of the upper-left corner.
    pub origin_x: f64,

    /// Imaginary coordinate of the upper-left corner.
    pub origin_y: f64,

    /// Width of the visible region on the complex plane.
    pub plane_width: f64,

    /// Multiplicative step used by modified clicks and the zoom buttons.
    pub zoom_factor: f64,

    /// Active iterator.
    #[serde(default)]
    pub iterator: IteratorSpec,
}

impl ViewportState {
    pub const DEFAULT_PIXEL_WIDTH: u32 = 1200;
    pub const DEFAULT_PIXEL_HEIGHT: u32 = 800;
    pub const DEFAULT_ZOOM_FACTOR: f64 = 2.0;

    /// Create a view state with explicit parameters.
    pub fn new(
        pixel_width: u32,
        pixel_height: u32,
        origin_x: f64,
        origin_y: f64,
        plane_width: f64,
        zoom_factor: f64,
        iterator: IteratorSpec,
    ) -> crate::Result<Self> {
        let state = Self {
            pixel_width,
            pixel_height,
            origin_x,
            origin_y,
            plane_width,
            zoom_factor,
            iterator,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check every field invariant; used after deserialization as well.
    pub fn validate(&self) -> crate::Result<()> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "dimensions must be > 0, got {}×{}",
                    self.pixel_width, self.pixel_height
                ),
            });
        }
        if self.pixel_width > MAX_PIXEL_WIDTH || self.pixel_height > MAX_PIXEL_HEIGHT {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "dimensions exceed {MAX_PIXEL_WIDTH}×{MAX_PIXEL_HEIGHT}, got {}×{}",
                    self.pixel_width, self.pixel_height
                ),
            });
        }
        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "origin must be finite, got ({}, {})",
                    self.origin_x, self.origin_y
                ),
            });
        }
        if self.plane_width <= 0.0 || !self.plane_width.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "plane width must be positive and finite, got {}",
                    self.plane_width
                ),
            });
        }
        if self.zoom_factor <= 0.0 || !self.zoom_factor.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!(
                    "zoom factor must be positive and finite, got {}",
                    self.zoom_factor
                ),
            });
        }
        self.iterator.validate()
    }

    /// Height of the visible region, derived from the pixel aspect ratio.
    #[inline]
    pub fn plane_height(&self) -> f64 {
        self.plane_width * self.pixel_height as f64 / self.pixel_width as f64
    }

    /// Plane point under the middle of the image.
    pub fn center(&self) -> (f64, f64) {
        (
            self.origin_x + self.plane_width / 2.0,
            self.origin_y - self.plane_height() / 2.0,
        )
    }

    /// Bytes in the RGBA readback region for this image size.
    pub fn rgba_len(&self) -> usize {
        4 * self.pixel_width as usize * self.pixel_height as usize
    }

    /// Same view with a new pixel size. Out-of-range sizes are clamped into
    /// `1..=max` rather than rejected.
    pub fn with_pixel_size(&self, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            pixel_width: pixel_width.clamp(1, MAX_PIXEL_WIDTH),
            pixel_height: pixel_height.clamp(1, MAX_PIXEL_HEIGHT),
            ..self.clone()
        }
    }

    /// Same view with a new zoom step. Non-positive or non-finite values
    /// keep the current factor.
    pub fn with_zoom_factor(&self, zoom_factor: f64) -> Self {
        let zoom_factor = if zoom_factor > 0.0 && zoom_factor.is_finite() {
            zoom_factor
        } else {
            self.zoom_factor
        };
        Self {
            zoom_factor,
            ..self.clone()
        }
    }

    /// Same view with a different iterator.
    pub fn with_iterator(&self, iterator: IteratorSpec) -> Self {
        Self {
            iterator,
            ..self.clone()
        }
    }

    /// True when moving from `self` to `other` invalidates the engine's
    /// per-pixel iteration data without any change to the plane region:
    /// the image size or the iterator differs.
    pub fn iteration_inputs_differ(&self, other: &Self) -> bool {
        self.pixel_width != other.pixel_width
            || self.pixel_height != other.pixel_height
            || self.iterator != other.iterator
    }
}

impl Default for ViewportState {
    /// Startup view: the whole Mandelbrot set in a 1200×800 image.
    fn default() -> Self {
        Self {
            pixel_width: Self::DEFAULT_PIXEL_WIDTH,
            pixel_height: Self::DEFAULT_PIXEL_HEIGHT,
            origin_x: -2.0,
            origin_y: 1.0,
            plane_width: 3.0,
            zoom_factor: Self::DEFAULT_ZOOM_FACTOR,
            iterator: IteratorSpec::Mandelbrot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterator::PolarCoefficient;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn default_viewport() {
        let vp = ViewportState::default();
        assert_eq!(vp.pixel_width, 1200);
        assert_eq!(vp.pixel_height, 800);
        assert!((vp.plane_height() - 2.0).abs() < EPSILON);
        let (cx, cy) = vp.center();
        assert!((cx - (-0.5)).abs() < EPSILON);
        assert!(cy.abs() < EPSILON);
        assert!(vp.validate().is_ok());
    }

    #[test]
    fn plane_height_follows_pixel_aspect() {
        let vp = ViewportState::default().with_pixel_size(400, 400);
        assert!((vp.plane_height() - vp.plane_width).abs() < EPSILON);
    }

    #[test]
    fn invalid_dimensions() {
        let it = IteratorSpec::Mandelbrot;
        assert!(ViewportState::new(0, 100, 0.0, 0.0, 1.0, 2.0, it.clone()).is_err());
        assert!(ViewportState::new(100, 0, 0.0, 0.0, 1.0, 2.0, it.clone()).is_err());
        assert!(ViewportState::new(4000, 100, 0.0, 0.0, 1.0, 2.0, it).is_err());
    }

    #[test]
    fn invalid_width_and_zoom() {
        let it = IteratorSpec::Mandelbrot;
        assert!(ViewportState::new(100, 100, 0.0, 0.0, 0.0, 2.0, it.clone()).is_err());
        assert!(ViewportState::new(100, 100, 0.0, 0.0, f64::NAN, 2.0, it.clone()).is_err());
        assert!(ViewportState::new(100, 100, 0.0, 0.0, 1.0, -2.0, it.clone()).is_err());
        assert!(ViewportState::new(100, 100, f64::INFINITY, 0.0, 1.0, 2.0, it).is_err());
    }

    #[test]
    fn invalid_iterator_is_rejected() {
        let it = IteratorSpec::Polynomial {
            coefficients: Vec::new(),
        };
        assert!(ViewportState::new(100, 100, 0.0, 0.0, 1.0, 2.0, it).is_err());
    }

    #[test]
    fn pixel_size_is_clamped() {
        let vp = ViewportState::default().with_pixel_size(0, 5000);
        assert_eq!(vp.pixel_width, 1);
        assert_eq!(vp.pixel_height, MAX_PIXEL_HEIGHT);
    }

    #[test]
    fn bad_zoom_factor_keeps_previous() {
        let vp = ViewportState::default();
        assert_eq!(vp.with_zoom_factor(0.0).zoom_factor, 2.0);
        assert_eq!(vp.with_zoom_factor(f64::NAN).zoom_factor, 2.0);
        assert_eq!(vp.with_zoom_factor(3.5).zoom_factor, 3.5);
    }

    #[test]
    fn iteration_inputs_ignore_zoom_factor() {
        let vp = ViewportState::default();
        assert!(!vp.iteration_inputs_differ(&vp.with_zoom_factor(4.0)));
        assert!(vp.iteration_inputs_differ(&vp.with_pixel_size(800, 800)));
        let poly =
            IteratorSpec::polynomial(vec![PolarCoefficient::new(1.0, 0.0)]).unwrap();
        assert!(vp.iteration_inputs_differ(&vp.with_iterator(poly)));
    }

    #[test]
    fn rgba_len() {
        assert_eq!(ViewportState::default().rgba_len(), 4 * 1200 * 800);
    }

    #[test]
    fn deserializes_without_iterator() {
        let json = r#"{
            "pixel_width": 640, "pixel_height": 480,
            "origin_x": -2.0, "origin_y": 1.0,
            "plane_width": 3.0, "zoom_factor": 2.0
        }"#;
        let vp: ViewportState = serde_json::from_str(json).unwrap();
        assert_eq!(vp.iterator, IteratorSpec::Mandelbrot);
        assert!(vp.validate().is_ok());
    }
}
