//! Escape-time iteration over a pixel grid.

use rayon::prelude::*;

use jset_core::Complex;

/// A point has escaped once its squared modulus exceeds this.
pub const SQ_MOD_LIMIT: f64 = 1_000_000.0;

/// The iterator applied at every pixel.
#[derive(Debug, Clone, Copy)]
pub enum Iteration<'a> {
    /// `z ← z² + c`, starting from zero.
    Mandelbrot,
    /// `z ← Σ cₖ zᵏ`, starting from the pixel's point. The slice holds the
    /// active coefficients, constant term first.
    Polynomial(&'a [Complex]),
}

impl Iteration<'_> {
    /// Number of steps before the orbit of `point` escapes, or `limit` if it
    /// never does.
    #[inline]
    pub fn escape_count(&self, point: Complex, limit: u16) -> u16 {
        match self {
            Iteration::Mandelbrot => mandelbrot_escape(point, limit),
            Iteration::Polynomial(coefficients) => polynomial_escape(point, coefficients, limit),
        }
    }
}

#[inline]
pub fn mandelbrot_escape(c: Complex, limit: u16) -> u16 {
    let mut z = Complex::ZERO;
    for n in 0..limit {
        z = z * z + c;
        if z.norm_sq() > SQ_MOD_LIMIT {
            return n;
        }
    }
    limit
}

#[inline]
pub fn polynomial_escape(start: Complex, coefficients: &[Complex], limit: u16) -> u16 {
    let mut z = start;
    for n in 0..limit {
        z = horner(coefficients, z);
        if z.norm_sq() > SQ_MOD_LIMIT {
            return n;
        }
    }
    limit
}

#[inline]
fn horner(coefficients: &[Complex], z: Complex) -> Complex {
    coefficients
        .iter()
        .rev()
        .fold(Complex::ZERO, |acc, &c| acc * z + c)
}

// ---------------------------------------------------------------------------
// Pixel grid
// ---------------------------------------------------------------------------

/// Maps pixel indices to plane points for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneGrid {
    pub width: usize,
    pub height: usize,
    pub origin_x: f64,
    pub origin_y: f64,
    pub plane_width: f64,
}

impl PlaneGrid {
    pub fn plane_height(&self) -> f64 {
        self.plane_width * self.height as f64 / self.width as f64
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Plane point of pixel `(px, py)`; `y` decreases downwards.
    #[inline]
    pub fn point(&self, px: usize, py: usize) -> Complex {
        Complex::new(
            self.origin_x + self.plane_width * (px as f64 / self.width as f64),
            self.origin_y - self.plane_height() * (py as f64 / self.height as f64),
        )
    }
}

/// Fill `counts` (row-major, `grid.width` per row) with escape counts.
pub fn fill_counts(grid: &PlaneGrid, iteration: Iteration<'_>, limit: u16, counts: &mut [u16]) {
    if grid.width == 0 {
        return;
    }
    counts[..grid.pixel_count()]
        .par_chunks_mut(grid.width)
        .enumerate()
        .for_each(|(py, row)| {
            for (px, count) in row.iter_mut().enumerate() {
                *count = iteration.escape_count(grid.point(px, py), limit);
            }
        });
}

/// Re-iterate only the pixels that ran off the end of a table of
/// `old_limit` entries, now allowing up to `limit` steps.
///
/// Returns how many pixels were recomputed.
pub fn extend_counts(
    grid: &PlaneGrid,
    iteration: Iteration<'_>,
    old_limit: u16,
    limit: u16,
    counts: &mut [u16],
) -> usize {
    if grid.width == 0 {
        return 0;
    }
    counts[..grid.pixel_count()]
        .par_chunks_mut(grid.width)
        .enumerate()
        .map(|(py, row)| {
            let mut redone = 0;
            for (px, count) in row.iter_mut().enumerate() {
                if *count >= old_limit {
                    *count = iteration.escape_count(grid.point(px, py), limit);
                    redone += 1;
                }
            }
            redone
        })
        .sum()
}
