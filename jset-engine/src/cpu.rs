use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{error, warn};

use jset_core::capacity::{MAX_COEFFICIENTS, MAX_GRADIENT_STEPS, MAX_PIXEL_HEIGHT, MAX_PIXEL_WIDTH};
use jset_core::{Complex, GradientStep, IteratorKind};
use jset_render::{debug_line, Engine, EngineHost};

use crate::color_table::ColorTable;
use crate::iterate::{extend_counts, fill_counts, Iteration, PlaneGrid};
use crate::smooth::{normalize_amount, smooth_rgba};

const PIXEL_CAPACITY: usize = MAX_PIXEL_WIDTH as usize * MAX_PIXEL_HEIGHT as usize;

const EMPTY_STEP: GradientStep = GradientStep {
    start: [0; 3],
    end: [0; 3],
    shades: 0,
};

fn iteration_for(kind: IteratorKind, coefficients: &[Complex]) -> Iteration<'_> {
    match kind {
        IteratorKind::Mandelbrot => Iteration::Mandelbrot,
        IteratorKind::Polynomial => Iteration::Polynomial(coefficients),
    }
}

/// Counters describing the work done by the most recent calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Completed full-image iteration passes.
    pub full_passes: u64,
    /// Pixels recomputed by the last recolor (zero when the table had not
    /// grown).
    pub last_recolor_reiterated: usize,
}

/// The view that produced the current escape counts.
#[derive(Debug, Clone, Copy)]
struct DrawParams {
    grid: PlaneGrid,
    iterator: IteratorKind,
    /// Table length the counts were computed against.
    counted_against: usize,
}

/// Reference engine that does all of its work on the CPU.
///
/// Buffers are sized once for the largest image. Image dimensions beyond
/// capacity are clamped. A panic inside any call is caught, reported through
/// [`EngineHost::fault`], and leaves the engine permanently faulted.
pub struct CpuEngine {
    image: Vec<u8>,
    counts: Vec<u16>,
    table: ColorTable,
    steps: [GradientStep; MAX_GRADIENT_STEPS],
    step_count: usize,
    coefficients: [Complex; MAX_COEFFICIENTS],
    coefficient_count: usize,
    draw: DrawParams,
    smoothing: Option<f32>,
    poisoned: bool,
    stats: EngineStats,
}

impl CpuEngine {
    pub fn new() -> Self {
        Self {
            image: vec![0; 4 * PIXEL_CAPACITY],
            counts: vec![0; PIXEL_CAPACITY],
            table: ColorTable::default(),
            steps: [EMPTY_STEP; MAX_GRADIENT_STEPS],
            step_count: 0,
            coefficients: [Complex::ZERO; MAX_COEFFICIENTS],
            coefficient_count: 1,
            draw: DrawParams {
                grid: PlaneGrid {
                    width: 0,
                    height: 0,
                    origin_x: -2.0,
                    origin_y: 1.0,
                    plane_width: 3.0,
                },
                iterator: IteratorKind::Mandelbrot,
                counted_against: 0,
            },
            smoothing: None,
            poisoned: false,
            stats: EngineStats::default(),
        }
    }

    /// Enable 2×2 smoothing of the final image. Amounts below 0.05 disable
    /// it; amounts are capped at 1.
    pub fn with_smoothing(mut self, amount: f32) -> Self {
        self.set_smoothing(amount);
        self
    }

    pub fn set_smoothing(&mut self, amount: f32) {
        self.smoothing = normalize_amount(amount);
    }

    pub fn smoothing(&self) -> Option<f32> {
        self.smoothing
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn color_table_len(&self) -> usize {
        self.table.len()
    }

    /// Escape counts of the last drawn image, row-major.
    pub fn escape_counts(&self) -> &[u16] {
        &self.counts[..self.draw.grid.pixel_count()]
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Run `f`, turning a panic into a fault. Once faulted, every later
    /// call just re-raises the fault.
    fn guarded(
        &mut self,
        host: &mut dyn EngineHost,
        f: impl FnOnce(&mut Self, &mut dyn EngineHost),
    ) {
        if self.poisoned {
            host.fault();
            return;
        }
        let outcome = catch_unwind(AssertUnwindSafe(|| f(self, host)));
        if outcome.is_err() {
            error!("Engine computation panicked");
            self.poisoned = true;
            host.fault();
        }
    }

    /// Color the current counts into the image, then smooth if enabled.
    fn paint(&mut self) {
        let n = self.draw.grid.pixel_count();
        let table = &self.table;
        self.image[..4 * n]
            .par_chunks_mut(4)
            .zip(self.counts[..n].par_iter())
            .for_each(|(px, &count)| px.copy_from_slice(&table.color(count)));

        if let Some(amount) = self.smoothing {
            smooth_rgba(
                &mut self.image,
                self.draw.grid.width,
                self.draw.grid.height,
                amount,
            );
        }
    }
}

impl Default for CpuEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CpuEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuEngine")
            .field("draw", &self.draw)
            .field("table_len", &self.table.len())
            .field("step_count", &self.step_count)
            .field("coefficient_count", &self.coefficient_count)
            .field("smoothing", &self.smoothing)
            .field("poisoned", &self.poisoned)
            .finish_non_exhaustive()
    }
}

impl Engine for CpuEngine {
    fn reiterate_and_render(
        &mut self,
        host: &mut dyn EngineHost,
        pixel_width: u32,
        pixel_height: u32,
        origin_x: f64,
        origin_y: f64,
        plane_width: f64,
        iterator: IteratorKind,
    ) {
        self.guarded(host, |engine, host| {
            if pixel_width > MAX_PIXEL_WIDTH || pixel_height > MAX_PIXEL_HEIGHT {
                warn!(pixel_width, pixel_height, "Image size clamped to engine capacity");
            }
            let grid = PlaneGrid {
                width: pixel_width.min(MAX_PIXEL_WIDTH) as usize,
                height: pixel_height.min(MAX_PIXEL_HEIGHT) as usize,
                origin_x,
                origin_y,
                plane_width,
            };
            engine.draw = DrawParams {
                grid,
                iterator,
                counted_against: engine.table.len(),
            };

            let start = Instant::now();
            let limit = engine.table.iteration_limit();
            let iteration = iteration_for(
                iterator,
                &engine.coefficients[..engine.coefficient_count],
            );
            fill_counts(&grid, iteration, limit, &mut engine.counts);
            engine.paint();
            engine.stats.full_passes += 1;

            debug_line(
                host,
                &format!(
                    "redraw {}x{} limit {} in {:.1?}",
                    grid.width,
                    grid.height,
                    limit,
                    start.elapsed()
                ),
            );
        });
    }

    fn recolor(&mut self, host: &mut dyn EngineHost, pixel_width: u32, pixel_height: u32) {
        self.guarded(host, |engine, host| {
            let grid = engine.draw.grid;
            if pixel_width as usize != grid.width || pixel_height as usize != grid.height {
                warn!(
                    pixel_width,
                    pixel_height,
                    drawn_width = grid.width,
                    drawn_height = grid.height,
                    "Recolor size differs from last drawn image; using the drawn size"
                );
            }

            let start = Instant::now();
            let old_len = engine.draw.counted_against;
            let new_len = engine.table.len();
            engine.stats.last_recolor_reiterated = if old_len < new_len {
                let iteration = iteration_for(
                    engine.draw.iterator,
                    &engine.coefficients[..engine.coefficient_count],
                );
                extend_counts(
                    &grid,
                    iteration,
                    old_len as u16,
                    new_len as u16,
                    &mut engine.counts,
                )
            } else {
                0
            };
            engine.draw.counted_against = new_len;
            engine.paint();

            debug_line(
                host,
                &format!(
                    "recolor {}x{} ({} pixels reiterated) in {:.1?}",
                    grid.width,
                    grid.height,
                    engine.stats.last_recolor_reiterated,
                    start.elapsed()
                ),
            );
        });
    }

    fn set_gradient_step(
        &mut self,
        host: &mut dyn EngineHost,
        index: usize,
        start: [u8; 3],
        end: [u8; 3],
        shades: u16,
    ) {
        self.guarded(host, |engine, _| match engine.steps.get_mut(index) {
            Some(slot) => *slot = GradientStep { start, end, shades },
            None => warn!(index, "Gradient step index out of range, ignored"),
        });
    }

    fn commit_gradient_step_count(&mut self, host: &mut dyn EngineHost, count: usize) {
        self.guarded(host, |engine, _| {
            if count <= MAX_GRADIENT_STEPS {
                engine.step_count = count;
            } else {
                warn!(count, "Gradient step count out of range, ignored");
            }
        });
    }

    fn recompute_color_table(&mut self, host: &mut dyn EngineHost) {
        self.guarded(host, |engine, host| {
            engine.table = ColorTable::from_steps(&engine.steps[..engine.step_count]);
            debug_line(host, &format!("color table: {} shades", engine.table.len()));
        });
    }

    fn set_polynomial_coefficient(
        &mut self,
        host: &mut dyn EngineHost,
        index: usize,
        re: f64,
        im: f64,
    ) {
        self.guarded(host, |engine, _| match engine.coefficients.get_mut(index) {
            Some(slot) => *slot = Complex::new(re, im),
            None => warn!(index, "Coefficient index out of range, ignored"),
        });
    }

    fn commit_coefficient_count(&mut self, host: &mut dyn EngineHost, count: usize) {
        self.guarded(host, |engine, _| {
            if (1..=MAX_COEFFICIENTS).contains(&count) {
                engine.coefficient_count = count;
            } else {
                warn!(count, "Coefficient count out of range, ignored");
            }
        });
    }

    fn pixel_buffer(&self) -> &[u8] {
        &self.image
    }
}
