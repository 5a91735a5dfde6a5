//! The call contract of the external rendering engine.
//!
//! The engine owns a fixed pixel buffer and a fixed gradient table. Every
//! call blocks until complete. While a call runs the engine may raise two
//! signals through the [`EngineHost`] it was handed: a byte of debug text,
//! or an unrecoverable fault.

use jset_core::IteratorKind;

/// Callbacks the engine may invoke while servicing a call.
pub trait EngineHost {
    /// One byte of debug output; lines end with `b'\n'`.
    fn debug_byte(&mut self, byte: u8);

    /// The engine has entered an unrecoverable state.
    fn fault(&mut self);
}

/// Stream `line` followed by a newline through `host`.
pub fn debug_line(host: &mut dyn EngineHost, line: &str) {
    for b in line.bytes() {
        host.debug_byte(b);
    }
    host.debug_byte(b'\n');
}

/// Entry points exposed by a rendering engine.
///
/// Implementations are expected to be cheap to call in any order, but the
/// coordinator only ever issues them in the sequences the engine requires:
/// gradient steps → commit count → recompute table, and coefficients →
/// commit count before a reiterate.
pub trait Engine {
    /// Recompute every pixel's escape data for the given view, then color
    /// it into the pixel buffer.
    #[allow(clippy::too_many_arguments)]
    fn reiterate_and_render(
        &mut self,
        host: &mut dyn EngineHost,
        pixel_width: u32,
        pixel_height: u32,
        origin_x: f64,
        origin_y: f64,
        plane_width: f64,
        iterator: IteratorKind,
    );

    /// Re-color the pixel buffer from the escape data of the last
    /// reiterate, using the current color table.
    fn recolor(&mut self, host: &mut dyn EngineHost, pixel_width: u32, pixel_height: u32);

    /// Set gradient table entry `index`.
    fn set_gradient_step(
        &mut self,
        host: &mut dyn EngineHost,
        index: usize,
        start: [u8; 3],
        end: [u8; 3],
        shades: u16,
    );

    /// Declare how many gradient entries are active.
    fn commit_gradient_step_count(&mut self, host: &mut dyn EngineHost, count: usize);

    /// Expand the active gradient entries into the color table. Must follow
    /// any gradient edits before the next recolor or reiterate.
    fn recompute_color_table(&mut self, host: &mut dyn EngineHost);

    /// Set polynomial coefficient `index` (index 0 is the constant term).
    fn set_polynomial_coefficient(
        &mut self,
        host: &mut dyn EngineHost,
        index: usize,
        re: f64,
        im: f64,
    );

    /// Declare how many polynomial coefficients are active.
    fn commit_coefficient_count(&mut self, host: &mut dyn EngineHost, count: usize);

    /// The shared pixel buffer: RGBA8, row-major, stride = last requested
    /// pixel width. May be longer than the image actually drawn.
    fn pixel_buffer(&self) -> &[u8];
}
