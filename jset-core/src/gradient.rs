//! Gradient model and the builder that turns form rows into the engine's
//! fixed-width gradient table.
//!
//! Intake is lenient per field (bad hex parses to zero, shade counts are
//! clamped) but strict in aggregate: a gradient over either table bound is
//! rejected as a whole.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capacity::{MAX_GRADIENT_STEPS, MAX_SHADES_PER_STEP, MAX_TOTAL_SHADES};
use crate::error::GradientError;

// ---------------------------------------------------------------------------
// Raw form rows
// ---------------------------------------------------------------------------

/// One gradient row exactly as the form layer holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGradientStep {
    /// Start color, e.g. `"#1a2b3c"`.
    pub start: String,
    /// Shade count as entered; clamped at intake.
    pub shades: i64,
    /// End color.
    pub end: String,
}

impl RawGradientStep {
    pub fn new(start: impl Into<String>, shades: i64, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            shades,
            end: end.into(),
        }
    }

    /// Row from purely textual input; an unparseable count reads as zero.
    pub fn from_form(start: impl Into<String>, shades: &str, end: impl Into<String>) -> Self {
        Self::new(start, parse_shade_text(shades), end)
    }
}

/// Gradient shown on first launch: black → white → black.
pub fn default_gradient() -> Vec<RawGradientStep> {
    vec![
        RawGradientStep::new("#000000", 128, "#ffffff"),
        RawGradientStep::new("#ffffff", 256, "#000000"),
    ]
}

/// The row appended by "add color": it picks up where the last row ended.
pub fn next_default_step(rows: &[RawGradientStep]) -> RawGradientStep {
    let start = rows
        .last()
        .map(|r| r.end.clone())
        .unwrap_or_else(|| "#000000".to_string());
    RawGradientStep::new(start, 256, "#000000")
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// Parse a color by scanning non-overlapping pairs of adjacent hex digits.
///
/// The first three pairs become R, G, B. Missing channels are zero and any
/// further pairs are ignored, so `"#abc"` reads as `[0xab, 0, 0]`.
pub fn parse_hex_color(s: &str) -> [u8; 3] {
    let mut rgb = [0u8; 3];
    let mut filled = 0;
    let mut pending: Option<u8> = None;
    for ch in s.chars() {
        if filled == rgb.len() {
            break;
        }
        match (ch.to_digit(16), pending) {
            (Some(lo), Some(hi)) => {
                rgb[filled] = (hi << 4) | lo as u8;
                filled += 1;
                pending = None;
            }
            (Some(d), None) => pending = Some(d as u8),
            (None, _) => pending = None,
        }
    }
    rgb
}

/// Lowercase `#rrggbb`.
pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Leading-integer parse: optional sign then decimal digits, stopping at the
/// first other character. No digits at all reads as zero.
pub fn parse_shade_text(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add((d - b'0') as i64));
    if negative {
        -value
    } else {
        value
    }
}

/// Clamp a raw shade count into a single step's range.
#[inline]
pub fn clamp_shade_count(raw: i64) -> u16 {
    raw.clamp(0, MAX_SHADES_PER_STEP as i64) as u16
}

// ---------------------------------------------------------------------------
// Validated model
// ---------------------------------------------------------------------------

/// One segment of the color ramp after intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientStep {
    pub start: [u8; 3],
    pub end: [u8; 3],
    pub shades: u16,
}

impl GradientStep {
    pub fn from_raw(raw: &RawGradientStep) -> Self {
        Self {
            start: parse_hex_color(&raw.start),
            end: parse_hex_color(&raw.end),
            shades: clamp_shade_count(raw.shades),
        }
    }
}

/// Aggregate bounds a gradient must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientLimits {
    pub max_steps: usize,
    pub max_total_shades: u32,
}

impl Default for GradientLimits {
    /// The engine's own table sizes.
    fn default() -> Self {
        Self {
            max_steps: MAX_GRADIENT_STEPS,
            max_total_shades: MAX_TOTAL_SHADES,
        }
    }
}

/// Column-major gradient table ready to be pushed to the engine one step
/// at a time. Every column has `step_count` entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineGradientArrays {
    pub start_r: Vec<u8>,
    pub start_g: Vec<u8>,
    pub start_b: Vec<u8>,
    pub end_r: Vec<u8>,
    pub end_g: Vec<u8>,
    pub end_b: Vec<u8>,
    pub shades: Vec<u16>,
    pub step_count: usize,
}

impl EngineGradientArrays {
    fn with_capacity(n: usize) -> Self {
        Self {
            start_r: Vec::with_capacity(n),
            start_g: Vec::with_capacity(n),
            start_b: Vec::with_capacity(n),
            end_r: Vec::with_capacity(n),
            end_g: Vec::with_capacity(n),
            end_b: Vec::with_capacity(n),
            shades: Vec::with_capacity(n),
            step_count: 0,
        }
    }

    fn push(&mut self, step: GradientStep) {
        self.start_r.push(step.start[0]);
        self.start_g.push(step.start[1]);
        self.start_b.push(step.start[2]);
        self.end_r.push(step.end[0]);
        self.end_g.push(step.end[1]);
        self.end_b.push(step.end[2]);
        self.shades.push(step.shades);
        self.step_count += 1;
    }

    /// Re-assemble step `n` from the columns.
    pub fn step(&self, n: usize) -> Option<GradientStep> {
        if n >= self.step_count {
            return None;
        }
        Some(GradientStep {
            start: [self.start_r[n], self.start_g[n], self.start_b[n]],
            end: [self.end_r[n], self.end_g[n], self.end_b[n]],
            shades: self.shades[n],
        })
    }

    /// Steps in rendering order.
    pub fn steps(&self) -> impl Iterator<Item = GradientStep> + '_ {
        (0..self.step_count).filter_map(|n| self.step(n))
    }

    pub fn total_shades(&self) -> u32 {
        self.shades.iter().map(|&s| s as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.step_count == 0
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Turns raw form rows into [`EngineGradientArrays`].
///
/// Building never touches the engine; committing the result is the render
/// coordinator's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorMapBuilder {
    limits: GradientLimits,
}

impl ColorMapBuilder {
    pub fn new(limits: GradientLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> GradientLimits {
        self.limits
    }

    /// Clamp each row, then check the step-count bound followed by the
    /// shade budget.
    pub fn build(
        &self,
        raw_steps: &[RawGradientStep],
    ) -> Result<EngineGradientArrays, GradientError> {
        let steps: Vec<GradientStep> = raw_steps.iter().map(GradientStep::from_raw).collect();

        if steps.len() > self.limits.max_steps {
            return Err(GradientError::TooManySteps {
                count: steps.len(),
                max: self.limits.max_steps,
            });
        }

        let total: u32 = steps.iter().map(|s| s.shades as u32).sum();
        if total > self.limits.max_total_shades {
            return Err(GradientError::TooManyShades {
                total,
                max: self.limits.max_total_shades,
            });
        }

        let mut arrays = EngineGradientArrays::with_capacity(steps.len());
        for step in steps {
            arrays.push(step);
        }
        debug!(steps = arrays.step_count, total_shades = total, "Built color map");
        Ok(arrays)
    }
}

/// Build with the engine's default limits.
pub fn build(raw_steps: &[RawGradientStep]) -> Result<EngineGradientArrays, GradientError> {
    ColorMapBuilder::default().build(raw_steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_basic() {
        assert_eq!(parse_hex_color("#1a2B3c"), [0x1a, 0x2b, 0x3c]);
        assert_eq!(parse_hex_color("ffffff"), [255, 255, 255]);
    }

    #[test]
    fn hex_color_short_input_truncates() {
        assert_eq!(parse_hex_color("#abc"), [0xab, 0, 0]);
        assert_eq!(parse_hex_color(""), [0, 0, 0]);
        assert_eq!(parse_hex_color("not a color"), [0, 0, 0]);
    }

    #[test]
    fn hex_color_pairs_must_be_adjacent() {
        // "a#bc" → the lone 'a' is dropped, "bc" is the first pair.
        assert_eq!(parse_hex_color("a#bc1"), [0xbc, 0, 0]);
        assert_eq!(parse_hex_color("12-34-56"), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn hex_color_ignores_extra_pairs() {
        assert_eq!(parse_hex_color("#0102030405"), [1, 2, 3]);
    }

    #[test]
    fn format_is_inverse_of_parse() {
        let rgb = [0x0f, 0xa0, 0xff];
        assert_eq!(format_hex_color(rgb), "#0fa0ff");
        assert_eq!(parse_hex_color(&format_hex_color(rgb)), rgb);
    }

    #[test]
    fn shade_text_parsing() {
        assert_eq!(parse_shade_text("128"), 128);
        assert_eq!(parse_shade_text("  42px"), 42);
        assert_eq!(parse_shade_text("-7"), -7);
        assert_eq!(parse_shade_text("abc"), 0);
        assert_eq!(parse_shade_text(""), 0);
    }

    #[test]
    fn shade_count_clamped() {
        assert_eq!(clamp_shade_count(-5), 0);
        assert_eq!(clamp_shade_count(300), 255);
        assert_eq!(clamp_shade_count(17), 17);
    }

    #[test]
    fn default_gradient_builds() {
        let arrays = build(&default_gradient()).unwrap();
        assert_eq!(arrays.step_count, 2);
        assert_eq!(arrays.start_r, vec![0, 255]);
        assert_eq!(arrays.end_g, vec![255, 0]);
        // 256 is clamped at intake.
        assert_eq!(arrays.shades, vec![128, 255]);
    }

    #[test]
    fn arrays_have_step_count_length() {
        for n in 0..=MAX_GRADIENT_STEPS {
            let rows = vec![RawGradientStep::new("#102030", 100, "#405060"); n];
            let arrays = build(&rows).unwrap();
            assert_eq!(arrays.step_count, n);
            for col in [
                &arrays.start_r,
                &arrays.start_g,
                &arrays.start_b,
                &arrays.end_r,
                &arrays.end_g,
                &arrays.end_b,
            ] {
                assert_eq!(col.len(), n);
            }
            assert_eq!(arrays.shades.len(), n);
        }
    }

    #[test]
    fn too_many_steps_rejected() {
        let rows = vec![RawGradientStep::new("#000000", 1, "#ffffff"); MAX_GRADIENT_STEPS + 1];
        assert_eq!(
            build(&rows),
            Err(GradientError::TooManySteps {
                count: MAX_GRADIENT_STEPS + 1,
                max: MAX_GRADIENT_STEPS
            })
        );
    }

    #[test]
    fn too_many_shades_rejected() {
        let builder = ColorMapBuilder::new(GradientLimits {
            max_steps: 16,
            max_total_shades: 300,
        });
        let rows = vec![
            RawGradientStep::new("#000000", 200, "#ffffff"),
            RawGradientStep::new("#ffffff", 101, "#000000"),
        ];
        assert_eq!(
            builder.build(&rows),
            Err(GradientError::TooManyShades {
                total: 301,
                max: 300
            })
        );
        // Exactly at the budget is fine.
        let rows = vec![
            RawGradientStep::new("#000000", 200, "#ffffff"),
            RawGradientStep::new("#ffffff", 100, "#000000"),
        ];
        assert!(builder.build(&rows).is_ok());
    }

    #[test]
    fn shade_budget_uses_clamped_counts() {
        let builder = ColorMapBuilder::new(GradientLimits {
            max_steps: 16,
            max_total_shades: 255,
        });
        // 10_000 clamps to 255 before the budget check.
        let rows = vec![RawGradientStep::new("#000000", 10_000, "#ffffff")];
        assert!(builder.build(&rows).is_ok());
    }

    #[test]
    fn step_bound_checked_before_shade_bound() {
        let builder = ColorMapBuilder::new(GradientLimits {
            max_steps: 1,
            max_total_shades: 1,
        });
        let rows = vec![RawGradientStep::new("#000000", 5, "#ffffff"); 2];
        assert!(matches!(
            builder.build(&rows),
            Err(GradientError::TooManySteps { .. })
        ));
    }

    #[test]
    fn empty_gradient_is_valid() {
        let arrays = build(&[]).unwrap();
        assert!(arrays.is_empty());
        assert_eq!(arrays.total_shades(), 0);
    }

    #[test]
    fn steps_reassemble_in_order() {
        let rows = vec![
            RawGradientStep::new("#010203", 4, "#040506"),
            RawGradientStep::new("#070809", 5, "#0a0b0c"),
        ];
        let arrays = build(&rows).unwrap();
        let steps: Vec<_> = arrays.steps().collect();
        assert_eq!(steps[0].start, [1, 2, 3]);
        assert_eq!(steps[1].end, [10, 11, 12]);
        assert_eq!(steps[1].shades, 5);
        assert!(arrays.step(2).is_none());
    }

    #[test]
    fn next_default_step_continues_from_last_end() {
        let rows = default_gradient();
        let next = next_default_step(&rows);
        assert_eq!(next.start, "#000000");
        assert_eq!(next.shades, 256);
        let rows = vec![RawGradientStep::new("#000000", 10, "#ff8800")];
        assert_eq!(next_default_step(&rows).start, "#ff8800");
        assert_eq!(next_default_step(&[]).start, "#000000");
    }

    #[test]
    fn form_rows_parse_leniently() {
        let row = RawGradientStep::from_form("#ff0000", "lots", "#00ff00");
        assert_eq!(GradientStep::from_raw(&row).shades, 0);
    }
}
