use tracing::warn;

use jset_core::capacity::COLOR_TABLE_CAPACITY;
use jset_core::GradientStep;

/// Color of points whose escape count runs past the end of the table.
pub const DEFAULT_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Longest usable table. Escape counts are `u16` and the count equal to the
/// table length means "did not escape", so one slot stays unused.
pub const MAX_TABLE_LEN: usize = COLOR_TABLE_CAPACITY - 1;

/// Escape count → RGBA lookup, expanded from the active gradient steps.
///
/// Each step contributes `shades` entries interpolated linearly from its
/// start color towards (but not including) its end color.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    colors: Vec<[u8; 4]>,
}

impl ColorTable {
    pub fn from_steps(steps: &[GradientStep]) -> Self {
        let total: usize = steps.iter().map(|s| s.shades as usize).sum();
        let mut colors = Vec::with_capacity(total.min(MAX_TABLE_LEN));

        'steps: for step in steps {
            let n_shades = step.shades as f32;
            for n in 0..step.shades {
                if colors.len() == MAX_TABLE_LEN {
                    warn!(total, "Color table full, truncating");
                    break 'steps;
                }
                let frac = n as f32 / n_shades;
                colors.push(lerp(step.start, step.end, frac));
            }
        }

        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Escape counts stop at the table length.
    pub fn iteration_limit(&self) -> u16 {
        self.colors.len() as u16
    }

    #[inline]
    pub fn color(&self, count: u16) -> [u8; 4] {
        self.colors
            .get(count as usize)
            .copied()
            .unwrap_or(DEFAULT_COLOR)
    }
}

#[inline]
fn lerp(start: [u8; 3], end: [u8; 3], frac: f32) -> [u8; 4] {
    let channel = |i: usize| {
        let a = start[i] as f32;
        let b = end[i] as f32;
        (a + frac * (b - a)) as u8
    };
    [channel(0), channel(1), channel(2), 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(start: [u8; 3], shades: u16, end: [u8; 3]) -> GradientStep {
        GradientStep { start, end, shades }
    }

    #[test]
    fn empty_steps_give_empty_table() {
        let table = ColorTable::from_steps(&[]);
        assert!(table.is_empty());
        assert_eq!(table.iteration_limit(), 0);
        assert_eq!(table.color(0), DEFAULT_COLOR);
    }

    #[test]
    fn interpolates_within_a_step() {
        let table = ColorTable::from_steps(&[step([0, 0, 0], 4, [200, 100, 40])]);
        assert_eq!(table.len(), 4);
        assert_eq!(table.color(0), [0, 0, 0, 255]);
        assert_eq!(table.color(2), [100, 50, 20, 255]);
        // The end color itself is never reached.
        assert_eq!(table.color(3), [150, 75, 30, 255]);
    }

    #[test]
    fn steps_are_concatenated_in_order() {
        let table = ColorTable::from_steps(&[
            step([10, 10, 10], 2, [10, 10, 10]),
            step([255, 0, 0], 3, [255, 0, 0]),
        ]);
        assert_eq!(table.len(), 5);
        assert_eq!(table.color(1), [10, 10, 10, 255]);
        assert_eq!(table.color(2), [255, 0, 0, 255]);
        assert_eq!(table.color(5), DEFAULT_COLOR);
    }

    #[test]
    fn zero_shade_step_contributes_nothing() {
        let table = ColorTable::from_steps(&[
            step([1, 2, 3], 0, [4, 5, 6]),
            step([7, 8, 9], 1, [7, 8, 9]),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.color(0), [7, 8, 9, 255]);
    }

    #[test]
    fn oversized_input_is_truncated() {
        let steps = vec![step([0, 0, 0], u16::MAX, [255, 255, 255]); 2];
        let table = ColorTable::from_steps(&steps);
        assert_eq!(table.len(), MAX_TABLE_LEN);
        assert_eq!(table.iteration_limit(), u16::MAX);
    }
}
