//! Optional 2×2 smoothing pass over the finished image.

/// Weight of the right and lower neighbours at full strength.
const ORTH: f32 = 0.184_699_03;
/// Weight of the lower-right neighbour at full strength.
const DIAG: f32 = 0.130_601_94;

/// Amounts below this disable smoothing.
pub const MIN_AMOUNT: f32 = 0.05;

/// Map a requested smoothing amount to the one actually used. `None` turns
/// smoothing off; anything near or above one is treated as one.
pub fn normalize_amount(amount: f32) -> Option<f32> {
    if amount.is_nan() || amount < MIN_AMOUNT {
        None
    } else if amount > 0.99 {
        Some(1.0)
    } else {
        Some(amount)
    }
}

/// Blend every pixel with its right, lower and lower-right neighbours, in
/// place, scanning left to right and top to bottom. The last column and
/// row blend with the one neighbour they have; the bottom-right pixel is
/// left alone.
pub fn smooth_rgba(rgba: &mut [u8], width: usize, height: usize, amount: f32) {
    if width == 0 || height == 0 {
        return;
    }
    let orth = ORTH * amount;
    let diag = DIAG * amount;
    let center = 1.0 - (2.0 * orth + diag);
    let edge = 1.0 - orth;

    for y in 0..height - 1 {
        let row = y * width;
        for x in 0..width - 1 {
            let idx = row + x;
            blend(
                rgba,
                idx,
                &[
                    (idx, center),
                    (idx + 1, orth),
                    (idx + width, orth),
                    (idx + width + 1, diag),
                ],
            );
        }
        let idx = row + width - 1;
        blend(rgba, idx, &[(idx, edge), (idx + width, orth)]);
    }

    let row = (height - 1) * width;
    for idx in row..row + width - 1 {
        blend(rgba, idx, &[(idx, edge), (idx + 1, orth)]);
    }
}

/// Write the weighted sum of the listed pixels' RGB into pixel `target`,
/// forcing it opaque.
#[inline]
fn blend(rgba: &mut [u8], target: usize, weights: &[(usize, f32)]) {
    let mut acc = [0.0f32; 3];
    for &(idx, w) in weights {
        let px = &rgba[idx * 4..idx * 4 + 3];
        for (a, &c) in acc.iter_mut().zip(px) {
            *a += c as f32 * w;
        }
    }
    let out = &mut rgba[target * 4..target * 4 + 4];
    out[0] = acc[0] as u8;
    out[1] = acc[1] as u8;
    out[2] = acc[2] as u8;
    out[3] = 255;
}
