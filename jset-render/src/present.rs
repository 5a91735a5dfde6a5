/// A borrowed view of the engine's pixel buffer, trimmed to the image that
/// was just drawn.
#[derive(Debug, Clone, Copy)]
pub struct PixelFrame<'a> {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub rgba: &'a [u8],
}

impl<'a> PixelFrame<'a> {
    /// Slice the readback region for a `width × height` image out of `buffer`.
    ///
    /// Returns `None` when the buffer is too short.
    pub fn from_buffer(buffer: &'a [u8], width: u32, height: u32) -> Option<Self> {
        let len = 4 * width as usize * height as usize;
        buffer.get(..len).map(|rgba| Self {
            width,
            height,
            rgba,
        })
    }

    /// The RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.rgba[idx],
            self.rgba[idx + 1],
            self.rgba[idx + 2],
            self.rgba[idx + 3],
        ]
    }
}

/// The display side: receives every freshly drawn frame.
pub trait Presenter {
    fn present(&mut self, frame: PixelFrame<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_buffer_trims_to_image() {
        let buffer = vec![7u8; 4 * 10 * 10];
        let frame = PixelFrame::from_buffer(&buffer, 4, 3).unwrap();
        assert_eq!(frame.rgba.len(), 4 * 4 * 3);
    }

    #[test]
    fn from_buffer_rejects_short_buffer() {
        let buffer = vec![0u8; 15];
        assert!(PixelFrame::from_buffer(&buffer, 2, 2).is_none());
    }

    #[test]
    fn pixel_indexing_is_row_major() {
        let mut buffer = vec![0u8; 4 * 3 * 2];
        // (x=1, y=1) → index 4
        buffer[16..20].copy_from_slice(&[1, 2, 3, 255]);
        let frame = PixelFrame::from_buffer(&buffer, 3, 2).unwrap();
        assert_eq!(frame.pixel(1, 1), [1, 2, 3, 255]);
        assert_eq!(frame.pixel(0, 0), [0, 0, 0, 0]);
    }
}
