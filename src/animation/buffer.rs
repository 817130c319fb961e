//! Frame buffer for decoded animation frames

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::PixelColor,
    primitives::{PointsIter, Rectangle},
    Pixel,
};

/// Fixed-size pixel surface backed by caller-provided storage.
///
/// The size is set once at construction; decoders write into it in place and the display reads
/// it back with [`FrameBuffer::draw_at`].
pub struct FrameBuffer<'a, C: PixelColor> {
    pixels: &'a mut [C],
    size: Size,
    dirty: bool,
}

impl<'a, C: PixelColor> FrameBuffer<'a, C> {
    /// Wrap `storage` as a `size` frame. Extra storage past `width * height` is left unused.
    pub fn new(storage: &'a mut [C], size: Size) -> Result<Self, BufferError> {
        let required = size.width as usize * size.height as usize;
        if storage.len() < required {
            return Err(BufferError::TooSmall {
                required: required as u32,
                available: storage.len() as u32,
            });
        }

        Ok(Self {
            pixels: &mut storage[..required],
            size,
            dirty: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> &[C] {
        &*self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [C] {
        &mut *self.pixels
    }

    /// Pixel at `(x, y)`, `None` when outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<C> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get((y * self.size.width + x) as usize)
            .copied()
    }

    /// Flag the frame for redisplay.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return whether the frame was dirty and clear the flag.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Copy the frame onto `target` with its top left corner at `origin`.
    ///
    /// Pixels outside the bounding box of `target` are skipped.
    pub fn draw_at<D>(&self, target: &mut D, origin: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let area = Rectangle::new(origin, self.size);
        let visible = area.intersection(&target.bounding_box());
        if visible == area {
            return target.fill_contiguous(&area, self.pixels.iter().copied());
        }

        let pixels = area
            .points()
            .zip(self.pixels.iter().copied())
            .filter(|(point, _)| visible.contains(*point))
            .map(|(point, color)| Pixel(point, color));
        target.draw_iter(pixels)
    }
}

impl<C: PixelColor> OriginDimensions for FrameBuffer<'_, C> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<C: PixelColor> DrawTarget for FrameBuffer<'_, C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let width = self.size.width as i32;
        let height = self.size.height as i32;
        for Pixel(point, color) in pixels {
            if (0..width).contains(&point.x) && (0..height).contains(&point.y) {
                self.pixels[(point.y * width + point.x) as usize] = color;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    #[error("frame needs {required} pixels, storage holds {available}")]
    TooSmall { required: u32, available: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::{
        mock_display::MockDisplay,
        pixelcolor::{BinaryColor, Rgb565},
        prelude::*,
        primitives::{Line, PrimitiveStyle},
    };

    #[test]
    fn rejects_storage_smaller_than_frame() {
        let mut storage = [Rgb565::BLACK; 11];
        let result = FrameBuffer::new(&mut storage, Size::new(4, 3));
        assert_eq!(
            result.err(),
            Some(BufferError::TooSmall {
                required: 12,
                available: 11
            })
        );
    }

    #[test]
    fn uses_only_the_frame_area_of_larger_storage() {
        let mut storage = [Rgb565::BLACK; 32];
        let buffer = FrameBuffer::new(&mut storage, Size::new(3, 2)).unwrap();
        assert_eq!(buffer.pixels().len(), 6);
        assert_eq!(buffer.size(), Size::new(3, 2));
    }

    #[test]
    fn take_dirty_clears_flag() {
        let mut storage = [Rgb565::BLACK; 4];
        let mut buffer = FrameBuffer::new(&mut storage, Size::new(2, 2)).unwrap();
        assert!(!buffer.take_dirty());
        buffer.mark_dirty();
        assert!(buffer.is_dirty());
        assert!(buffer.take_dirty());
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn drawing_clips_to_frame() {
        let mut storage = [BinaryColor::Off; 9];
        let mut buffer = FrameBuffer::new(&mut storage, Size::new(3, 3)).unwrap();
        Line::new(Point::new(-2, 1), Point::new(5, 1))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut buffer)
            .unwrap();

        assert_eq!(buffer.pixel(0, 1), Some(BinaryColor::On));
        assert_eq!(buffer.pixel(2, 1), Some(BinaryColor::On));
        assert_eq!(buffer.pixel(1, 0), Some(BinaryColor::Off));
        assert_eq!(buffer.pixel(3, 1), None);
    }

    #[test]
    fn draw_at_places_frame_on_target() {
        let mut storage = [BinaryColor::Off; 4];
        let mut buffer = FrameBuffer::new(&mut storage, Size::new(2, 2)).unwrap();
        buffer.pixels_mut()[0] = BinaryColor::On;
        buffer.pixels_mut()[3] = BinaryColor::On;

        let mut display = MockDisplay::new();
        buffer.draw_at(&mut display, Point::new(1, 1)).unwrap();

        display.assert_pattern(&[
            "   ", //
            " #.", //
            " .#", //
        ]);
    }

    #[test]
    fn draw_at_skips_pixels_off_target() {
        let mut storage = [BinaryColor::On; 9];
        let buffer = FrameBuffer::new(&mut storage, Size::new(3, 3)).unwrap();

        // MockDisplay panics on out of bounds drawing.
        let mut display = MockDisplay::new();
        buffer.draw_at(&mut display, Point::new(62, -1)).unwrap();

        assert_eq!(display.get_pixel(Point::new(62, 0)), Some(BinaryColor::On));
        assert_eq!(display.get_pixel(Point::new(63, 1)), Some(BinaryColor::On));
        assert_eq!(display.get_pixel(Point::new(61, 0)), None);
        assert_eq!(
            display.affected_area(),
            Rectangle::new(Point::new(62, 0), Size::new(2, 2))
        );
    }
}
