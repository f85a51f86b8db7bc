//! Packed pixel buffers.

use thiserror::Error;

/// Errors constructing a frame from raw bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame has zero channels")]
    NoChannels,

    #[error("expected {expected} bytes for {width}x{height}x{channels}, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },
}

/// A row-major, tightly packed image as delivered by the capture source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap raw pixel bytes, checking the buffer length.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, FrameError> {
        if channels == 0 {
            return Err(FrameError::NoChannels);
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// An all-black frame.
    pub fn blank(width: u32, height: u32, channels: u8) -> Self {
        let channels = channels.max(1);
        Self {
            width,
            height,
            channels,
            data: vec![0; width as usize * height as usize * channels as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of the pixel at `(x, y)`, or `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * c;
        self.data.get(start..start + c)
    }

    /// Flip the image left-right in place.
    ///
    /// Whole pixels are swapped, so channel order within a pixel is kept.
    pub fn mirror_horizontal(&mut self) {
        let c = self.channels as usize;
        let row_len = self.width as usize * c;
        if row_len == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(row_len) {
            let mut left = 0;
            let mut right = self.width as usize;
            while left + 1 < right {
                right -= 1;
                for k in 0..c {
                    row.swap(left * c + k, right * c + k);
                }
                left += 1;
            }
        }
    }

    /// Consume the frame and return a mirrored copy.
    pub fn mirrored(mut self) -> Self {
        self.mirror_horizontal();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(Frame::new(2, 2, 3, vec![0; 12]).is_ok());
        assert_eq!(
            Frame::new(2, 2, 3, vec![0; 11]),
            Err(FrameError::SizeMismatch {
                width: 2,
                height: 2,
                channels: 3,
                expected: 12,
                actual: 11,
            })
        );
        assert_eq!(Frame::new(2, 2, 0, vec![]), Err(FrameError::NoChannels));
    }

    #[test]
    fn test_mirror_swaps_pixels_not_channels() {
        // One row, three BGR pixels.
        let mut frame = Frame::new(3, 1, 3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        frame.mirror_horizontal();
        assert_eq!(frame.data(), &[7, 8, 9, 4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_mirror_rows_independently() {
        let frame = Frame::new(2, 2, 1, vec![1, 2, 3, 4]).unwrap().mirrored();
        assert_eq!(frame.data(), &[2, 1, 4, 3]);
        assert_eq!(frame.pixel(0, 1), Some(&[4u8][..]));
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let data: Vec<u8> = (0..60).collect();
        let original = Frame::new(5, 4, 3, data).unwrap();
        let back = original.clone().mirrored().mirrored();
        assert_eq!(back, original);
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let frame = Frame::blank(4, 4, 1);
        assert!(frame.pixel(4, 0).is_none());
        assert!(frame.pixel(0, 4).is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn mirror_is_an_involution(width in 1u32..9, height in 1u32..6, channels in 1u8..4, seed in any::<u8>()) {
            let len = width as usize * height as usize * channels as usize;
            let data: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect();
            let frame = Frame::new(width, height, channels, data).unwrap();
            let mirrored = frame.clone().mirrored();
            for y in 0..height {
                for x in 0..width {
                    prop_assert_eq!(frame.pixel(x, y), mirrored.pixel(width - 1 - x, y));
                }
            }
            prop_assert_eq!(mirrored.mirrored(), frame);
        }
    }
}
