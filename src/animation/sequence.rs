//! Bitmap sequence decoding
//!
//! Bundled animations use a small run-length encoded format (FSEQ). All integers are little
//! endian.
//!
//! ```text
//! header   "FSEQ" | version: u8 = 1 | reserved: u8 | width: u16 | height: u16 | frames: u16
//! frame    delay_ms: u16 | run_count: u16 | run_count * (length: u8, color: u16 RGB565)
//! ```
//!
//! The runs of a frame cover the whole frame in row-major order, no more and no less.

use embedded_graphics::{
    geometry::Size,
    pixelcolor::{raw::RawU16, PixelColor, Rgb565},
};

use super::FrameBuffer;

const MAGIC: &[u8; 4] = b"FSEQ";
const VERSION: u8 = 1;
pub const HEADER_LEN: usize = 12;
const FRAME_HEADER_LEN: usize = 4;
const RUN_LEN: usize = 3;

/// Result of a successful decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameStep {
    /// A frame was written, the next one is due after `delay_ms`.
    Advanced { delay_ms: u32 },
    /// The sequence has no more frames.
    Finished,
}

/// Decode cursor over a multi-frame bitmap.
pub trait SequenceDecoder {
    type Color: PixelColor;

    /// Dimensions of every frame of the sequence.
    fn frame_size(&self) -> Size;

    /// Write the next frame into `buffer` and advance the cursor.
    fn decode_next_frame(
        &mut self,
        buffer: &mut FrameBuffer<'_, Self::Color>,
    ) -> Result<FrameStep, DecodeError>;

    /// Rewind the cursor to the first frame.
    fn restart(&mut self);
}

/// Decoder for FSEQ data.
#[derive(Debug, Clone)]
pub struct FrameSequence<'a> {
    data: &'a [u8],
    size: Size,
    frame_count: u16,
    /// Index of the next frame to decode
    frame: u16,
    /// Byte offset of the next frame
    offset: usize,
}

impl<'a> FrameSequence<'a> {
    /// Validate the header of `data` and position the cursor on the first frame.
    ///
    /// Frames are only checked as they are decoded.
    pub fn new(data: &'a [u8]) -> Result<Self, SequenceError> {
        if data.len() < HEADER_LEN {
            return Err(SequenceError::TooShort);
        }
        if &data[..4] != MAGIC {
            return Err(SequenceError::BadMagic);
        }
        if data[4] != VERSION {
            return Err(SequenceError::UnsupportedVersion(data[4]));
        }

        let width = read_u16(data, 6).unwrap_or(0);
        let height = read_u16(data, 8).unwrap_or(0);
        let frame_count = read_u16(data, 10).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(SequenceError::EmptyFrame);
        }
        if frame_count == 0 {
            return Err(SequenceError::NoFrames);
        }

        Ok(Self {
            data,
            size: Size::new(width.into(), height.into()),
            frame_count,
            frame: 0,
            offset: HEADER_LEN,
        })
    }

    pub fn frame_count(&self) -> u16 {
        self.frame_count
    }

    /// Index of the frame the next decode step produces.
    pub fn position(&self) -> u16 {
        self.frame
    }

    fn corrupt(&self, reason: CorruptionKind) -> DecodeError {
        DecodeError {
            frame: self.frame,
            reason,
        }
    }
}

impl SequenceDecoder for FrameSequence<'_> {
    type Color = Rgb565;

    fn frame_size(&self) -> Size {
        self.size
    }

    fn decode_next_frame(
        &mut self,
        buffer: &mut FrameBuffer<'_, Rgb565>,
    ) -> Result<FrameStep, DecodeError> {
        if self.frame >= self.frame_count {
            return Ok(FrameStep::Finished);
        }

        let mut cursor = self.offset;
        let (Some(delay_ms), Some(run_count)) =
            (read_u16(self.data, cursor), read_u16(self.data, cursor + 2))
        else {
            return Err(self.corrupt(CorruptionKind::Truncated));
        };
        cursor += FRAME_HEADER_LEN;

        let runs_end = cursor + run_count as usize * RUN_LEN;
        if runs_end > self.data.len() {
            return Err(self.corrupt(CorruptionKind::Truncated));
        }

        let pixels = buffer.pixels_mut();
        let mut written = 0;
        for run in self.data[cursor..runs_end].chunks_exact(RUN_LEN) {
            let length = run[0] as usize;
            if length == 0 {
                return Err(self.corrupt(CorruptionKind::EmptyRun));
            }
            let end = written + length;
            if end > pixels.len() {
                return Err(self.corrupt(CorruptionKind::Overflow));
            }
            let color = Rgb565::from(RawU16::new(u16::from_le_bytes([run[1], run[2]])));
            pixels[written..end].fill(color);
            written = end;
        }
        if written != pixels.len() {
            return Err(self.corrupt(CorruptionKind::Underflow));
        }

        trace!("decoded frame {} of {}", self.frame, self.frame_count);
        self.frame += 1;
        self.offset = runs_end;

        Ok(FrameStep::Advanced {
            delay_ms: delay_ms.into(),
        })
    }

    fn restart(&mut self) {
        self.frame = 0;
        self.offset = HEADER_LEN;
    }
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// The header of a sequence resource is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    #[error("resource not found")]
    Missing,
    #[error("data shorter than the sequence header")]
    TooShort,
    #[error("not a frame sequence")]
    BadMagic,
    #[error("unsupported sequence version {0}")]
    UnsupportedVersion(u8),
    #[error("frames have no pixels")]
    EmptyFrame,
    #[error("sequence has no frames")]
    NoFrames,
}

/// A frame failed to decode for a reason other than reaching the end of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("frame {frame} is corrupt: {reason}")]
pub struct DecodeError {
    pub frame: u16,
    pub reason: CorruptionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CorruptionKind {
    #[error("data ends inside the frame")]
    Truncated,
    #[error("zero-length run")]
    EmptyRun,
    #[error("runs exceed the frame area")]
    Overflow,
    #[error("runs do not fill the frame")]
    Underflow,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use embedded_graphics::{pixelcolor::raw::RawData, prelude::*};

    /// Build FSEQ data from frames given as `(delay_ms, runs)`.
    pub(crate) fn encode(width: u16, height: u16, frames: &[(u16, &[(u8, Rgb565)])]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(MAGIC);
        data.push(VERSION);
        data.push(0);
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&(frames.len() as u16).to_le_bytes());
        for (delay, runs) in frames {
            data.extend_from_slice(&delay.to_le_bytes());
            data.extend_from_slice(&(runs.len() as u16).to_le_bytes());
            for (length, color) in runs.iter() {
                data.push(*length);
                data.extend_from_slice(&RawU16::from(*color).into_inner().to_le_bytes());
            }
        }
        data
    }

    fn decode_all(sequence: &mut FrameSequence<'_>, storage: &mut [Rgb565]) -> Vec<FrameStep> {
        let mut buffer = FrameBuffer::new(storage, sequence.frame_size()).unwrap();
        let mut steps = Vec::new();
        loop {
            let step = sequence.decode_next_frame(&mut buffer).unwrap();
            steps.push(step);
            if step == FrameStep::Finished {
                return steps;
            }
        }
    }

    #[test]
    fn decodes_frames_with_their_delays() {
        let data = encode(
            2,
            2,
            &[
                (100, &[(4, Rgb565::RED)]),
                (150, &[(1, Rgb565::BLUE), (3, Rgb565::GREEN)]),
            ],
        );
        let mut sequence = FrameSequence::new(&data).unwrap();
        let mut storage = [Rgb565::BLACK; 4];
        let mut buffer = FrameBuffer::new(&mut storage, Size::new(2, 2)).unwrap();

        assert_eq!(
            sequence.decode_next_frame(&mut buffer),
            Ok(FrameStep::Advanced { delay_ms: 100 })
        );
        assert_eq!(buffer.pixels(), &[Rgb565::RED; 4]);

        assert_eq!(
            sequence.decode_next_frame(&mut buffer),
            Ok(FrameStep::Advanced { delay_ms: 150 })
        );
        assert_eq!(buffer.pixel(0, 0), Some(Rgb565::BLUE));
        assert_eq!(buffer.pixel(1, 1), Some(Rgb565::GREEN));

        assert_eq!(sequence.decode_next_frame(&mut buffer), Ok(FrameStep::Finished));
        assert_eq!(sequence.decode_next_frame(&mut buffer), Ok(FrameStep::Finished));
    }

    #[test]
    fn restart_rewinds_to_first_frame() {
        let data = encode(1, 1, &[(10, &[(1, Rgb565::RED)]), (20, &[(1, Rgb565::BLUE)])]);
        let mut sequence = FrameSequence::new(&data).unwrap();
        let mut storage = [Rgb565::BLACK; 1];

        let first = decode_all(&mut sequence, &mut storage);
        assert_eq!(sequence.position(), 2);

        sequence.restart();
        assert_eq!(sequence.position(), 0);
        let second = decode_all(&mut sequence, &mut storage);
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_bad_headers() {
        assert_eq!(FrameSequence::new(b"FSEQ").err(), Some(SequenceError::TooShort));
        assert_eq!(
            FrameSequence::new(b"GIF89a\0\0\0\0\0\0").err(),
            Some(SequenceError::BadMagic)
        );

        let mut data = encode(1, 1, &[(10, &[(1, Rgb565::RED)])]);
        data[4] = 2;
        assert_eq!(
            FrameSequence::new(&data).err(),
            Some(SequenceError::UnsupportedVersion(2))
        );

        let data = encode(0, 4, &[(10, &[])]);
        assert_eq!(FrameSequence::new(&data).err(), Some(SequenceError::EmptyFrame));

        let data = encode(4, 4, &[]);
        assert_eq!(FrameSequence::new(&data).err(), Some(SequenceError::NoFrames));
    }

    #[test]
    fn reports_corrupt_frames() {
        let mut storage = [Rgb565::BLACK; 4];

        let cases: [(&[(u8, Rgb565)], CorruptionKind); 3] = [
            (&[(0, Rgb565::RED), (4, Rgb565::RED)], CorruptionKind::EmptyRun),
            (&[(5, Rgb565::RED)], CorruptionKind::Overflow),
            (&[(3, Rgb565::RED)], CorruptionKind::Underflow),
        ];
        for (runs, reason) in cases {
            let data = encode(2, 2, &[(10, &[(4, Rgb565::RED)]), (10, runs)]);
            let mut sequence = FrameSequence::new(&data).unwrap();
            let mut buffer = FrameBuffer::new(&mut storage, Size::new(2, 2)).unwrap();

            assert!(sequence.decode_next_frame(&mut buffer).is_ok());
            assert_eq!(
                sequence.decode_next_frame(&mut buffer),
                Err(DecodeError { frame: 1, reason })
            );
        }
    }

    #[test]
    fn reports_truncated_data() {
        let mut data = encode(2, 2, &[(10, &[(2, Rgb565::RED), (2, Rgb565::BLUE)])]);
        data.truncate(data.len() - 1);
        let mut sequence = FrameSequence::new(&data).unwrap();
        let mut storage = [Rgb565::BLACK; 4];
        let mut buffer = FrameBuffer::new(&mut storage, Size::new(2, 2)).unwrap();

        assert_eq!(
            sequence.decode_next_frame(&mut buffer),
            Err(DecodeError {
                frame: 0,
                reason: CorruptionKind::Truncated
            })
        );
    }
}
