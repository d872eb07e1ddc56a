// Copyright (c) 2023 Jean-Daniel Michaud
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Per-frame access to native (uncompressed) pixel data.

use crate::dataset::{Dataset, DicomValue};
use crate::dicom_tags::{BitsAllocated, Columns, NumberOfFrames, PixelData, Rows, SamplesPerPixel};
use crate::error::DicomError;
use crate::tags::Tag;
use crate::transfer_syntax;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
  pub rows: usize,
  pub columns: usize,
  pub samples_per_pixel: usize,
  pub bits_allocated: usize,
  pub number_of_frames: u32,
}

fn required(dataset: &Dataset, tag: Tag, keyword: &str) -> Result<usize, DicomError> {
  match dataset.get_int(tag) {
    Some(value) if value > 0 => Ok(value as usize),
    Some(value) => Err(DicomError::not_found(&format!("{} is {}", keyword, value))),
    None => Err(DicomError::not_found(&format!("{} is missing", keyword))),
  }
}

impl FrameGeometry {
  pub fn from_dataset(dataset: &Dataset) -> Result<FrameGeometry, DicomError> {
    Ok(FrameGeometry {
      rows: required(dataset, Rows, "Rows")?,
      columns: required(dataset, Columns, "Columns")?,
      samples_per_pixel: dataset.get_int(SamplesPerPixel).filter(|v| *v > 0).unwrap_or(1) as usize,
      bits_allocated: required(dataset, BitsAllocated, "BitsAllocated")?,
      number_of_frames: frame_count(dataset),
    })
  }

  /// Bytes per frame. Bit-packed (1 bit) frames must start on a byte boundary.
  pub fn frame_size(&self) -> Result<usize, DicomError> {
    let samples = self
      .rows
      .checked_mul(self.columns)
      .and_then(|v| v.checked_mul(self.samples_per_pixel))
      .ok_or_else(|| DicomError::unsupported_format("frame size overflows"))?;
    if self.bits_allocated == 1 {
      if samples % 8 != 0 && self.number_of_frames > 1 {
        return Err(DicomError::unsupported_format(&format!(
          "bit-packed frames of {} samples are not byte aligned", samples)));
      }
      return Ok((samples + 7) / 8);
    }
    samples
      .checked_mul((self.bits_allocated + 7) / 8)
      .ok_or_else(|| DicomError::unsupported_format("frame size overflows"))
  }
}

/// NumberOfFrames, 1 when absent or not a positive integer.
pub fn frame_count(dataset: &Dataset) -> u32 {
  match dataset.get_int(NumberOfFrames) {
    Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
    _ => 1,
  }
}

fn check_transfer_syntax(dataset: &Dataset) -> Result<(), DicomError> {
  let uid = match dataset.transfer_syntax_uid() {
    Some(uid) => uid,
    None => return Ok(()),
  };
  match transfer_syntax::lookup(&uid) {
    Some(ts) if ts.is_uncompressed() => Ok(()),
    Some(ts) => Err(DicomError::unsupported_transfer_syntax(&format!("{} ({})", ts.name, uid))),
    None => Err(DicomError::unsupported_transfer_syntax(&uid)),
  }
}

/// The bytes of frame `frame_number` (1-based), verbatim.
pub fn frame(dataset: &Dataset, frame_number: u32) -> Result<Vec<u8>, DicomError> {
  check_transfer_syntax(dataset)?;
  let element = dataset.get(PixelData).ok_or_else(|| DicomError::not_found("no pixel data"))?;
  let pixels: &[u8] = match &element.value {
    DicomValue::Opaque(bytes) => bytes,
    DicomValue::Empty => &[],
    DicomValue::Fragments(_) => {
      return Err(DicomError::unsupported_transfer_syntax("pixel data is encapsulated"));
    }
    _ => return Err(DicomError::unsupported_format("pixel data is not a byte buffer")),
  };

  let number_of_frames = frame_count(dataset);
  if frame_number == 0 || frame_number > number_of_frames {
    return Err(DicomError::not_found(&format!(
      "frame {} out of range 1..={}", frame_number, number_of_frames)));
  }
  if pixels.is_empty() {
    return Err(DicomError::not_found("pixel data is empty"));
  }

  if number_of_frames == 1 {
    // Geometry only trims the padding byte here; a single frame is the whole buffer.
    let length = match FrameGeometry::from_dataset(dataset).and_then(|g| g.frame_size()) {
      Ok(size) => size.min(pixels.len()),
      Err(_) => pixels.len(),
    };
    return Ok(pixels[..length].to_vec());
  }

  let size = FrameGeometry::from_dataset(dataset)?.frame_size()?;
  let start = (frame_number as usize - 1)
    .checked_mul(size)
    .ok_or_else(|| DicomError::not_found("frame offset overflows"))?;
  let end = start
    .checked_add(size)
    .ok_or_else(|| DicomError::not_found("frame offset overflows"))?;
  if end > pixels.len() {
    return Err(DicomError::not_found(&format!(
      "frame {} needs bytes {}..{}, pixel data holds {}", frame_number, start, end, pixels.len())));
  }
  Ok(pixels[start..end].to_vec())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dicom_tags::TransferSyntaxUID;
  use crate::error::ErrorKind;
  use crate::value_representation::ValueRepresentation;

  const FRAME_SIZE: usize = 512 * 512 * 2;

  fn image(frames: Option<i64>, pixels: Vec<u8>) -> Dataset {
    let mut dataset = Dataset::new();
    dataset
      .put(SamplesPerPixel, ValueRepresentation::US, DicomValue::int(1))
      .put(Rows, ValueRepresentation::US, DicomValue::int(512))
      .put(Columns, ValueRepresentation::US, DicomValue::int(512))
      .put(BitsAllocated, ValueRepresentation::US, DicomValue::int(16))
      .put(PixelData, ValueRepresentation::OW, DicomValue::Opaque(pixels));
    if let Some(frames) = frames {
      dataset.put(NumberOfFrames, ValueRepresentation::IS, DicomValue::int(frames));
    }
    dataset
  }

  fn with_syntax(mut dataset: Dataset, uid: &str) -> Dataset {
    let mut meta = Dataset::new();
    meta.put(TransferSyntaxUID, ValueRepresentation::UI, DicomValue::text(uid));
    dataset.set_file_meta(Some(meta));
    dataset
  }

  #[test]
  fn slices_single_frame() {
    let dataset = image(None, vec![7; FRAME_SIZE]);
    assert_eq!(frame(&dataset, 1).unwrap().len(), 524288);
    assert_eq!(frame(&dataset, 0).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(frame(&dataset, 2).unwrap_err().kind(), ErrorKind::NotFound);
  }

  #[test]
  fn slices_disjoint_frames() {
    let pixels: Vec<u8> = (1..=10u8).flat_map(|n| vec![n; FRAME_SIZE]).collect();
    let dataset = image(Some(10), pixels);
    for n in 1..=10u32 {
      let bytes = frame(&dataset, n).unwrap();
      assert_eq!(bytes.len(), FRAME_SIZE);
      assert!(bytes.iter().all(|b| *b == n as u8), "frame {}", n);
    }
    assert_eq!(frame(&dataset, 11).unwrap_err().kind(), ErrorKind::NotFound);
  }

  #[test]
  fn short_pixel_data_misses_frames() {
    let dataset = image(Some(3), vec![0; FRAME_SIZE * 2]);
    assert!(frame(&dataset, 2).is_ok());
    assert_eq!(frame(&dataset, 3).unwrap_err().kind(), ErrorKind::NotFound);
  }

  #[test]
  fn missing_pixel_data_or_geometry_is_not_found() {
    let mut dataset = image(Some(2), vec![0; FRAME_SIZE * 2]);
    dataset.remove(Rows);
    assert_eq!(frame(&dataset, 1).unwrap_err().kind(), ErrorKind::NotFound);
    dataset.remove(PixelData);
    assert_eq!(frame(&dataset, 1).unwrap_err().kind(), ErrorKind::NotFound);
  }

  #[test]
  fn compressed_syntaxes_are_unsupported() {
    let dataset = with_syntax(image(None, vec![0; 16]), "1.2.840.10008.1.2.4.50");
    assert_eq!(frame(&dataset, 1).unwrap_err().kind(), ErrorKind::UnsupportedTransferSyntax);

    let mut dataset = image(None, vec![]);
    dataset.put(PixelData, ValueRepresentation::OB, DicomValue::Fragments(vec![vec![], vec![1, 2]]));
    assert_eq!(frame(&dataset, 1).unwrap_err().kind(), ErrorKind::UnsupportedTransferSyntax);

    let dataset = with_syntax(image(None, vec![0; FRAME_SIZE]), transfer_syntax::EXPLICIT_VR_BIG_ENDIAN);
    assert!(frame(&dataset, 1).is_ok());
  }

  #[test]
  fn bit_packed_frames_must_be_byte_aligned() {
    let mut dataset = image(Some(2), vec![0xAA, 0x55, 0x0F, 0xF0]);
    dataset
      .put(Rows, ValueRepresentation::US, DicomValue::int(4))
      .put(Columns, ValueRepresentation::US, DicomValue::int(4))
      .put(BitsAllocated, ValueRepresentation::US, DicomValue::int(1));
    assert_eq!(frame(&dataset, 2).unwrap(), vec![0x0F, 0xF0]);

    dataset.put(Columns, ValueRepresentation::US, DicomValue::int(3));
    assert_eq!(frame(&dataset, 1).unwrap_err().kind(), ErrorKind::UnsupportedFormat);
  }

  #[test]
  fn oversized_geometry_is_not_found() {
    let mut dataset = image(Some(4), vec![0; 4]);
    dataset
      .put(Rows, ValueRepresentation::UL, DicomValue::int(1 << 31))
      .put(Columns, ValueRepresentation::UL, DicomValue::int(1 << 31))
      .put(BitsAllocated, ValueRepresentation::US, DicomValue::int(8));
    for n in 1..=4 {
      assert!(frame(&dataset, n).is_err(), "frame {}", n);
    }
    #[cfg(target_pointer_width = "64")]
    assert_eq!(frame(&dataset, 4).unwrap_err().kind(), ErrorKind::NotFound);
  }
}
