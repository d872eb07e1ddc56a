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

//! Serialization of a [`Dataset`] to a PS3.10 stream.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::dataset::{DataElement, Dataset, DicomValue, Scalar};
use crate::dicom_tags::{
  FileMetaInformationGroupLength, FileMetaInformationVersion, ImplementationVersionName, Item,
  ItemDelimitationItem, MediaStorageSOPClassUID, MediaStorageSOPInstanceUID, SOPClassUID, SOPInstanceUID,
  SequenceDelimitationItem, TransferSyntaxUID,
};
use crate::error::DicomError;
use crate::instance::UNDEFINED_LENGTH;
use crate::misc::{MAGIC, PREAMBLE_LENGTH};
use crate::tags::Tag;
use crate::transfer_syntax;
use crate::transfer_syntax::Encoding;
use crate::value_representation::ValueRepresentation;

const IMPLEMENTATION_VERSION_NAME: &str = concat!("RDICOMWEB_", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct WriteOptions {
  pub transfer_syntax_uid: String,
  /// Write sequences and items with undefined length and delimiters.
  pub undefined_length_sequences: bool,
}

impl Default for WriteOptions {
  fn default() -> Self {
    WriteOptions {
      transfer_syntax_uid: transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN.to_string(),
      undefined_length_sequences: false,
    }
  }
}

pub fn write(dataset: &Dataset, transfer_syntax_uid: &str) -> Result<Vec<u8>, DicomError> {
  write_with_options(dataset, &WriteOptions {
    transfer_syntax_uid: transfer_syntax_uid.to_string(),
    ..WriteOptions::default()
  })
}

/// Preamble, `DICM`, file meta group and the dataset encoded in the
/// requested transfer syntax.
pub fn write_with_options(dataset: &Dataset, options: &WriteOptions) -> Result<Vec<u8>, DicomError> {
  let ts = transfer_syntax::lookup(&options.transfer_syntax_uid).ok_or_else(|| {
    DicomError::invalid_argument(&format!("unknown transfer syntax {}", options.transfer_syntax_uid))
  })?;

  let meta_encoder = Encoder { encoding: Encoding::EXPLICIT_LE, undefined_length_sequences: false };
  let mut meta = Vec::new();
  meta_encoder.write_dataset(&mut meta, &file_meta(dataset, ts.uid))?;

  let encoder = Encoder {
    encoding: ts.encoding,
    undefined_length_sequences: options.undefined_length_sequences,
  };
  let mut body = Vec::new();
  encoder.write_dataset(&mut body, dataset)?;
  if ts.deflated {
    let mut deflater = DeflateEncoder::new(Vec::new(), Compression::default());
    deflater.write_all(&body)?;
    body = deflater.finish()?;
  }

  let mut out = Vec::with_capacity(PREAMBLE_LENGTH + MAGIC.len() + 12 + meta.len() + body.len());
  out.extend_from_slice(&[0; PREAMBLE_LENGTH]);
  out.extend_from_slice(MAGIC);
  let group_length = DataElement::new(
    FileMetaInformationGroupLength,
    ValueRepresentation::UL,
    DicomValue::int(meta.len() as i64),
  );
  meta_encoder.write_element(&mut out, &group_length)?;
  out.extend_from_slice(&meta);
  out.extend_from_slice(&body);
  Ok(out)
}

pub fn write_file<P: AsRef<Path>>(path: P, dataset: &Dataset, options: &WriteOptions) -> Result<(), DicomError> {
  let buffer = write_with_options(dataset, options)?;
  let mut writer = BufWriter::new(File::create(path.as_ref())?);
  writer.write_all(&buffer)?;
  writer.flush()?;
  Ok(())
}

/// A bare dataset without preamble nor file meta group.
pub fn write_dataset(dataset: &Dataset, encoding: Encoding) -> Result<Vec<u8>, DicomError> {
  let mut out = Vec::new();
  Encoder { encoding, undefined_length_sequences: false }.write_dataset(&mut out, dataset)?;
  Ok(out)
}

fn file_meta(dataset: &Dataset, transfer_syntax_uid: &str) -> Dataset {
  let mut meta = dataset.file_meta().cloned().unwrap_or_default();
  meta.set_file_meta(None);
  meta.remove(FileMetaInformationGroupLength);
  if !meta.contains(FileMetaInformationVersion) {
    meta.put(FileMetaInformationVersion, ValueRepresentation::OB, DicomValue::Opaque(vec![0, 1]));
  }
  for (source, target) in [(SOPClassUID, MediaStorageSOPClassUID), (SOPInstanceUID, MediaStorageSOPInstanceUID)] {
    if meta.contains(target) {
      continue;
    }
    if let Some(uid) = dataset.get_string(source) {
      meta.put(target, ValueRepresentation::UI, DicomValue::text(&uid));
    }
  }
  meta.put(TransferSyntaxUID, ValueRepresentation::UI, DicomValue::text(transfer_syntax_uid));
  if !meta.contains(ImplementationVersionName) {
    meta.put(ImplementationVersionName, ValueRepresentation::SH, DicomValue::text(IMPLEMENTATION_VERSION_NAME));
  }
  meta
}

macro_rules! put_number {
  ($out:expr, $value:expr, $big_endian:expr) => {
    if $big_endian {
      $out.extend_from_slice(&$value.to_be_bytes())
    } else {
      $out.extend_from_slice(&$value.to_le_bytes())
    }
  };
}

struct Encoder {
  encoding: Encoding,
  undefined_length_sequences: bool,
}

impl Encoder {
  fn write_u16(&self, out: &mut Vec<u8>, value: u16) {
    put_number!(out, value, self.encoding.big_endian);
  }

  fn write_u32(&self, out: &mut Vec<u8>, value: u32) {
    put_number!(out, value, self.encoding.big_endian);
  }

  fn write_tag(&self, out: &mut Vec<u8>, tag: Tag) {
    self.write_u16(out, tag.group);
    self.write_u16(out, tag.element);
  }

  fn write_marker(&self, out: &mut Vec<u8>, tag: Tag, length: u32) {
    self.write_tag(out, tag);
    self.write_u32(out, length);
  }

  fn write_header(&self, out: &mut Vec<u8>, tag: Tag, vr: ValueRepresentation, length: u32) -> Result<(), DicomError> {
    self.write_tag(out, tag);
    if !self.encoding.explicit_vr {
      self.write_u32(out, length);
      return Ok(());
    }
    out.extend_from_slice(vr.as_str().as_bytes());
    if vr.has_long_length() {
      out.extend_from_slice(&[0, 0]);
      self.write_u32(out, length);
    } else {
      let short = u16::try_from(length).map_err(|_| {
        DicomError::invalid_argument(&format!("{} value of {} bytes does not fit a {} element", tag, length, vr))
      })?;
      self.write_u16(out, short);
    }
    Ok(())
  }

  fn write_dataset(&self, out: &mut Vec<u8>, dataset: &Dataset) -> Result<(), DicomError> {
    for element in dataset {
      self.write_element(out, element)?;
    }
    Ok(())
  }

  fn write_element(&self, out: &mut Vec<u8>, element: &DataElement) -> Result<(), DicomError> {
    match &element.value {
      DicomValue::Sequence(items) => self.write_sequence(out, element.tag, items),
      DicomValue::Fragments(fragments) => {
        self.write_header(out, element.tag, element.vr, UNDEFINED_LENGTH)?;
        for fragment in fragments {
          let padded = fragment.len() + fragment.len() % 2;
          self.write_marker(out, Item, length_of(padded)?);
          out.extend_from_slice(fragment);
          out.resize(out.len() + padded - fragment.len(), 0);
        }
        self.write_marker(out, SequenceDelimitationItem, 0);
        Ok(())
      }
      value => {
        let bytes = self.value_bytes(element.tag, element.vr, value)?;
        self.write_header(out, element.tag, element.vr, length_of(bytes.len())?)?;
        out.extend_from_slice(&bytes);
        Ok(())
      }
    }
  }

  fn write_sequence(&self, out: &mut Vec<u8>, tag: Tag, items: &[Dataset]) -> Result<(), DicomError> {
    let mut content = Vec::new();
    for item in items {
      let mut item_bytes = Vec::new();
      self.write_dataset(&mut item_bytes, item)?;
      if self.undefined_length_sequences {
        self.write_marker(&mut content, Item, UNDEFINED_LENGTH);
        content.extend_from_slice(&item_bytes);
        self.write_marker(&mut content, ItemDelimitationItem, 0);
      } else {
        self.write_marker(&mut content, Item, length_of(item_bytes.len())?);
        content.extend_from_slice(&item_bytes);
      }
    }
    if self.undefined_length_sequences {
      self.write_header(out, tag, ValueRepresentation::SQ, UNDEFINED_LENGTH)?;
      out.extend_from_slice(&content);
      self.write_marker(out, SequenceDelimitationItem, 0);
    } else {
      self.write_header(out, tag, ValueRepresentation::SQ, length_of(content.len())?)?;
      out.extend_from_slice(&content);
    }
    Ok(())
  }

  /// Value bytes padded to an even length.
  fn value_bytes(&self, tag: Tag, vr: ValueRepresentation, value: &DicomValue) -> Result<Vec<u8>, DicomError> {
    let mut bytes = match value {
      DicomValue::Empty => vec![],
      DicomValue::Opaque(bytes) => bytes.clone(),
      DicomValue::Single(_) | DicomValue::Multi(_) if vr.is_text() => value
        .scalars()
        .iter()
        .map(|scalar| scalar.to_string())
        .collect::<Vec<String>>()
        .join("\\")
        .into_bytes(),
      DicomValue::Single(_) | DicomValue::Multi(_) => {
        let mut bytes = Vec::new();
        for scalar in value.scalars() {
          self.write_number(&mut bytes, tag, vr, scalar)?;
        }
        bytes
      }
      DicomValue::Sequence(_) | DicomValue::Fragments(_) => {
        return Err(DicomError::invalid_argument(&format!("{} cannot be written as a plain value", tag)));
      }
    };
    if bytes.len() % 2 == 1 {
      bytes.push(vr.padding());
    }
    Ok(bytes)
  }

  fn write_number(&self, out: &mut Vec<u8>, tag: Tag, vr: ValueRepresentation, scalar: &Scalar) -> Result<(), DicomError> {
    let big_endian = self.encoding.big_endian;
    let mismatch = || DicomError::invalid_argument(&format!("{} {} cannot hold {}", tag, vr, scalar));
    let int = || scalar.as_i64().ok_or_else(mismatch);
    match vr {
      ValueRepresentation::US => put_number!(out, u16::try_from(int()?).map_err(|_| mismatch())?, big_endian),
      ValueRepresentation::SS => put_number!(out, i16::try_from(int()?).map_err(|_| mismatch())?, big_endian),
      ValueRepresentation::UL => put_number!(out, u32::try_from(int()?).map_err(|_| mismatch())?, big_endian),
      ValueRepresentation::SL => put_number!(out, i32::try_from(int()?).map_err(|_| mismatch())?, big_endian),
      ValueRepresentation::SV => put_number!(out, int()?, big_endian),
      ValueRepresentation::UV => {
        let value = match scalar {
          Scalar::Text(text) => text.trim().parse::<u64>().map_err(|_| mismatch())?,
          _ => u64::try_from(int()?).map_err(|_| mismatch())?,
        };
        put_number!(out, value, big_endian)
      }
      ValueRepresentation::FL => put_number!(out, scalar.as_f64().ok_or_else(mismatch)? as f32, big_endian),
      ValueRepresentation::FD => put_number!(out, scalar.as_f64().ok_or_else(mismatch)?, big_endian),
      ValueRepresentation::AT => {
        let target = Tag::try_from(scalar.to_string().as_str())?;
        put_number!(out, target.group, big_endian);
        put_number!(out, target.element, big_endian);
      }
      _ => return Err(mismatch()),
    }
    Ok(())
  }
}

fn length_of(length: usize) -> Result<u32, DicomError> {
  match u32::try_from(length) {
    Ok(length) if length != UNDEFINED_LENGTH => Ok(length),
    _ => Err(DicomError::invalid_argument(&format!("value of {} bytes is too large", length))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dicom_tags::*;
  use crate::instance::decode;

  fn sample() -> Dataset {
    let mut item = Dataset::new();
    item
      .put(ReferencedSOPClassUID, ValueRepresentation::UI, DicomValue::text("1.2.840.10008.5.1.4.1.1.2"))
      .put(ReferencedSOPInstanceUID, ValueRepresentation::UI, DicomValue::text("1.2.3.4.5"));
    let mut dataset = Dataset::new();
    dataset
      .put(ImageType, ValueRepresentation::CS, DicomValue::Multi(vec![Scalar::from("DERIVED"), Scalar::from("SECONDARY")]))
      .put(SOPClassUID, ValueRepresentation::UI, DicomValue::text("1.2.840.10008.5.1.4.1.1.7"))
      .put(SOPInstanceUID, ValueRepresentation::UI, DicomValue::text("1.2.3.4.5.6"))
      .put(StudyDate, ValueRepresentation::DA, DicomValue::Single(Scalar::DateTime("20240131".to_string())))
      .put(ReferencedImageSequence, ValueRepresentation::SQ, DicomValue::Sequence(vec![item]))
      .put(PatientName, ValueRepresentation::PN, DicomValue::text("Doe^Jane"))
      .put(PatientID, ValueRepresentation::LO, DicomValue::Empty)
      .put(InstanceNumber, ValueRepresentation::IS, DicomValue::int(7))
      .put(Rows, ValueRepresentation::US, DicomValue::int(2))
      .put(Columns, ValueRepresentation::US, DicomValue::int(2))
      .put(PixelSpacing, ValueRepresentation::DS, DicomValue::floats(&[0.5, 0.25]))
      .put(FrameIncrementPointer, ValueRepresentation::AT, DicomValue::text("00181063"))
      .put(RescaleSlope, ValueRepresentation::DS, DicomValue::float(1.5))
      .put(PixelData, ValueRepresentation::OW, DicomValue::Opaque(vec![1, 2, 3, 4, 5, 6, 7, 8]));
    dataset
  }

  fn elements(dataset: &Dataset) -> Vec<DataElement> {
    dataset.iter().cloned().collect()
  }

  #[test]
  fn round_trips_native_syntaxes() {
    let dataset = sample();
    for uid in [
      transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN,
      transfer_syntax::IMPLICIT_VR_LITTLE_ENDIAN,
      transfer_syntax::EXPLICIT_VR_BIG_ENDIAN,
      transfer_syntax::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
    ] {
      let decoded = decode(&write(&dataset, uid).unwrap()).unwrap();
      assert_eq!(elements(&decoded), elements(&dataset), "{}", uid);
      assert_eq!(decoded.transfer_syntax_uid().as_deref(), Some(uid));
    }
  }

  #[test]
  fn undefined_length_sequences_decode_the_same() {
    let dataset = sample();
    let options = WriteOptions { undefined_length_sequences: true, ..WriteOptions::default() };
    let undefined = write_with_options(&dataset, &options).unwrap();
    let defined = write(&dataset, transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN).unwrap();
    assert_ne!(undefined, defined);
    assert_eq!(decode(&undefined).unwrap(), decode(&defined).unwrap());
  }

  #[test]
  fn file_meta_is_derived_from_the_dataset() {
    let decoded = decode(&write(&sample(), transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN).unwrap()).unwrap();
    let meta = decoded.file_meta().unwrap();
    assert_eq!(meta.get_string(MediaStorageSOPInstanceUID).as_deref(), Some("1.2.3.4.5.6"));
    assert_eq!(meta.get_string(MediaStorageSOPClassUID).as_deref(), Some("1.2.840.10008.5.1.4.1.1.7"));
    let group_length = meta.get_int(FileMetaInformationGroupLength).unwrap() as usize;
    let encoded: usize = meta
      .iter()
      .filter(|e| e.tag != FileMetaInformationGroupLength)
      .map(|e| {
        let encoder = Encoder { encoding: Encoding::EXPLICIT_LE, undefined_length_sequences: false };
        let mut out = vec![];
        encoder.write_element(&mut out, e).unwrap();
        out.len()
      })
      .sum();
    assert_eq!(group_length, encoded);
  }

  #[test]
  fn pads_values_to_even_length() {
    let mut dataset = Dataset::new();
    dataset
      .put(Modality, ValueRepresentation::CS, DicomValue::text("MRI"))
      .put(StudyInstanceUID, ValueRepresentation::UI, DicomValue::text("1.2.3"));
    let bytes = write_dataset(&dataset, Encoding::EXPLICIT_LE).unwrap();
    assert_eq!(&bytes[6..12], b"\x04\x00MRI ");
    assert_eq!(&bytes[18..25], b"\x06\x001.2.3");
    assert_eq!(bytes[25], 0);
  }

  #[test]
  fn rejects_unknown_syntax_and_oversized_short_values() {
    assert!(write(&sample(), "1.2.3.4").is_err());

    let mut dataset = Dataset::new();
    dataset.put(StudyDescription, ValueRepresentation::LO, DicomValue::text(&"x".repeat(70_000)));
    assert!(write_dataset(&dataset, Encoding::EXPLICIT_LE).is_err());
    assert!(write_dataset(&dataset, Encoding::IMPLICIT_LE).is_ok());
  }
}
