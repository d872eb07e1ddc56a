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

//! Binary decoding of DICOM streams into a [`Dataset`].
//!
//! Accepts Part-10 files (preamble, `DICM` and file meta group) as well as
//! raw datasets without a header. The main dataset is read according to the
//! transfer syntax found in the file meta group, or guessed when absent.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use flate2::read::DeflateDecoder;
use log::debug;

use crate::dataset::{DataElement, Dataset, DicomValue, Scalar};
use crate::dicom_tags;
use crate::dicom_tags::{Item, ItemDelimitationItem, PixelRepresentation, SequenceDelimitationItem, TransferSyntaxUID};
use crate::error::DicomError;
use crate::misc::{has_dicom_header, MAGIC, PREAMBLE_LENGTH};
use crate::tags::Tag;
use crate::transfer_syntax;
use crate::transfer_syntax::Encoding;
use crate::value_representation::ValueRepresentation;
use crate::value_representation::ValueRepresentation::{SQ, SS, UN, US};

pub const UNDEFINED_LENGTH: u32 = 0xFFFFFFFF;
pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_MAX_INFLATED_SIZE: usize = 2 * 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
  /// Maximum sequence nesting before the stream is rejected.
  pub max_depth: usize,
  /// Largest dataset a deflated stream may inflate to, in bytes.
  pub max_inflated_size: usize,
}

impl Default for DecodeOptions {
  fn default() -> Self {
    DecodeOptions { max_depth: DEFAULT_MAX_DEPTH, max_inflated_size: DEFAULT_MAX_INFLATED_SIZE }
  }
}

pub fn decode(buffer: &[u8]) -> Result<Dataset, DicomError> {
  decode_with_options(buffer, &DecodeOptions::default())
}

pub fn decode_with_options(buffer: &[u8], options: &DecodeOptions) -> Result<Dataset, DicomError> {
  if buffer.is_empty() {
    return Err(DicomError::new("empty input"));
  }
  let start = if has_dicom_header(buffer) { PREAMBLE_LENGTH + MAGIC.len() } else { 0 };

  let mut meta_parser = Parser::new(buffer, start, Encoding::EXPLICIT_LE, options.max_depth);
  let file_meta = meta_parser.parse_file_meta()?;
  let offset = meta_parser.offset;

  let transfer_syntax_uid = file_meta.as_ref().and_then(|meta| meta.get_string(TransferSyntaxUID));
  let (encoding, deflated) = match transfer_syntax_uid.as_deref() {
    Some(uid) => match transfer_syntax::lookup(uid) {
      Some(ts) => (ts.encoding, ts.deflated),
      None => {
        debug!("unknown transfer syntax {}, reading as explicit VR little endian", uid);
        (Encoding::EXPLICIT_LE, false)
      }
    },
    None => (guess_encoding(&buffer[offset..]), false),
  };

  let mut dataset = if deflated {
    let mut inflated = Vec::new();
    DeflateDecoder::new(&buffer[offset..])
      .take(options.max_inflated_size as u64 + 1)
      .read_to_end(&mut inflated)
      .map_err(|e| DicomError::new(&format!("cannot inflate dataset at {:#x}: {}", offset, e)))?;
    if inflated.len() > options.max_inflated_size {
      return Err(DicomError::new(&format!(
        "deflated dataset inflates past {} bytes", options.max_inflated_size)));
    }
    Parser::new(&inflated, 0, encoding, options.max_depth).parse_root()?
  } else {
    Parser::new(buffer, offset, encoding, options.max_depth).parse_root()?
  };

  if dataset.is_empty() && file_meta.is_none() {
    return Err(DicomError::new("no data element found"));
  }
  debug!("decoded {} elements ({:?}, deflated: {})", dataset.len(), encoding, deflated);
  dataset.set_file_meta(file_meta);
  Ok(dataset)
}

pub fn decode_reader<R: Read>(mut reader: R, options: &DecodeOptions) -> Result<Dataset, DicomError> {
  let mut buffer = Vec::new();
  reader.read_to_end(&mut buffer)?;
  decode_with_options(&buffer, options)
}

pub fn decode_file<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Dataset, DicomError> {
  let f = File::open(path.as_ref())?;
  decode_reader(BufReader::new(f), options)
}

/// Without a transfer syntax, a valid VR right after the first tag means
/// explicit VR little endian.
fn guess_encoding(buffer: &[u8]) -> Encoding {
  if buffer.len() >= 6 && ValueRepresentation::from_bytes([buffer[4], buffer[5]]).is_some() {
    Encoding::EXPLICIT_LE
  } else {
    Encoding::IMPLICIT_LE
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
  Length(usize),
  Delimited,
  EndOfStream,
}

struct Parser<'a> {
  buffer: &'a [u8],
  offset: usize,
  encoding: Encoding,
  max_depth: usize,
}

impl<'a> Parser<'a> {
  fn new(buffer: &'a [u8], offset: usize, encoding: Encoding, max_depth: usize) -> Parser<'a> {
    Parser { buffer, offset, encoding, max_depth }
  }

  fn take(&mut self, length: usize) -> Result<&'a [u8], DicomError> {
    let remaining = self.buffer.len() - self.offset;
    if length > remaining {
      return Err(DicomError::new(&format!(
        "truncated stream: {} bytes needed at {:#x}, {} left", length, self.offset, remaining)));
    }
    let bytes = &self.buffer[self.offset..self.offset + length];
    self.offset += length;
    Ok(bytes)
  }

  fn read_u16(&mut self) -> Result<u16, DicomError> {
    let big_endian = self.encoding.big_endian;
    let b = self.take(2)?;
    Ok(if big_endian { u16::from_be_bytes([b[0], b[1]]) } else { u16::from_le_bytes([b[0], b[1]]) })
  }

  fn read_u32(&mut self) -> Result<u32, DicomError> {
    let big_endian = self.encoding.big_endian;
    let b = self.take(4)?;
    let raw = [b[0], b[1], b[2], b[3]];
    Ok(if big_endian { u32::from_be_bytes(raw) } else { u32::from_le_bytes(raw) })
  }

  fn read_tag(&mut self) -> Result<Tag, DicomError> {
    let group = self.read_u16()?;
    let element = self.read_u16()?;
    Ok(Tag::new(group, element))
  }

  fn peek_group(&self) -> Option<u16> {
    let b = self.buffer.get(self.offset..self.offset + 2)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
  }

  /// End offset of a defined length value, `None` when undefined.
  fn end_of(&self, length: u32) -> Result<Option<usize>, DicomError> {
    if length == UNDEFINED_LENGTH {
      return Ok(None);
    }
    let end = self.offset + length as usize;
    if end > self.buffer.len() {
      return Err(DicomError::new(&format!(
        "length {} at {:#x} runs past the end of the stream", length, self.offset)));
    }
    Ok(Some(end))
  }

  /// Reads group 0002 elements. Their group length is not trusted.
  fn parse_file_meta(&mut self) -> Result<Option<Dataset>, DicomError> {
    let mut meta = Dataset::new();
    while self.peek_group() == Some(0x0002) {
      let tag = self.read_tag()?;
      let element = self.parse_element(tag, &meta, 0)?;
      meta.insert(element);
    }
    Ok(if meta.is_empty() { None } else { Some(meta) })
  }

  fn parse_root(&mut self) -> Result<Dataset, DicomError> {
    self.parse_dataset(Bound::EndOfStream, 0)
  }

  fn parse_dataset(&mut self, bound: Bound, depth: usize) -> Result<Dataset, DicomError> {
    let mut dataset = Dataset::new();
    loop {
      match bound {
        Bound::EndOfStream if self.offset >= self.buffer.len() => break,
        Bound::Length(end) if self.offset == end => break,
        Bound::Length(end) if self.offset > end => {
          return Err(DicomError::new(&format!(
            "item content overruns its length ({:#x} past {:#x})", self.offset, end)));
        }
        Bound::Delimited if self.offset >= self.buffer.len() => {
          return Err(DicomError::new("item of undefined length is never delimited"));
        }
        _ => {}
      }
      let tag = self.read_tag()?;
      if tag == ItemDelimitationItem {
        self.read_u32()?;
        if bound == Bound::Delimited {
          break;
        }
        debug!("stray item delimitation at {:#x}", self.offset - 8);
        continue;
      }
      if tag.group == 0xFFFE {
        return Err(DicomError::new(&format!("unexpected {} at {:#x}", tag, self.offset - 4)));
      }
      let element = self.parse_element(tag, &dataset, depth)?;
      dataset.insert(element);
    }
    Ok(dataset)
  }

  fn implicit_vr(&self, tag: Tag, current: &Dataset) -> ValueRepresentation {
    let vr = dicom_tags::implicit_vr(tag);
    if vr == US
      && dicom_tags::depends_on_pixel_representation(tag)
      && current.get_int(PixelRepresentation) == Some(1)
    {
      SS
    } else {
      vr
    }
  }

  fn parse_element(&mut self, tag: Tag, current: &Dataset, depth: usize) -> Result<DataElement, DicomError> {
    let header_offset = self.offset - 4;
    let (vr, length) = if self.encoding.explicit_vr {
      let code = self.take(2)?;
      let vr = match ValueRepresentation::from_bytes([code[0], code[1]]) {
        Some(vr) => vr,
        None => {
          debug!("unknown VR {:?} for {} at {:#x}, reading as UN", code, tag, header_offset);
          UN
        }
      };
      let length = if vr.has_long_length() {
        self.take(2)?;
        self.read_u32()?
      } else {
        self.read_u16()? as u32
      };
      (vr, length)
    } else {
      (self.implicit_vr(tag, current), self.read_u32()?)
    };

    if vr == SQ {
      let items = self.parse_sequence(length, depth + 1)?;
      return Ok(DataElement::new(tag, SQ, DicomValue::Sequence(items)));
    }
    if length == UNDEFINED_LENGTH {
      if vr == UN {
        // An undefined length UN is a sequence in implicit VR little endian.
        let encoding = self.encoding;
        self.encoding = Encoding::IMPLICIT_LE;
        let items = self.parse_sequence(length, depth + 1);
        self.encoding = encoding;
        return Ok(DataElement::new(tag, SQ, DicomValue::Sequence(items?)));
      }
      let fragments = self.parse_fragments()?;
      return Ok(DataElement::new(tag, vr, DicomValue::Fragments(fragments)));
    }
    let bytes = self.take(length as usize)?;
    Ok(DataElement::new(tag, vr, decode_value(tag, vr, bytes, self.encoding.big_endian)))
  }

  fn parse_sequence(&mut self, length: u32, depth: usize) -> Result<Vec<Dataset>, DicomError> {
    if depth > self.max_depth {
      return Err(DicomError::new(&format!(
        "sequence nesting exceeds {} levels at {:#x}", self.max_depth, self.offset)));
    }
    let end = self.end_of(length)?;
    let mut items = vec![];
    loop {
      match end {
        Some(end) if self.offset == end => break,
        Some(end) if self.offset > end => {
          return Err(DicomError::new(&format!(
            "sequence content overruns its length ({:#x} past {:#x})", self.offset, end)));
        }
        None if self.offset >= self.buffer.len() => {
          return Err(DicomError::new("sequence of undefined length is never delimited"));
        }
        _ => {}
      }
      let tag = self.read_tag()?;
      let item_length = self.read_u32()?;
      match tag {
        Item => {
          let bound = match self.end_of(item_length)? {
            Some(item_end) => Bound::Length(item_end),
            None => Bound::Delimited,
          };
          items.push(self.parse_dataset(bound, depth)?);
        }
        SequenceDelimitationItem if end.is_none() => break,
        SequenceDelimitationItem => debug!("sequence delimitation inside a defined length sequence"),
        _ => {
          return Err(DicomError::new(&format!(
            "expected an item, found {} at {:#x}", tag, self.offset - 8)));
        }
      }
    }
    Ok(items)
  }

  fn parse_fragments(&mut self) -> Result<Vec<Vec<u8>>, DicomError> {
    let mut fragments = vec![];
    loop {
      let tag = self.read_tag()?;
      let length = self.read_u32()?;
      match tag {
        SequenceDelimitationItem => break,
        Item if length != UNDEFINED_LENGTH => fragments.push(self.take(length as usize)?.to_vec()),
        _ => {
          return Err(DicomError::new(&format!(
            "malformed fragment {} of length {:#x} at {:#x}", tag, length, self.offset - 8)));
        }
      }
    }
    Ok(fragments)
  }
}

fn decode_value(tag: Tag, vr: ValueRepresentation, bytes: &[u8], big_endian: bool) -> DicomValue {
  if bytes.is_empty() {
    return DicomValue::Empty;
  }
  if vr.is_text() {
    return decode_text(vr, bytes);
  }
  if let Some(width) = vr.numeric_width() {
    if bytes.len() % width != 0 {
      debug!("{} {}: {} trailing bytes ignored", tag, vr, bytes.len() % width);
    }
    let values: Option<Vec<Scalar>> = bytes
      .chunks_exact(width)
      .map(|chunk| decode_number(vr, chunk, big_endian))
      .collect();
    return match values {
      Some(values) if values.is_empty() => DicomValue::Empty,
      Some(mut values) if values.len() == 1 => DicomValue::Single(values.remove(0)),
      Some(values) => DicomValue::Multi(values),
      None => DicomValue::Opaque(bytes.to_vec()),
    };
  }
  DicomValue::Opaque(bytes.to_vec())
}

fn is_padding(c: char) -> bool {
  c == ' ' || c == '\0'
}

fn decode_text(vr: ValueRepresentation, bytes: &[u8]) -> DicomValue {
  let text = String::from_utf8_lossy(bytes);
  let parts: Vec<&str> = if vr.is_single_valued_text() {
    vec![text.trim_end_matches(is_padding)]
  } else {
    text.split('\\').map(|part| part.trim_matches(is_padding)).collect()
  };
  match parts.as_slice() {
    [] | [""] => DicomValue::Empty,
    [part] => DicomValue::Single(text_scalar(vr, part)),
    _ => DicomValue::Multi(parts.iter().map(|part| text_scalar(vr, part)).collect()),
  }
}

fn text_scalar(vr: ValueRepresentation, value: &str) -> Scalar {
  match vr {
    ValueRepresentation::IS => match value.parse::<i64>() {
      Ok(number) => Scalar::Int(number),
      Err(_) => Scalar::Text(value.to_string()),
    },
    ValueRepresentation::DS => match value.parse::<f64>() {
      Ok(number) if number.is_finite() => Scalar::Float(number),
      _ => Scalar::Text(value.to_string()),
    },
    ValueRepresentation::DA | ValueRepresentation::DT | ValueRepresentation::TM => {
      Scalar::DateTime(value.to_string())
    }
    _ => Scalar::Text(value.to_string()),
  }
}

macro_rules! read_number {
  ($ty:ty, $chunk:expr, $big_endian:expr) => {{
    let mut raw = [0u8; std::mem::size_of::<$ty>()];
    raw.copy_from_slice($chunk);
    if $big_endian { <$ty>::from_be_bytes(raw) } else { <$ty>::from_le_bytes(raw) }
  }};
}

fn decode_number(vr: ValueRepresentation, chunk: &[u8], big_endian: bool) -> Option<Scalar> {
  let value = match vr {
    ValueRepresentation::US => Scalar::Int(read_number!(u16, chunk, big_endian) as i64),
    ValueRepresentation::SS => Scalar::Int(read_number!(i16, chunk, big_endian) as i64),
    ValueRepresentation::UL => Scalar::Int(read_number!(u32, chunk, big_endian) as i64),
    ValueRepresentation::SL => Scalar::Int(read_number!(i32, chunk, big_endian) as i64),
    ValueRepresentation::SV => Scalar::Int(read_number!(i64, chunk, big_endian)),
    ValueRepresentation::UV => {
      let value = read_number!(u64, chunk, big_endian);
      match i64::try_from(value) {
        Ok(value) => Scalar::Int(value),
        Err(_) => Scalar::Text(value.to_string()),
      }
    }
    ValueRepresentation::FL => Scalar::Float(read_number!(f32, chunk, big_endian) as f64),
    ValueRepresentation::FD => Scalar::Float(read_number!(f64, chunk, big_endian)),
    ValueRepresentation::AT => {
      let group = read_number!(u16, &chunk[..2], big_endian);
      let element = read_number!(u16, &chunk[2..], big_endian);
      Scalar::Text(Tag::new(group, element).to_hex())
    }
    _ => return None,
  };
  Some(value)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dicom_tags::*;
  use crate::error::ErrorKind;

  fn explicit(group: u16, element: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
    let mut out = vec![];
    out.extend_from_slice(&group.to_le_bytes());
    out.extend_from_slice(&element.to_le_bytes());
    out.extend_from_slice(vr);
    let long = ValueRepresentation::from_bytes(*vr).map(|vr| vr.has_long_length()).unwrap_or(true);
    if long {
      out.extend_from_slice(&[0, 0]);
      out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    } else {
      out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    }
    out.extend_from_slice(value);
    out
  }

  fn implicit(group: u16, element: u16, value: &[u8]) -> Vec<u8> {
    let mut out = vec![];
    out.extend_from_slice(&group.to_le_bytes());
    out.extend_from_slice(&element.to_le_bytes());
    out.extend_from_slice(&(value.len() as u32).to_le_bytes());
    out.extend_from_slice(value);
    out
  }

  fn marker(element: u16, length: u32) -> Vec<u8> {
    let mut out = vec![0xFE, 0xFF];
    out.extend_from_slice(&element.to_le_bytes());
    out.extend_from_slice(&length.to_le_bytes());
    out
  }

  fn part10(transfer_syntax_uid: &str, body: &[u8]) -> Vec<u8> {
    let mut uid = transfer_syntax_uid.as_bytes().to_vec();
    if uid.len() % 2 == 1 {
      uid.push(0);
    }
    let mut out = vec![0u8; 128];
    out.extend_from_slice(b"DICM");
    out.extend(explicit(0x0002, 0x0010, b"UI", &uid));
    out.extend_from_slice(body);
    out
  }

  #[test]
  fn decodes_explicit_little_endian_file() {
    let mut body = explicit(0x0010, 0x0010, b"PN", b"Doe^Jane");
    body.extend(explicit(0x0028, 0x0010, b"US", &512u16.to_le_bytes()));
    body.extend(explicit(0x0028, 0x0030, b"DS", b"0.5\\0.25"));
    let dataset = decode(&part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap();

    assert_eq!(dataset.transfer_syntax_uid().as_deref(), Some(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN));
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.get_string(PatientName).as_deref(), Some("Doe^Jane"));
    assert_eq!(dataset.get_int(Rows), Some(512));
    assert_eq!(dataset.get_floats(PixelSpacing), Some(vec![0.5, 0.25]));
    assert!(!dataset.contains(TransferSyntaxUID));
  }

  #[test]
  fn decodes_headerless_implicit_stream() {
    let mut body = implicit(0x0008, 0x0060, b"CT");
    body.extend(implicit(0x0028, 0x0011, &256u16.to_le_bytes()));
    let dataset = decode(&body).unwrap();

    assert!(dataset.file_meta().is_none());
    assert_eq!(dataset.get(Modality).unwrap().vr, ValueRepresentation::CS);
    assert_eq!(dataset.get_int(Columns), Some(256));
  }

  #[test]
  fn unknown_implicit_tag_is_opaque_and_decoding_continues() {
    let mut body = implicit(0x0019, 0x100C, &[1, 2, 3, 4]);
    body.extend(implicit(0x0020, 0x000D, b"1.2.3\0"));
    let dataset = decode(&part10(transfer_syntax::IMPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap();

    let private = dataset.get(Tag::new(0x0019, 0x100C)).unwrap();
    assert_eq!(private.vr, UN);
    assert_eq!(private.value, DicomValue::Opaque(vec![1, 2, 3, 4]));
    assert_eq!(dataset.get_string(StudyInstanceUID).as_deref(), Some("1.2.3"));
  }

  #[test]
  fn decodes_big_endian() {
    let mut body = vec![0x00, 0x28, 0x00, 0x10, b'U', b'S', 0x00, 0x02, 0x02, 0x00];
    body.extend_from_slice(&[0x00, 0x28, 0x00, 0x30, b'D', b'S', 0x00, 0x04]);
    body.extend_from_slice(b"2\\3 ");
    let dataset = decode(&part10(transfer_syntax::EXPLICIT_VR_BIG_ENDIAN, &body)).unwrap();

    assert_eq!(dataset.get_int(Rows), Some(512));
    assert_eq!(dataset.get_floats(PixelSpacing), Some(vec![2.0, 3.0]));
  }

  #[test]
  fn rejects_empty_and_truncated_input() {
    assert_eq!(decode(&[]).unwrap_err().kind(), ErrorKind::Parse);

    let mut body = explicit(0x0010, 0x0010, b"PN", b"Doe^Jane");
    body.extend_from_slice(&[0x10, 0x00, 0x20]);
    let error = decode(&part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Parse);

    let mut body = explicit(0x0010, 0x0010, b"PN", b"Doe^Jane");
    body.truncate(body.len() - 2);
    assert!(decode(&part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &body)).is_err());
  }

  #[test]
  fn header_only_file_is_an_error() {
    let mut buffer = vec![0u8; 128];
    buffer.extend_from_slice(b"DICM");
    assert!(decode(&buffer).is_err());
  }

  fn referenced_item() -> Vec<u8> {
    let mut item = explicit(0x0008, 0x1150, b"UI", b"1.2.840.10008.5.1.4.1.1.2\0");
    item.extend(explicit(0x0008, 0x1155, b"UI", b"1.2.3.4"));
    item
  }

  #[test]
  fn defined_and_undefined_length_sequences_agree() {
    let item = referenced_item();

    let mut defined_items = marker(0xE000, item.len() as u32);
    defined_items.extend_from_slice(&item);
    let defined = explicit(0x0008, 0x1140, b"SQ", &defined_items);

    let mut undefined = vec![0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
    undefined.extend(marker(0xE000, UNDEFINED_LENGTH));
    undefined.extend_from_slice(&item);
    undefined.extend(marker(0xE00D, 0));
    undefined.extend(marker(0xE0DD, 0));

    let a = decode(&part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &defined)).unwrap();
    let b = decode(&part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &undefined)).unwrap();
    assert_eq!(a, b);

    let items = a.get_items(ReferencedImageSequence).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].get_string(ReferencedSOPInstanceUID).as_deref(), Some("1.2.3.4"));
  }

  fn nested_sequences(levels: usize) -> Vec<u8> {
    let mut body = vec![];
    for _ in 0..levels {
      body.extend_from_slice(&[0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
      body.extend(marker(0xE000, UNDEFINED_LENGTH));
    }
    for _ in 0..levels {
      body.extend(marker(0xE00D, 0));
      body.extend(marker(0xE0DD, 0));
    }
    part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &body)
  }

  #[test]
  fn nesting_is_limited() {
    let buffer = nested_sequences(5);
    assert!(decode(&buffer).is_ok());
    let error = decode_with_options(&buffer, &DecodeOptions { max_depth: 3, ..DecodeOptions::default() }).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Parse);
  }

  #[test]
  fn inflated_size_is_limited() {
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    let raw = explicit(0x7FE0, 0x0010, b"OB", &vec![0; 64 * 1024]);
    let mut deflater = DeflateEncoder::new(Vec::new(), Compression::best());
    deflater.write_all(&raw).unwrap();
    let buffer = part10(transfer_syntax::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN, &deflater.finish().unwrap());
    assert!(buffer.len() < 1024);

    assert_eq!(decode(&buffer).unwrap().get(PixelData).unwrap().value, DicomValue::Opaque(vec![0; 64 * 1024]));
    let exact = DecodeOptions { max_inflated_size: raw.len(), ..DecodeOptions::default() };
    assert!(decode_with_options(&buffer, &exact).is_ok());
    let small = DecodeOptions { max_inflated_size: 1024, ..DecodeOptions::default() };
    assert_eq!(decode_with_options(&buffer, &small).unwrap_err().kind(), ErrorKind::Parse);
  }

  #[test]
  fn unterminated_sequence_is_an_error() {
    let mut body = vec![0x08, 0x00, 0x40, 0x11, b'S', b'Q', 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
    body.extend(marker(0xE000, UNDEFINED_LENGTH));
    body.extend_from_slice(&referenced_item());
    assert!(decode(&part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &body)).is_err());
  }

  #[test]
  fn undefined_length_un_is_read_as_a_sequence() {
    let mut body = vec![0x08, 0x00, 0x40, 0x11, b'U', b'N', 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
    body.extend(marker(0xE000, UNDEFINED_LENGTH));
    body.extend(implicit(0x0008, 0x1155, b"1.2.3.4"));
    body.extend(marker(0xE00D, 0));
    body.extend(marker(0xE0DD, 0));
    let dataset = decode(&part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap();

    let element = dataset.get(ReferencedImageSequence).unwrap();
    assert_eq!(element.vr, SQ);
    let items = dataset.get_items(ReferencedImageSequence).unwrap();
    assert_eq!(items[0].get_string(ReferencedSOPInstanceUID).as_deref(), Some("1.2.3.4"));
  }

  #[test]
  fn decodes_encapsulated_fragments() {
    let mut body = vec![0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
    body.extend(marker(0xE000, 0));
    body.extend(marker(0xE000, 4));
    body.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xD9]);
    body.extend(marker(0xE0DD, 0));
    let dataset = decode(&part10("1.2.840.10008.1.2.4.50", &body)).unwrap();

    assert_eq!(
      dataset.get(PixelData).unwrap().value,
      DicomValue::Fragments(vec![vec![], vec![0xFF, 0xD8, 0xFF, 0xD9]])
    );
  }

  #[test]
  fn decodes_values_by_vr() {
    let mut body = explicit(0x0008, 0x0008, b"CS", b"ORIGINAL\\PRIMARY");
    body.extend(explicit(0x0008, 0x0020, b"DA", b"20240101"));
    body.extend(explicit(0x0010, 0x0010, b"PN", b""));
    body.extend(explicit(0x0020, 0x0013, b"IS", b" 12 "));
    body.extend(explicit(0x0028, 0x0030, b"DS", b"abc "));
    body.extend(explicit(0x0028, 0x0034, b"IS", b"1\\2 "));
    let mut at = vec![];
    at.extend_from_slice(&0x0010u16.to_le_bytes());
    at.extend_from_slice(&0x0020u16.to_le_bytes());
    body.extend(explicit(0x0028, 0x0009, b"AT", &at));
    body.extend(explicit(0x0028, 0x0107, b"US", &[1, 0, 2, 0, 3]));
    let dataset = decode(&part10(transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap();

    assert_eq!(
      dataset.get(ImageType).unwrap().value,
      DicomValue::Multi(vec![Scalar::from("ORIGINAL"), Scalar::from("PRIMARY")])
    );
    assert_eq!(dataset.get(StudyDate).unwrap().value, DicomValue::Single(Scalar::DateTime("20240101".to_string())));
    assert_eq!(dataset.get(PatientName).unwrap().value, DicomValue::Empty);
    assert_eq!(dataset.get(InstanceNumber).unwrap().value, DicomValue::int(12));
    assert_eq!(dataset.get(PixelSpacing).unwrap().value, DicomValue::text("abc"));
    assert_eq!(dataset.get(PixelAspectRatio).unwrap().value.multiplicity(), 2);
    assert_eq!(dataset.get(FrameIncrementPointer).unwrap().value, DicomValue::text("00100020"));
    assert_eq!(
      dataset.get(LargestImagePixelValue).unwrap().value,
      DicomValue::Multi(vec![Scalar::Int(1), Scalar::Int(2)])
    );
  }

  #[test]
  fn pixel_representation_selects_signed_vr() {
    let mut body = implicit(0x0008, 0x0060, b"MR");
    body.extend(implicit(0x0028, 0x0103, &1u16.to_le_bytes()));
    body.extend(implicit(0x0028, 0x0106, &0xFFFFu16.to_le_bytes()));
    let dataset = decode(&part10(transfer_syntax::IMPLICIT_VR_LITTLE_ENDIAN, &body)).unwrap();

    let element = dataset.get(SmallestImagePixelValue).unwrap();
    assert_eq!(element.vr, SS);
    assert_eq!(element.value, DicomValue::int(-1));
  }
}
