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

use std::fmt;

use crate::error::DicomError;

/// A data element tag. Ordering is (group, element), which is the order
/// elements appear in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
  pub group: u16,
  pub element: u16,
}

impl Tag {
  pub const fn new(group: u16, element: u16) -> Tag {
    Tag { group, element }
  }

  pub fn is_private(&self) -> bool {
    self.group % 2 == 1
  }

  pub fn is_group_length(&self) -> bool {
    self.element == 0x0000
  }

  /// The DICOM JSON key: 8 uppercase hex digits, group then element.
  pub fn to_hex(&self) -> String {
    format!("{:04X}{:04X}", self.group, self.element)
  }
}

impl From<u32> for Tag {
  fn from(value: u32) -> Self {
    Tag::new((value >> 16) as u16, (value & 0xFFFF) as u16)
  }
}

impl From<Tag> for u32 {
  fn from(tag: Tag) -> Self {
    ((tag.group as u32) << 16) | tag.element as u32
  }
}

impl TryFrom<&str> for Tag {
  type Error = DicomError;

  /// Accepts `GGGGEEEE`, `(GGGG,EEEE)` and `GGGG,EEEE`, case insensitive.
  fn try_from(value: &str) -> Result<Self, Self::Error> {
    let hex: String = value
      .chars()
      .filter(|c| !matches!(c, '(' | ')' | ','))
      .collect();
    if hex.len() != 8 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(DicomError::invalid_argument(&format!("not a tag: {}", value)));
    }
    Ok(Tag::from(u32::from_str_radix(&hex, 16)?))
  }
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "({:04x},{:04x})", self.group, self.element)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn orders_by_group_then_element() {
    let mut tags = vec![
      Tag::new(0x0010, 0x0010),
      Tag::new(0x0008, 0x0060),
      Tag::new(0x0008, 0x0016),
      Tag::new(0x7FE0, 0x0010),
    ];
    tags.sort();
    assert_eq!(
      tags,
      vec![
        Tag::new(0x0008, 0x0016),
        Tag::new(0x0008, 0x0060),
        Tag::new(0x0010, 0x0010),
        Tag::new(0x7FE0, 0x0010),
      ]
    );
  }

  #[test]
  fn renders_json_key_in_uppercase() {
    assert_eq!(Tag::new(0x0020, 0x000d).to_hex(), "0020000D");
    assert_eq!(Tag::from(0x7fe00010).to_hex(), "7FE00010");
    assert_eq!(Tag::new(0x0020, 0x000d).to_string(), "(0020,000d)");
  }

  #[test]
  fn parses_textual_forms() {
    assert_eq!(Tag::try_from("0020000D").unwrap(), Tag::new(0x0020, 0x000D));
    assert_eq!(Tag::try_from("(0028,0010)").unwrap(), Tag::new(0x0028, 0x0010));
    assert!(Tag::try_from("PatientName").is_err());
    assert!(Tag::try_from("0020").is_err());
  }

  #[test]
  fn converts_to_and_from_u32() {
    let tag = Tag::from(0x00280008);
    assert_eq!(tag, Tag::new(0x0028, 0x0008));
    assert_eq!(u32::from(tag), 0x00280008);
    assert!(Tag::new(0x0009, 0x0010).is_private());
    assert!(Tag::new(0x0018, 0x0000).is_group_length());
  }
}
