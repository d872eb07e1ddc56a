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

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::dicom_tags::TransferSyntaxUID;
use crate::tags::Tag;
use crate::value_representation::ValueRepresentation;

/// A single value of a data element.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
  Text(String),
  Int(i64),
  Float(f64),
  /// DA, DT and TM values, kept as their DICOM string form.
  DateTime(String),
}

impl Scalar {
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Scalar::Int(value) => Some(*value as f64),
      Scalar::Float(value) => Some(*value),
      Scalar::Text(value) | Scalar::DateTime(value) => value.trim().parse::<f64>().ok(),
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Scalar::Int(value) => Some(*value),
      Scalar::Float(value) if value.fract() == 0.0 => Some(*value as i64),
      Scalar::Float(_) => None,
      Scalar::Text(value) | Scalar::DateTime(value) => value.trim().parse::<i64>().ok(),
    }
  }
}

impl fmt::Display for Scalar {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Scalar::Text(value) | Scalar::DateTime(value) => write!(f, "{}", value),
      Scalar::Int(value) => write!(f, "{}", value),
      Scalar::Float(value) => write!(f, "{}", value),
    }
  }
}

impl From<&str> for Scalar {
  fn from(value: &str) -> Self {
    Scalar::Text(value.to_string())
  }
}

impl From<i64> for Scalar {
  fn from(value: i64) -> Self {
    Scalar::Int(value)
  }
}

impl From<f64> for Scalar {
  fn from(value: f64) -> Self {
    Scalar::Float(value)
  }
}

/// Value multiplicity is structural: one scalar is `Single`, several are `Multi`.
#[derive(Debug, Clone, PartialEq)]
pub enum DicomValue {
  Empty,
  Single(Scalar),
  Multi(Vec<Scalar>),
  Sequence(Vec<Dataset>),
  Opaque(Vec<u8>),
  /// Encapsulated pixel data. The first fragment is the basic offset table.
  Fragments(Vec<Vec<u8>>),
}

impl DicomValue {
  pub fn text(value: &str) -> DicomValue {
    DicomValue::Single(Scalar::Text(value.to_string()))
  }

  pub fn int(value: i64) -> DicomValue {
    DicomValue::Single(Scalar::Int(value))
  }

  pub fn float(value: f64) -> DicomValue {
    DicomValue::Single(Scalar::Float(value))
  }

  pub fn floats(values: &[f64]) -> DicomValue {
    DicomValue::Multi(values.iter().map(|v| Scalar::Float(*v)).collect())
  }

  pub fn multiplicity(&self) -> usize {
    match self {
      DicomValue::Empty => 0,
      DicomValue::Single(_) | DicomValue::Opaque(_) | DicomValue::Fragments(_) => 1,
      DicomValue::Multi(values) => values.len(),
      DicomValue::Sequence(items) => items.len(),
    }
  }

  /// The scalars of a `Single` or `Multi` value, in order.
  pub fn scalars(&self) -> &[Scalar] {
    match self {
      DicomValue::Single(value) => std::slice::from_ref(value),
      DicomValue::Multi(values) => values,
      _ => &[],
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataElement {
  pub tag: Tag,
  pub vr: ValueRepresentation,
  pub value: DicomValue,
}

impl DataElement {
  pub fn new(tag: Tag, vr: ValueRepresentation, value: DicomValue) -> DataElement {
    DataElement { tag, vr, value }
  }
}

/// Data elements keyed by tag, iterated in ascending tag order. The file meta
/// group, when read from a file, is kept apart from the main dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
  elements: BTreeMap<Tag, DataElement>,
  file_meta: Option<Box<Dataset>>,
}

impl Dataset {
  pub fn new() -> Dataset {
    Dataset::default()
  }

  /// Inserts an element, replacing and returning any element with the same tag.
  pub fn insert(&mut self, element: DataElement) -> Option<DataElement> {
    self.elements.insert(element.tag, element)
  }

  pub fn put(&mut self, tag: Tag, vr: ValueRepresentation, value: DicomValue) -> &mut Self {
    self.insert(DataElement::new(tag, vr, value));
    self
  }

  pub fn remove(&mut self, tag: Tag) -> Option<DataElement> {
    self.elements.remove(&tag)
  }

  pub fn get(&self, tag: Tag) -> Option<&DataElement> {
    self.elements.get(&tag)
  }

  pub fn contains(&self, tag: Tag) -> bool {
    self.elements.contains_key(&tag)
  }

  pub fn len(&self) -> usize {
    self.elements.len()
  }

  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }

  pub fn iter(&self) -> btree_map::Values<'_, Tag, DataElement> {
    self.elements.values()
  }

  pub fn file_meta(&self) -> Option<&Dataset> {
    self.file_meta.as_deref()
  }

  pub fn set_file_meta(&mut self, file_meta: Option<Dataset>) {
    self.file_meta = file_meta.map(Box::new);
  }

  pub fn transfer_syntax_uid(&self) -> Option<String> {
    self.file_meta()?.get_string(TransferSyntaxUID)
  }

  /// The value as text. Multiple values are joined with a backslash as on
  /// the wire; an empty element yields an empty string.
  pub fn get_string(&self, tag: Tag) -> Option<String> {
    match &self.get(tag)?.value {
      DicomValue::Empty => Some(String::new()),
      DicomValue::Single(value) => Some(value.to_string()),
      DicomValue::Multi(values) => Some(
        values
          .iter()
          .map(|v| v.to_string())
          .collect::<Vec<String>>()
          .join("\\"),
      ),
      _ => None,
    }
  }

  /// A single integer value. Multiple values are a type mismatch.
  pub fn get_int(&self, tag: Tag) -> Option<i64> {
    match &self.get(tag)?.value {
      DicomValue::Single(value) => value.as_i64(),
      _ => None,
    }
  }

  /// A single float value. Multiple values are a type mismatch.
  pub fn get_float(&self, tag: Tag) -> Option<f64> {
    match &self.get(tag)?.value {
      DicomValue::Single(value) => value.as_f64(),
      _ => None,
    }
  }

  /// The first value, whatever the multiplicity.
  pub fn get_first_float(&self, tag: Tag) -> Option<f64> {
    self.get(tag)?.value.scalars().first()?.as_f64()
  }

  /// All values as floats, or nothing if any of them is not numeric.
  pub fn get_floats(&self, tag: Tag) -> Option<Vec<f64>> {
    let scalars = self.get(tag)?.value.scalars();
    if scalars.is_empty() {
      return None;
    }
    scalars.iter().map(|v| v.as_f64()).collect()
  }

  pub fn get_items(&self, tag: Tag) -> Option<&[Dataset]> {
    match &self.get(tag)?.value {
      DicomValue::Sequence(items) => Some(items),
      _ => None,
    }
  }
}

impl<'a> IntoIterator for &'a Dataset {
  type Item = &'a DataElement;
  type IntoIter = btree_map::Values<'a, Tag, DataElement>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
