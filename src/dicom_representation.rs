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

// https://dicom.nema.org/medical/dicom/current/output/chtml/part18/chapter_F.html

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{DataElement, Dataset, DicomValue, Scalar};
use crate::error::DicomError;
use crate::value_representation::ValueRepresentation;

const PIXEL_DATA_GROUP: u16 = 0x7FE0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum PersonName {
  Alphabetic(String),
}

/// A sequence item: `{"Value": [<attribute map>]}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SequenceItem {
  #[serde(rename = "Value")]
  pub value: Vec<BTreeMap<String, DicomAttributeJson>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ValuePayload {
  String(String),
  // Tried before Numeral so that integers read back as integers.
  Integer(i64),
  Numeral(f64),
  PersonName(PersonName),
  Item(SequenceItem),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DicomAttributeJson {
  pub vr: ValueRepresentation,
  #[serde(rename = "Value")]
  pub value: Vec<ValuePayload>,
}

/// The DICOMweb attribute map of a dataset, keyed by `GGGGEEEE`. Bulk data
/// and the pixel data group are left out. File meta elements are not part of
/// the dataset and never appear.
pub fn to_dicomweb_json(dataset: &Dataset) -> BTreeMap<String, DicomAttributeJson> {
  dataset
    .iter()
    .filter_map(|element| Some((element.tag.to_hex(), to_json_dicom_attribute(element)?)))
    .collect()
}

pub fn to_dicomweb_json_string(dataset: &Dataset) -> Result<String, DicomError> {
  Ok(serde_json::to_string(&to_dicomweb_json(dataset))?)
}

/// A multi-instance metadata response: the attribute maps in order, comma
/// separated and wrapped in `[...]`.
pub fn to_dicomweb_json_array(datasets: &[Dataset]) -> Result<String, DicomError> {
  let instances = datasets
    .iter()
    .map(to_dicomweb_json_string)
    .collect::<Result<Vec<String>, DicomError>>()?;
  Ok(format!("[{}]", instances.join(",")))
}

pub fn to_json_dicom_attribute(element: &DataElement) -> Option<DicomAttributeJson> {
  if element.tag.group == PIXEL_DATA_GROUP {
    return None;
  }
  let value = match (element.vr, &element.value) {
    (_, DicomValue::Sequence(items)) => items
      .iter()
      .map(|item| ValuePayload::Item(SequenceItem { value: vec![to_dicomweb_json(item)] }))
      .collect(),
    (vr, _) if vr.is_opaque() => return None,
    (_, DicomValue::Opaque(_)) | (_, DicomValue::Fragments(_)) => return None,
    (ValueRepresentation::PN, DicomValue::Empty) => {
      vec![ValuePayload::PersonName(PersonName::Alphabetic(String::new()))]
    }
    (ValueRepresentation::PN, value) => value
      .scalars()
      .iter()
      .map(|name| ValuePayload::PersonName(PersonName::Alphabetic(name.to_string())))
      .collect(),
    (_, value) => value.scalars().iter().map(to_value_payload).collect(),
  };
  Some(DicomAttributeJson { vr: element.vr, value })
}

fn to_value_payload(scalar: &Scalar) -> ValuePayload {
  match scalar {
    Scalar::Text(value) | Scalar::DateTime(value) => ValuePayload::String(value.clone()),
    Scalar::Int(value) => ValuePayload::Integer(*value),
    Scalar::Float(value) if value.is_finite() => ValuePayload::Numeral(*value),
    // JSON has no NaN nor infinity
    Scalar::Float(value) => ValuePayload::String(value.to_string()),
  }
}
