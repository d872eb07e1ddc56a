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

use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::dicom_tags::*;
use crate::error::DicomError;
use crate::misc::is_valid_uid;

/// A flat projection of the attributes viewers and listings care about.
/// A missing or malformed source element leaves its field empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetadata {
  pub study_instance_uid: Option<String>,
  pub series_instance_uid: Option<String>,
  pub sop_instance_uid: Option<String>,
  pub sop_class_uid: Option<String>,

  pub patient_name: Option<String>,
  pub patient_id: Option<String>,
  pub patient_birth_date: Option<String>,
  pub patient_sex: Option<String>,

  pub study_date: Option<String>,
  pub study_time: Option<String>,
  pub study_description: Option<String>,
  pub accession_number: Option<String>,

  pub series_date: Option<String>,
  pub series_description: Option<String>,
  pub series_number: Option<i64>,
  pub modality: Option<String>,

  pub instance_number: Option<i64>,

  pub rows: Option<i64>,
  pub columns: Option<i64>,
  pub bits_allocated: Option<i64>,
  pub bits_stored: Option<i64>,
  pub pixel_representation: Option<i64>,
  pub photometric_interpretation: Option<String>,
  pub samples_per_pixel: Option<i64>,

  pub pixel_spacing: Option<Vec<f64>>,
  pub slice_thickness: Option<f64>,
  pub image_position_patient: Option<Vec<f64>>,
  pub image_orientation_patient: Option<Vec<f64>>,

  pub window_center: Option<f64>,
  pub window_width: Option<f64>,
  pub rescale_intercept: f64,
  pub rescale_slope: f64,

  pub transfer_syntax_uid: Option<String>,
  pub number_of_frames: i64,
}

pub fn extract_metadata(dataset: &Dataset) -> NormalizedMetadata {
  NormalizedMetadata {
    study_instance_uid: dataset.get_string(StudyInstanceUID),
    series_instance_uid: dataset.get_string(SeriesInstanceUID),
    sop_instance_uid: dataset.get_string(SOPInstanceUID),
    sop_class_uid: dataset.get_string(SOPClassUID),

    patient_name: dataset.get_string(PatientName),
    patient_id: dataset.get_string(PatientID),
    patient_birth_date: dataset.get_string(PatientBirthDate),
    patient_sex: dataset.get_string(PatientSex),

    study_date: dataset.get_string(StudyDate),
    study_time: dataset.get_string(StudyTime),
    study_description: dataset.get_string(StudyDescription),
    accession_number: dataset.get_string(AccessionNumber),

    series_date: dataset.get_string(SeriesDate),
    series_description: dataset.get_string(SeriesDescription),
    series_number: dataset.get_int(SeriesNumber),
    modality: dataset.get_string(Modality),

    instance_number: dataset.get_int(InstanceNumber),

    rows: dataset.get_int(Rows),
    columns: dataset.get_int(Columns),
    bits_allocated: dataset.get_int(BitsAllocated),
    bits_stored: dataset.get_int(BitsStored),
    pixel_representation: dataset.get_int(PixelRepresentation),
    photometric_interpretation: dataset.get_string(PhotometricInterpretation),
    samples_per_pixel: dataset.get_int(SamplesPerPixel),

    pixel_spacing: dataset.get_floats(PixelSpacing),
    slice_thickness: dataset.get_float(SliceThickness),
    image_position_patient: dataset.get_floats(ImagePositionPatient),
    image_orientation_patient: dataset.get_floats(ImageOrientationPatient),

    window_center: dataset.get_first_float(WindowCenter),
    window_width: dataset.get_first_float(WindowWidth),
    rescale_intercept: dataset.get_float(RescaleIntercept).unwrap_or(0.0),
    rescale_slope: dataset.get_float(RescaleSlope).unwrap_or(1.0),

    transfer_syntax_uid: dataset.transfer_syntax_uid(),
    number_of_frames: dataset.get_int(NumberOfFrames).unwrap_or(1),
  }
}

/// Where an instance lives in the study/series/instance hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceKey {
  pub study_uid: String,
  pub series_uid: String,
  pub sop_uid: String,
}

impl InstanceKey {
  pub fn new(study_uid: &str, series_uid: &str, sop_uid: &str) -> Result<InstanceKey, DicomError> {
    for uid in [study_uid, series_uid, sop_uid] {
      if !is_valid_uid(uid) {
        return Err(DicomError::invalid_argument(&format!("invalid UID: {:?}", uid)));
      }
    }
    Ok(InstanceKey {
      study_uid: study_uid.to_string(),
      series_uid: series_uid.to_string(),
      sop_uid: sop_uid.to_string(),
    })
  }
}

impl TryFrom<&NormalizedMetadata> for InstanceKey {
  type Error = DicomError;

  fn try_from(metadata: &NormalizedMetadata) -> Result<Self, Self::Error> {
    let required = |uid: &Option<String>, keyword: &str| -> Result<String, DicomError> {
      match uid.as_deref() {
        Some(uid) if !uid.is_empty() => Ok(uid.to_string()),
        _ => Err(DicomError::missing_attribute(keyword)),
      }
    };
    let study_uid = required(&metadata.study_instance_uid, "StudyInstanceUID")?;
    let series_uid = required(&metadata.series_instance_uid, "SeriesInstanceUID")?;
    let sop_uid = required(&metadata.sop_instance_uid, "SOPInstanceUID")?;
    InstanceKey::new(&study_uid, &series_uid, &sop_uid)
  }
}

impl fmt::Display for InstanceKey {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}/{}/{}", self.study_uid, self.series_uid, self.sop_uid)
  }
}
