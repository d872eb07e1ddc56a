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

//! Persistence of instances keyed by their study/series/instance UIDs, plus
//! the listings and metadata responses built on top of it.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::dicom_representation::to_dicomweb_json_array;
use crate::error::{DicomError, ErrorKind};
use crate::instance::{decode_with_options, DecodeOptions};
use crate::metadata::{extract_metadata, InstanceKey, NormalizedMetadata};
use crate::misc::is_valid_uid;

pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 500 * 1024 * 1024;
const INSTANCE_EXTENSION: &str = "dcm";

pub trait InstanceStore {
  /// Stores the bytes verbatim, replacing any previous instance with that key.
  fn put(&self, key: &InstanceKey, bytes: &[u8]) -> Result<(), DicomError>;
  fn get(&self, key: &InstanceKey) -> Result<Vec<u8>, DicomError>;
  fn list_studies(&self) -> Result<BTreeSet<String>, DicomError>;
  /// Fails with `NotFound` for an unknown study.
  fn list_series(&self, study_uid: &str) -> Result<BTreeSet<String>, DicomError>;
  /// Fails with `NotFound` for an unknown series.
  fn list_instances(&self, study_uid: &str, series_uid: &str) -> Result<BTreeSet<String>, DicomError>;
  fn delete_study(&self, study_uid: &str) -> Result<(), DicomError>;
}

fn check_uid(uid: &str) -> Result<(), DicomError> {
  if is_valid_uid(uid) {
    Ok(())
  } else {
    Err(DicomError::invalid_argument(&format!("invalid UID: {:?}", uid)))
  }
}

/// Instances as files under `<root>/<study>/<series>/<sop>.dcm`.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
  root: PathBuf,
}

impl FileSystemStore {
  pub fn new<P: AsRef<Path>>(root: P) -> FileSystemStore {
    FileSystemStore { root: root.as_ref().to_path_buf() }
  }

  fn study_path(&self, study_uid: &str) -> Result<PathBuf, DicomError> {
    check_uid(study_uid)?;
    Ok(self.root.join(study_uid))
  }

  fn series_path(&self, study_uid: &str, series_uid: &str) -> Result<PathBuf, DicomError> {
    check_uid(series_uid)?;
    Ok(self.study_path(study_uid)?.join(series_uid))
  }

  fn instance_path(&self, key: &InstanceKey) -> Result<PathBuf, DicomError> {
    check_uid(&key.sop_uid)?;
    Ok(self
      .series_path(&key.study_uid, &key.series_uid)?
      .join(format!("{}.{}", key.sop_uid, INSTANCE_EXTENSION)))
  }

  fn subdirectories(path: &Path) -> Result<BTreeSet<String>, DicomError> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(path)? {
      let entry = entry?;
      if entry.file_type()?.is_dir() {
        names.insert(entry.file_name().to_string_lossy().to_string());
      }
    }
    Ok(names)
  }
}

impl InstanceStore for FileSystemStore {
  fn put(&self, key: &InstanceKey, bytes: &[u8]) -> Result<(), DicomError> {
    let path = self.instance_path(key)?;
    let series_path = self.series_path(&key.study_uid, &key.series_uid)?;
    fs::create_dir_all(&series_path)?;
    // Written aside then renamed so readers never see a partial file.
    let partial = path.with_extension("part");
    if let Err(e) = fs::write(&partial, bytes).and_then(|_| fs::rename(&partial, &path)) {
      if let Err(cleanup) = fs::remove_file(&partial) {
        debug!("cannot remove {}: {}", partial.display(), cleanup);
      }
      return Err(e.into());
    }
    debug!("stored {} bytes in {}", bytes.len(), path.display());
    Ok(())
  }

  fn get(&self, key: &InstanceKey) -> Result<Vec<u8>, DicomError> {
    let path = self.instance_path(key)?;
    fs::read(&path).map_err(|e| match e.kind() {
      std::io::ErrorKind::NotFound => DicomError::not_found(&format!("instance {}", key)),
      _ => e.into(),
    })
  }

  fn list_studies(&self) -> Result<BTreeSet<String>, DicomError> {
    if !self.root.is_dir() {
      return Ok(BTreeSet::new());
    }
    FileSystemStore::subdirectories(&self.root)
  }

  fn list_series(&self, study_uid: &str) -> Result<BTreeSet<String>, DicomError> {
    let path = self.study_path(study_uid)?;
    if !path.is_dir() {
      return Err(DicomError::not_found(&format!("study {}", study_uid)));
    }
    FileSystemStore::subdirectories(&path)
  }

  fn list_instances(&self, study_uid: &str, series_uid: &str) -> Result<BTreeSet<String>, DicomError> {
    let path = self.series_path(study_uid, series_uid)?;
    if !path.is_dir() {
      return Err(DicomError::not_found(&format!("series {}/{}", study_uid, series_uid)));
    }
    let mut instances = BTreeSet::new();
    for entry in fs::read_dir(&path)? {
      let path = entry?.path();
      if path.is_file() && path.extension().map_or(false, |e| e == INSTANCE_EXTENSION) {
        if let Some(stem) = path.file_stem() {
          instances.insert(stem.to_string_lossy().to_string());
        }
      }
    }
    Ok(instances)
  }

  fn delete_study(&self, study_uid: &str) -> Result<(), DicomError> {
    let path = self.study_path(study_uid)?;
    if !path.is_dir() {
      return Err(DicomError::not_found(&format!("study {}", study_uid)));
    }
    fs::remove_dir_all(&path)?;
    info!("deleted study {}", study_uid);
    Ok(())
  }
}

/// Instances held in memory, shareable across threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
  instances: RwLock<BTreeMap<InstanceKey, Vec<u8>>>,
}

fn poisoned<T>(_: T) -> DicomError {
  DicomError::with_kind(ErrorKind::Io, "memory store lock poisoned")
}

impl MemoryStore {
  pub fn new() -> MemoryStore {
    MemoryStore::default()
  }
}

impl InstanceStore for MemoryStore {
  fn put(&self, key: &InstanceKey, bytes: &[u8]) -> Result<(), DicomError> {
    self.instances.write().map_err(poisoned)?.insert(key.clone(), bytes.to_vec());
    Ok(())
  }

  fn get(&self, key: &InstanceKey) -> Result<Vec<u8>, DicomError> {
    self
      .instances
      .read()
      .map_err(poisoned)?
      .get(key)
      .cloned()
      .ok_or_else(|| DicomError::not_found(&format!("instance {}", key)))
  }

  fn list_studies(&self) -> Result<BTreeSet<String>, DicomError> {
    let instances = self.instances.read().map_err(poisoned)?;
    Ok(instances.keys().map(|k| k.study_uid.clone()).collect())
  }

  fn list_series(&self, study_uid: &str) -> Result<BTreeSet<String>, DicomError> {
    let instances = self.instances.read().map_err(poisoned)?;
    let series: BTreeSet<String> = instances
      .keys()
      .filter(|k| k.study_uid == study_uid)
      .map(|k| k.series_uid.clone())
      .collect();
    if series.is_empty() {
      return Err(DicomError::not_found(&format!("study {}", study_uid)));
    }
    Ok(series)
  }

  fn list_instances(&self, study_uid: &str, series_uid: &str) -> Result<BTreeSet<String>, DicomError> {
    let instances = self.instances.read().map_err(poisoned)?;
    let sops: BTreeSet<String> = instances
      .keys()
      .filter(|k| k.study_uid == study_uid && k.series_uid == series_uid)
      .map(|k| k.sop_uid.clone())
      .collect();
    if sops.is_empty() {
      return Err(DicomError::not_found(&format!("series {}/{}", study_uid, series_uid)));
    }
    Ok(sops)
  }

  fn delete_study(&self, study_uid: &str) -> Result<(), DicomError> {
    let mut instances = self.instances.write().map_err(poisoned)?;
    let before = instances.len();
    instances.retain(|k, _| k.study_uid != study_uid);
    if instances.len() == before {
      return Err(DicomError::not_found(&format!("study {}", study_uid)));
    }
    Ok(())
  }
}

pub fn ingest<S: InstanceStore + ?Sized>(store: &S, bytes: &[u8], max_size: usize) -> Result<InstanceKey, DicomError> {
  ingest_with_options(store, bytes, max_size, &DecodeOptions::default())
}

/// Decodes, derives the instance key and persists the bytes unchanged.
pub fn ingest_with_options<S: InstanceStore + ?Sized>(
  store: &S,
  bytes: &[u8],
  max_size: usize,
  options: &DecodeOptions,
) -> Result<InstanceKey, DicomError> {
  if bytes.len() > max_size {
    return Err(DicomError::invalid_argument(&format!(
      "{} bytes exceed the upload limit of {} bytes", bytes.len(), max_size)));
  }
  let dataset = decode_with_options(bytes, options)?;
  let key = InstanceKey::try_from(&extract_metadata(&dataset))?;
  store.put(&key, bytes)?;
  info!("ingested {} ({} bytes)", key, bytes.len());
  Ok(key)
}

fn load<S: InstanceStore + ?Sized>(store: &S, key: &InstanceKey) -> Result<Dataset, DicomError> {
  decode_with_options(&store.get(key)?, &DecodeOptions::default())
}

fn instance_key(study_uid: &str, series_uid: &str, sop_uid: &str) -> InstanceKey {
  InstanceKey {
    study_uid: study_uid.to_string(),
    series_uid: series_uid.to_string(),
    sop_uid: sop_uid.to_string(),
  }
}

fn series_datasets<S: InstanceStore + ?Sized>(store: &S, study_uid: &str, series_uid: &str) -> Result<Vec<Dataset>, DicomError> {
  store
    .list_instances(study_uid, series_uid)?
    .iter()
    .map(|sop_uid| load(store, &instance_key(study_uid, series_uid, sop_uid)))
    .collect()
}

/// DICOMweb metadata of every instance of a series, as a JSON array.
pub fn series_metadata<S: InstanceStore + ?Sized>(store: &S, study_uid: &str, series_uid: &str) -> Result<String, DicomError> {
  to_dicomweb_json_array(&series_datasets(store, study_uid, series_uid)?)
}

/// DICOMweb metadata of every instance of a study, series after series.
pub fn study_metadata<S: InstanceStore + ?Sized>(store: &S, study_uid: &str) -> Result<String, DicomError> {
  let mut datasets = vec![];
  for series_uid in store.list_series(study_uid)? {
    datasets.extend(series_datasets(store, study_uid, &series_uid)?);
  }
  to_dicomweb_json_array(&datasets)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySummary {
  pub study_instance_uid: String,
  pub patient_name: Option<String>,
  pub patient_id: Option<String>,
  pub study_date: Option<String>,
  pub study_time: Option<String>,
  pub study_description: Option<String>,
  pub accession_number: Option<String>,
  pub modality: Option<String>,
  pub series_count: usize,
  pub instance_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
  pub series_instance_uid: String,
  pub series_description: Option<String>,
  pub series_number: Option<i64>,
  pub modality: Option<String>,
  pub instance_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSummary {
  pub sop_instance_uid: String,
  pub instance_number: Option<i64>,
  pub image_position_patient: Option<Vec<f64>>,
  pub rows: Option<i64>,
  pub columns: Option<i64>,
}

/// Study level criteria: patient id substring, case insensitive patient name
/// substring and exact study date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyFilter {
  pub patient_id: Option<String>,
  pub patient_name: Option<String>,
  pub study_date: Option<String>,
}

impl StudyFilter {
  pub fn matches(&self, study: &StudySummary) -> bool {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    if let Some(patient_id) = &self.patient_id {
      if !field(&study.patient_id).contains(patient_id.as_str()) {
        return false;
      }
    }
    if let Some(patient_name) = &self.patient_name {
      if !field(&study.patient_name).to_lowercase().contains(&patient_name.to_lowercase()) {
        return false;
      }
    }
    if let Some(study_date) = &self.study_date {
      if field(&study.study_date) != *study_date {
        return false;
      }
    }
    true
  }
}

/// Metadata of the first instance of a series that decodes.
fn first_metadata<S: InstanceStore + ?Sized>(
  store: &S,
  study_uid: &str,
  series_uid: &str,
  sop_uids: &BTreeSet<String>,
) -> Option<NormalizedMetadata> {
  for sop_uid in sop_uids {
    match load(store, &instance_key(study_uid, series_uid, sop_uid)) {
      Ok(dataset) => return Some(extract_metadata(&dataset)),
      Err(e) => warn!("skipping {}/{}/{}: {}", study_uid, series_uid, sop_uid, e),
    }
  }
  None
}

fn study_summary<S: InstanceStore + ?Sized>(store: &S, study_uid: &str) -> Result<Option<StudySummary>, DicomError> {
  let series = store.list_series(study_uid)?;
  let mut metadata = None;
  let mut instance_count = 0;
  for series_uid in &series {
    let sop_uids = store.list_instances(study_uid, series_uid)?;
    instance_count += sop_uids.len();
    if metadata.is_none() {
      metadata = first_metadata(store, study_uid, series_uid, &sop_uids);
    }
  }
  Ok(metadata.map(|metadata| StudySummary {
    study_instance_uid: study_uid.to_string(),
    patient_name: metadata.patient_name,
    patient_id: metadata.patient_id,
    study_date: metadata.study_date,
    study_time: metadata.study_time,
    study_description: metadata.study_description,
    accession_number: metadata.accession_number,
    modality: metadata.modality,
    series_count: series.len(),
    instance_count,
  }))
}

/// One summary per study, taken from its first readable instance. Studies
/// without any readable instance are left out.
pub fn study_summaries<S: InstanceStore + ?Sized>(store: &S, filter: &StudyFilter) -> Result<Vec<StudySummary>, DicomError> {
  let mut summaries = vec![];
  for study_uid in store.list_studies()? {
    match study_summary(store, &study_uid)? {
      Some(summary) if filter.matches(&summary) => summaries.push(summary),
      Some(_) => {}
      None => warn!("study {} has no readable instance", study_uid),
    }
  }
  Ok(summaries)
}

/// The series of a study ordered by series number (missing numbers first).
pub fn series_summaries<S: InstanceStore + ?Sized>(store: &S, study_uid: &str) -> Result<Vec<SeriesSummary>, DicomError> {
  let mut summaries = vec![];
  for series_uid in store.list_series(study_uid)? {
    let sop_uids = store.list_instances(study_uid, &series_uid)?;
    if let Some(metadata) = first_metadata(store, study_uid, &series_uid, &sop_uids) {
      summaries.push(SeriesSummary {
        series_instance_uid: series_uid,
        series_description: metadata.series_description,
        series_number: metadata.series_number,
        modality: metadata.modality,
        instance_count: sop_uids.len(),
      });
    }
  }
  summaries.sort_by_key(|s| s.series_number);
  Ok(summaries)
}

/// The instances of a series ordered by instance number.
pub fn instance_summaries<S: InstanceStore + ?Sized>(
  store: &S,
  study_uid: &str,
  series_uid: &str,
) -> Result<Vec<InstanceSummary>, DicomError> {
  let mut summaries = vec![];
  for sop_uid in store.list_instances(study_uid, series_uid)? {
    let metadata = extract_metadata(&load(store, &instance_key(study_uid, series_uid, &sop_uid))?);
    summaries.push(InstanceSummary {
      sop_instance_uid: sop_uid,
      instance_number: metadata.instance_number,
      image_position_patient: metadata.image_position_patient,
      rows: metadata.rows,
      columns: metadata.columns,
    });
  }
  summaries.sort_by_key(|s| s.instance_number);
  Ok(summaries)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::DicomValue;
  use crate::dicom_tags::*;
  use crate::transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN;
  use crate::value_representation::ValueRepresentation;
  use crate::writer::write;

  fn instance(study: &str, series: &str, sop: &str, number: i64) -> Vec<u8> {
    let mut dataset = Dataset::new();
    dataset
      .put(SOPClassUID, ValueRepresentation::UI, DicomValue::text("1.2.840.10008.5.1.4.1.1.2"))
      .put(SOPInstanceUID, ValueRepresentation::UI, DicomValue::text(sop))
      .put(StudyDate, ValueRepresentation::DA, DicomValue::text("20240131"))
      .put(Modality, ValueRepresentation::CS, DicomValue::text("CT"))
      .put(PatientName, ValueRepresentation::PN, DicomValue::text("Doe^Jane"))
      .put(PatientID, ValueRepresentation::LO, DicomValue::text("PAT-001"))
      .put(StudyInstanceUID, ValueRepresentation::UI, DicomValue::text(study))
      .put(SeriesInstanceUID, ValueRepresentation::UI, DicomValue::text(series))
      .put(SeriesNumber, ValueRepresentation::IS, DicomValue::int(number))
      .put(InstanceNumber, ValueRepresentation::IS, DicomValue::int(number));
    write(&dataset, EXPLICIT_VR_LITTLE_ENDIAN).unwrap()
  }

  fn exercise(store: &dyn InstanceStore) {
    let first = instance("1.2.3", "1.2.3.1", "1.2.3.1.1", 2);
    let key = ingest(store, &first, DEFAULT_MAX_UPLOAD_SIZE).unwrap();
    assert_eq!(key, InstanceKey::new("1.2.3", "1.2.3.1", "1.2.3.1.1").unwrap());
    assert_eq!(store.get(&key).unwrap(), first);

    ingest(store, &instance("1.2.3", "1.2.3.1", "1.2.3.1.2", 1), DEFAULT_MAX_UPLOAD_SIZE).unwrap();
    ingest(store, &instance("1.2.3", "1.2.3.2", "1.2.3.2.1", 1), DEFAULT_MAX_UPLOAD_SIZE).unwrap();
    ingest(store, &instance("1.2.4", "1.2.4.1", "1.2.4.1.1", 1), DEFAULT_MAX_UPLOAD_SIZE).unwrap();

    assert_eq!(store.list_studies().unwrap().len(), 2);
    assert_eq!(store.list_series("1.2.3").unwrap().into_iter().collect::<Vec<_>>(), vec!["1.2.3.1", "1.2.3.2"]);
    assert_eq!(store.list_instances("1.2.3", "1.2.3.1").unwrap().len(), 2);
    assert!(store.list_series("9.9").unwrap_err().is_not_found());
    assert!(store.list_instances("1.2.3", "9.9").unwrap_err().is_not_found());
    assert!(store.get(&InstanceKey::new("1.2.3", "1.2.3.1", "9.9").unwrap()).unwrap_err().is_not_found());

    let metadata = series_metadata(store, "1.2.3", "1.2.3.1").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&metadata).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    assert_eq!(parsed[0]["00080018"]["Value"][0], "1.2.3.1.1");
    let study: serde_json::Value = serde_json::from_str(&study_metadata(store, "1.2.3").unwrap()).unwrap();
    assert_eq!(study.as_array().unwrap().len(), 3);

    let summaries = study_summaries(store, &StudyFilter::default()).unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].series_count, 2);
    assert_eq!(summaries[0].instance_count, 3);
    assert_eq!(summaries[0].patient_name.as_deref(), Some("Doe^Jane"));

    let filter = StudyFilter { patient_name: Some("doe".to_string()), study_date: Some("20240131".to_string()), ..StudyFilter::default() };
    assert_eq!(study_summaries(store, &filter).unwrap().len(), 2);
    let filter = StudyFilter { patient_id: Some("PAT-002".to_string()), ..StudyFilter::default() };
    assert!(study_summaries(store, &filter).unwrap().is_empty());

    let series = series_summaries(store, "1.2.3").unwrap();
    assert_eq!(series[0].series_instance_uid, "1.2.3.2");
    let instances = instance_summaries(store, "1.2.3", "1.2.3.1").unwrap();
    assert_eq!(instances[0].sop_instance_uid, "1.2.3.1.2");

    store.delete_study("1.2.4").unwrap();
    assert_eq!(store.list_studies().unwrap().len(), 1);
    assert!(store.delete_study("1.2.4").unwrap_err().is_not_found());
  }

  #[test]
  fn memory_store_contract() {
    exercise(&MemoryStore::new());
  }

  #[test]
  fn file_system_store_contract() {
    let root = tempfile::tempdir().unwrap();
    let store = FileSystemStore::new(root.path());
    exercise(&store);
    assert!(root.path().join("1.2.3/1.2.3.1/1.2.3.1.1.dcm").is_file());
  }

  #[test]
  fn rejects_oversized_and_unidentified_uploads() {
    let store = MemoryStore::new();
    let bytes = instance("1.2.3", "1.2.3.1", "1.2.3.1.1", 1);
    let error = ingest(&store, &bytes, 16).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);

    let mut dataset = Dataset::new();
    dataset.put(StudyInstanceUID, ValueRepresentation::UI, DicomValue::text("1.2.3"));
    let bytes = write(&dataset, EXPLICIT_VR_LITTLE_ENDIAN).unwrap();
    assert_eq!(ingest(&store, &bytes, DEFAULT_MAX_UPLOAD_SIZE).unwrap_err().kind(), ErrorKind::MissingAttribute);
    assert_eq!(ingest(&store, b"garbage", DEFAULT_MAX_UPLOAD_SIZE).unwrap_err().kind(), ErrorKind::Parse);
    assert!(store.list_studies().unwrap().is_empty());
  }

  #[test]
  fn file_system_store_refuses_path_like_uids() {
    let root = tempfile::tempdir().unwrap();
    let store = FileSystemStore::new(root.path());
    let key = InstanceKey {
      study_uid: "..".to_string(),
      series_uid: "1.2".to_string(),
      sop_uid: "1.2.3".to_string(),
    };
    assert_eq!(store.put(&key, b"x").unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert!(store.list_series("../..").is_err());
  }

  #[test]
  fn failed_put_leaves_no_partial_file() {
    let root = tempfile::tempdir().unwrap();
    let store = FileSystemStore::new(root.path());
    let key = InstanceKey::new("1.2.3", "1.2.3.1", "1.2.3.1.1").unwrap();
    let blocking = root.path().join("1.2.3/1.2.3.1/1.2.3.1.1.dcm");
    fs::create_dir_all(&blocking).unwrap();
    fs::write(blocking.join("occupied"), b"x").unwrap();

    assert!(store.put(&key, b"DICM").is_err());
    assert!(!root.path().join("1.2.3/1.2.3.1/1.2.3.1.1.part").exists());
  }
}
