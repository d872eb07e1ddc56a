use std::path::PathBuf;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::config_file::{get_config, ConfigProvenance};
use crate::error::{DicomError, ErrorKind};
use crate::instance::{DecodeOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INFLATED_SIZE};
use crate::store::DEFAULT_MAX_UPLOAD_SIZE;

pub const DEFAULT_CONFIG: &str = include_str!("../config.yaml");

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
  pub storage_path: PathBuf,
  pub max_upload_size: usize,
  pub max_depth: usize,
  pub max_inflated_size: usize,
  pub log_level: String,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      storage_path: PathBuf::from("/tmp/dicom-storage"),
      max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
      max_depth: DEFAULT_MAX_DEPTH,
      max_inflated_size: DEFAULT_MAX_INFLATED_SIZE,
      log_level: "info".to_string(),
    }
  }
}

impl Config {
  pub fn from_yaml(content: &str) -> Result<Config, DicomError> {
    let config: Config = serde_yaml::from_str(content)?;
    config.log_level()?;
    Ok(config)
  }

  /// Loads the configuration from `config_path`, the XDG location or the
  /// embedded default, in that order.
  pub fn load(config_path: &Option<PathBuf>) -> Result<(Config, ConfigProvenance), DicomError> {
    let access = get_config(config_path, DEFAULT_CONFIG)?;
    Ok((Config::from_yaml(&access.content)?, access.provenance))
  }

  pub fn log_level(&self) -> Result<LevelFilter, DicomError> {
    self.log_level.parse::<LevelFilter>().map_err(|_| {
      DicomError::with_kind(ErrorKind::Config, &format!("unknown log level: {}", self.log_level))
    })
  }

  pub fn decode_options(&self) -> DecodeOptions {
    DecodeOptions { max_depth: self.max_depth, max_inflated_size: self.max_inflated_size }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_default_matches_code_defaults() {
    assert_eq!(Config::from_yaml(DEFAULT_CONFIG).unwrap(), Config::default());
  }

  #[test]
  fn missing_keys_take_defaults() {
    let config = Config::from_yaml("storage_path: /srv/dicom\nlog_level: DEBUG\n").unwrap();
    assert_eq!(config.storage_path, PathBuf::from("/srv/dicom"));
    assert_eq!(config.max_depth, 64);
    assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
    assert_eq!(config.decode_options().max_depth, 64);
    assert_eq!(config.decode_options().max_inflated_size, DEFAULT_MAX_INFLATED_SIZE);
  }

  #[test]
  fn rejects_bad_values() {
    assert_eq!(Config::from_yaml("log_level: loud\n").unwrap_err().kind(), ErrorKind::Config);
    assert_eq!(Config::from_yaml("max_depth: deep\n").unwrap_err().kind(), ErrorKind::Config);
  }
}
