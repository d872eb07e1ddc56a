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

use std::env;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::error::{DicomError, ErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigProvenance {
  Default,
  XdgPath(String),
  CustomPath(String),
}

impl fmt::Display for ConfigProvenance {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      ConfigProvenance::Default => write!(f, "embedded default"),
      ConfigProvenance::XdgPath(path) | ConfigProvenance::CustomPath(path) => write!(f, "{}", path),
    }
  }
}

#[derive(Debug)]
pub struct ConfigAccess {
  pub content: String,
  pub provenance: ConfigProvenance,
}

fn is_file_not_empty<P: AsRef<Path>>(path: P) -> bool {
  match std::fs::metadata(path) {
    Ok(metadata) => metadata.is_file() && metadata.len() > 0,
    Err(..) => false,
  }
}

/// `$XDG_CONFIG_HOME/<pkg>/config.yaml`, falling back on `$HOME/.config`.
pub fn default_config_path() -> Option<PathBuf> {
  let base = match env::var_os("XDG_CONFIG_HOME") {
    Some(path) if !path.is_empty() => PathBuf::from(path),
    _ => PathBuf::from(env::var_os("HOME")?).join(".config"),
  };
  Some(base.join(env!("CARGO_PKG_NAME")).join("config.yaml"))
}

fn read(path: &Path) -> Result<String, DicomError> {
  std::fs::read_to_string(path)
    .map_err(|e| DicomError::with_kind(ErrorKind::Config, &format!("{}: {}", e, path.display())))
}

// Get the config file from the command line option --config
// Otherwise get it from XDG_CONFIG_HOME
// Otherwise use the default.
pub fn get_config(config_path: &Option<PathBuf>, default_config: &str) -> Result<ConfigAccess, DicomError> {
  if let Some(config_file) = config_path {
    return Ok(ConfigAccess {
      content: read(config_file)?,
      provenance: ConfigProvenance::CustomPath(config_file.to_string_lossy().to_string()),
    });
  }
  if let Some(xdg_file) = default_config_path().filter(|path| is_file_not_empty(path)) {
    return Ok(ConfigAccess {
      content: read(&xdg_file)?,
      provenance: ConfigProvenance::XdgPath(xdg_file.to_string_lossy().to_string()),
    });
  }
  Ok(ConfigAccess {
    content: default_config.to_string(),
    provenance: ConfigProvenance::Default,
  })
}
