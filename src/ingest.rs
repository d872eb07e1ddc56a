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

use std::fs::metadata;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info, warn};
use walkdir::WalkDir;

use rdicomweb::cli::setup;
use rdicomweb::error::DicomError;
use rdicomweb::misc::is_dicom_file;
use rdicomweb::store::{ingest_with_options, FileSystemStore};

fn path_exists(path: &str) -> Result<PathBuf, String> {
  let path_buf = PathBuf::from(path);
  if path_buf.exists() {
    Ok(path_buf)
  } else {
    Err(format!("{} does not exists", path))
  }
}

/// Store DICOM files in the study/series/instance hierarchy
#[derive(Debug, Parser)]
#[command(version)]
struct Opt {
  /// Files or folders to ingest, folders are walked recursively
  #[arg(required = true, value_parser = path_exists)]
  input_paths: Vec<PathBuf>,
  /// Store root, overrides `storage_path` from the configuration
  #[arg(short, long)]
  storage_path: Option<PathBuf>,
  /// Also try files without the DICM preamble
  #[arg(long)]
  headerless: bool,
  /// Configuration file
  #[arg(short, long)]
  config: Option<PathBuf>,
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn walk(input_path: &Path, f: &mut dyn FnMut(&Path)) -> Result<(), DicomError> {
  for result in WalkDir::new(input_path).sort_by_file_name() {
    let entry = result.map_err(|e| DicomError::with_kind(rdicomweb::ErrorKind::Io, &e.to_string()))?;
    if entry.file_type().is_file() {
      f(entry.path());
    }
  }
  Ok(())
}

fn main() -> Result<(), DicomError> {
  let opt = Opt::parse();
  let config = setup(&opt.config, opt.verbose)?;
  let storage_path = opt.storage_path.clone().unwrap_or_else(|| config.storage_path.clone());
  let store = FileSystemStore::new(&storage_path);
  let options = config.decode_options();

  let (mut ingested, mut failed, mut skipped) = (0usize, 0usize, 0usize);
  for input_path in &opt.input_paths {
    walk(input_path, &mut |filepath: &Path| {
      if !opt.headerless && !is_dicom_file(&filepath.to_string_lossy()) {
        debug!("skipping {}: no DICM preamble", filepath.display());
        skipped += 1;
        return;
      }
      let result = match metadata(filepath) {
        Ok(m) if m.len() as usize > config.max_upload_size => Err(DicomError::invalid_argument(&format!(
          "{} bytes exceed the upload limit of {} bytes", m.len(), config.max_upload_size))),
        _ => std::fs::read(filepath)
          .map_err(DicomError::from)
          .and_then(|bytes| ingest_with_options(&store, &bytes, config.max_upload_size, &options)),
      };
      match result {
        Ok(key) => {
          debug!("{} -> {}", filepath.display(), key);
          ingested += 1;
        }
        Err(e) => {
          warn!("{}: {}", filepath.display(), e);
          failed += 1;
        }
      }
    })?;
  }
  info!("{} ingested, {} failed, {} skipped into {}", ingested, failed, skipped, storage_path.display());
  println!("{} ingested, {} failed, {} skipped", ingested, failed, skipped);
  Ok(())
}
