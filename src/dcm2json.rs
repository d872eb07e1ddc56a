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

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use rdicomweb::cli::setup;
use rdicomweb::dicom_representation::{to_dicomweb_json, DicomAttributeJson};
use rdicomweb::error::DicomError;
use rdicomweb::instance::decode_file;
use rdicomweb::metadata::{extract_metadata, NormalizedMetadata};

/// Print DICOM files as DICOMweb JSON
#[derive(Debug, Parser)]
#[command(version)]
struct Opt {
  /// DICOM input files
  #[arg(required = true)]
  filepaths: Vec<PathBuf>,
  /// Print the normalized metadata record instead of the attribute map
  #[arg(short, long)]
  metadata: bool,
  /// Indent the output
  #[arg(short, long)]
  pretty: bool,
  /// Configuration file
  #[arg(short, long)]
  config: Option<PathBuf>,
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn to_string<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, DicomError> {
  Ok(if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? })
}

fn main() -> Result<(), DicomError> {
  let opt = Opt::parse();
  let config = setup(&opt.config, opt.verbose)?;
  let options = config.decode_options();

  let mut attributes: Vec<BTreeMap<String, DicomAttributeJson>> = vec![];
  let mut records: Vec<NormalizedMetadata> = vec![];
  for filepath in &opt.filepaths {
    let dataset = decode_file(filepath, &options)?;
    debug!("{}: {} elements", filepath.display(), dataset.len());
    if opt.metadata {
      records.push(extract_metadata(&dataset));
    } else {
      attributes.push(to_dicomweb_json(&dataset));
    }
  }

  // A single file prints its object, several print an array.
  let output = match (opt.metadata, opt.filepaths.len()) {
    (true, 1) => to_string(&records[0], opt.pretty)?,
    (true, _) => to_string(&records, opt.pretty)?,
    (false, 1) => to_string(&attributes[0], opt.pretty)?,
    (false, _) => to_string(&attributes, opt.pretty)?,
  };
  println!("{}", output);
  Ok(())
}
