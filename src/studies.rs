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

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rdicomweb::cli::setup;
use rdicomweb::error::DicomError;
use rdicomweb::store::{
  instance_summaries, series_metadata, series_summaries, study_metadata, study_summaries, FileSystemStore,
  InstanceStore, StudyFilter,
};

/// Browse the study/series/instance hierarchy of a store
#[derive(Debug, Parser)]
#[command(version)]
struct Opt {
  /// Store root, overrides `storage_path` from the configuration
  #[arg(short, long)]
  storage_path: Option<PathBuf>,
  /// Configuration file
  #[arg(short, long)]
  config: Option<PathBuf>,
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// List the studies, one summary per study
  List {
    /// Patient ID substring
    #[arg(long)]
    patient_id: Option<String>,
    /// Patient name substring, case insensitive
    #[arg(long)]
    patient_name: Option<String>,
    /// Study date (YYYYMMDD)
    #[arg(long)]
    study_date: Option<String>,
  },
  /// List the series of a study
  Series { study_uid: String },
  /// List the instances of a series
  Instances { study_uid: String, series_uid: String },
  /// Print the DICOMweb metadata of a study, or of one of its series
  Metadata { study_uid: String, series_uid: Option<String> },
  /// Delete a study and all its instances
  Delete { study_uid: String },
}

fn main() -> Result<(), DicomError> {
  let opt = Opt::parse();
  let config = setup(&opt.config, opt.verbose)?;
  let store = FileSystemStore::new(opt.storage_path.as_ref().unwrap_or(&config.storage_path));

  let output = match opt.command {
    Command::List { patient_id, patient_name, study_date } => {
      let filter = StudyFilter { patient_id, patient_name, study_date };
      serde_json::to_string_pretty(&study_summaries(&store, &filter)?)?
    }
    Command::Series { study_uid } => serde_json::to_string_pretty(&series_summaries(&store, &study_uid)?)?,
    Command::Instances { study_uid, series_uid } => {
      serde_json::to_string_pretty(&instance_summaries(&store, &study_uid, &series_uid)?)?
    }
    Command::Metadata { study_uid, series_uid: Some(series_uid) } => series_metadata(&store, &study_uid, &series_uid)?,
    Command::Metadata { study_uid, series_uid: None } => study_metadata(&store, &study_uid)?,
    Command::Delete { study_uid } => {
      store.delete_study(&study_uid)?;
      format!("deleted {}", study_uid)
    }
  };
  println!("{}", output);
  Ok(())
}
