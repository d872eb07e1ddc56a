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

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::info;

use rdicomweb::cli::setup;
use rdicomweb::error::DicomError;
use rdicomweb::instance::decode_file;
use rdicomweb::pixel_data::{frame, frame_count, FrameGeometry};

/// Extract the raw bytes of one frame of an uncompressed DICOM file
#[derive(Debug, Parser)]
#[command(version)]
struct Opt {
  /// DICOM input file
  filepath: PathBuf,
  /// Frame number, starting at 1
  #[arg(short, long, default_value_t = 1)]
  frame: u32,
  /// Output file, standard output when absent
  #[arg(short, long)]
  output: Option<PathBuf>,
  /// Configuration file
  #[arg(short, long)]
  config: Option<PathBuf>,
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn main() -> Result<(), DicomError> {
  let opt = Opt::parse();
  let config = setup(&opt.config, opt.verbose)?;
  let dataset = decode_file(&opt.filepath, &config.decode_options())?;

  if let Ok(geometry) = FrameGeometry::from_dataset(&dataset) {
    info!(
      "{}x{}, {} sample(s) of {} bits, {} frame(s)",
      geometry.columns, geometry.rows, geometry.samples_per_pixel, geometry.bits_allocated, frame_count(&dataset)
    );
  }
  let bytes = frame(&dataset, opt.frame)?;

  let mut writer: Box<dyn Write> = match &opt.output {
    Some(path) => Box::new(BufWriter::new(File::create(path)?)),
    None => Box::new(io::stdout().lock()),
  };
  writer.write_all(&bytes)?;
  writer.flush()?;
  info!("frame {}: {} bytes", opt.frame, bytes.len());
  Ok(())
}
