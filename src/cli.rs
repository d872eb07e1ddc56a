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

//! Helpers shared by the command line tools.

use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use crate::config::Config;
use crate::error::{DicomError, ErrorKind};

/// `-v` raises the configured level to debug, `-vv` to trace.
pub fn effective_level(configured: LevelFilter, verbose: u8) -> LevelFilter {
  match verbose {
    0 => configured,
    1 => configured.max(LevelFilter::Debug),
    _ => LevelFilter::Trace,
  }
}

pub fn init_logger(level: LevelFilter) -> Result<(), DicomError> {
  TermLogger::init(level, simplelog::Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
    .map_err(|e| DicomError::with_kind(ErrorKind::Config, &format!("cannot set up logging: {}", e)))
}

/// Loads the configuration and sets up logging for a tool.
pub fn setup(config_path: &Option<PathBuf>, verbose: u8) -> Result<Config, DicomError> {
  let (config, provenance) = Config::load(config_path)?;
  init_logger(effective_level(config.log_level()?, verbose))?;
  log::debug!("configuration from {}", provenance);
  Ok(config)
}
