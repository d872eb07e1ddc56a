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

use std::error::Error;
use std::fmt;

/// The broad class of a failure. Callers branch on this, never on `details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed, truncated or unrecognized binary stream.
  Parse,
  /// A recognized transfer syntax whose pixel encoding we do not implement.
  UnsupportedTransferSyntax,
  /// A pixel layout we cannot slice (e.g. bit-packed frames not byte aligned).
  UnsupportedFormat,
  /// Missing pixel data, frame out of range or absent persisted object.
  NotFound,
  /// A mandatory attribute (e.g. one of the identity UIDs) is absent or invalid.
  MissingAttribute,
  InvalidArgument,
  Io,
  Serialization,
  Config,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let label = match self {
      ErrorKind::Parse => "parse error",
      ErrorKind::UnsupportedTransferSyntax => "unsupported transfer syntax",
      ErrorKind::UnsupportedFormat => "unsupported format",
      ErrorKind::NotFound => "not found",
      ErrorKind::MissingAttribute => "missing attribute",
      ErrorKind::InvalidArgument => "invalid argument",
      ErrorKind::Io => "i/o error",
      ErrorKind::Serialization => "serialization error",
      ErrorKind::Config => "configuration error",
    };
    write!(f, "{}", label)
  }
}

#[derive(Debug)]
pub struct DicomError {
  pub kind: ErrorKind,
  pub details: String,
}

impl DicomError {
  /// A parse error. Most failures in this crate come from the decoder.
  pub fn new(msg: &str) -> DicomError {
    DicomError::with_kind(ErrorKind::Parse, msg)
  }

  pub fn with_kind(kind: ErrorKind, msg: &str) -> DicomError {
    DicomError {
      kind,
      details: msg.to_string(),
    }
  }

  pub fn not_found(msg: &str) -> DicomError {
    DicomError::with_kind(ErrorKind::NotFound, msg)
  }

  pub fn unsupported_transfer_syntax(msg: &str) -> DicomError {
    DicomError::with_kind(ErrorKind::UnsupportedTransferSyntax, msg)
  }

  pub fn unsupported_format(msg: &str) -> DicomError {
    DicomError::with_kind(ErrorKind::UnsupportedFormat, msg)
  }

  pub fn missing_attribute(msg: &str) -> DicomError {
    DicomError::with_kind(ErrorKind::MissingAttribute, msg)
  }

  pub fn invalid_argument(msg: &str) -> DicomError {
    DicomError::with_kind(ErrorKind::InvalidArgument, msg)
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn is_not_found(&self) -> bool {
    self.kind == ErrorKind::NotFound
  }
}

impl fmt::Display for DicomError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}: {}", self.kind, self.details)
  }
}

impl Error for DicomError {}

impl From<std::io::Error> for DicomError {
  fn from(err: std::io::Error) -> Self {
    let kind = if err.kind() == std::io::ErrorKind::NotFound {
      ErrorKind::NotFound
    } else {
      ErrorKind::Io
    };
    DicomError::with_kind(kind, &err.to_string())
  }
}

impl From<std::num::ParseIntError> for DicomError {
  fn from(err: std::num::ParseIntError) -> Self {
    DicomError::new(&format!("{}", err))
  }
}

impl From<serde_json::Error> for DicomError {
  fn from(err: serde_json::Error) -> Self {
    DicomError::with_kind(ErrorKind::Serialization, &err.to_string())
  }
}

impl From<serde_yaml::Error> for DicomError {
  fn from(err: serde_yaml::Error) -> Self {
    DicomError::with_kind(ErrorKind::Config, &err.to_string())
  }
}
