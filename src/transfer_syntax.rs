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

use crate::error::DicomError;

pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";
pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";

/// How a dataset is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
  pub explicit_vr: bool,
  pub big_endian: bool,
}

impl Encoding {
  pub const IMPLICIT_LE: Encoding = Encoding { explicit_vr: false, big_endian: false };
  pub const EXPLICIT_LE: Encoding = Encoding { explicit_vr: true, big_endian: false };
  pub const EXPLICIT_BE: Encoding = Encoding { explicit_vr: true, big_endian: true };
}

#[derive(Debug, PartialEq)]
pub struct TransferSyntax {
  pub uid: &'static str,
  pub name: &'static str,
  pub encoding: Encoding,
  /// The dataset following the file meta group is deflated.
  pub deflated: bool,
  /// Pixel data is stored as compressed fragments.
  pub encapsulated: bool,
}

impl TransferSyntax {
  const fn native(uid: &'static str, name: &'static str, encoding: Encoding) -> TransferSyntax {
    TransferSyntax { uid, name, encoding, deflated: false, encapsulated: false }
  }

  const fn encapsulated(uid: &'static str, name: &'static str) -> TransferSyntax {
    TransferSyntax { uid, name, encoding: Encoding::EXPLICIT_LE, deflated: false, encapsulated: true }
  }

  /// Whether pixel data can be sliced into frames as is.
  pub fn is_uncompressed(&self) -> bool {
    !self.encapsulated
  }
}

static TRANSFER_SYNTAXES: &[TransferSyntax] = &[
  TransferSyntax::native(IMPLICIT_VR_LITTLE_ENDIAN, "Implicit VR Little Endian: Default Transfer Syntax for DICOM", Encoding::IMPLICIT_LE),
  TransferSyntax::native(EXPLICIT_VR_LITTLE_ENDIAN, "Explicit VR Little Endian", Encoding::EXPLICIT_LE),
  TransferSyntax {
    uid: DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
    name: "Deflated Explicit VR Little Endian",
    encoding: Encoding::EXPLICIT_LE,
    deflated: true,
    encapsulated: false,
  },
  TransferSyntax::native(EXPLICIT_VR_BIG_ENDIAN, "Explicit VR Big Endian", Encoding::EXPLICIT_BE),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.50", "JPEG Baseline (Process 1)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.51", "JPEG Baseline (Processes 2 & 4)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.52", "JPEG Extended (Processes 3 & 5)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.53", "JPEG Spectral Selection, Nonhierarchical (Processes 6 & 8)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.54", "JPEG Spectral Selection, Nonhierarchical (Processes 7 & 9)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.55", "JPEG Full Progression, Nonhierarchical (Processes 10 & 12)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.56", "JPEG Full Progression, Nonhierarchical (Processes 11 & 13)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.57", "JPEG Lossless, Nonhierarchical (Processes 14)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.58", "JPEG Lossless, Nonhierarchical (Processes 15)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.59", "JPEG Extended, Hierarchical (Processes 16 & 18)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.60", "JPEG Extended, Hierarchical (Processes 17 & 19)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.61", "JPEG Spectral Selection, Hierarchical (Processes 20 & 22)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.62", "JPEG Spectral Selection, Hierarchical (Processes 21 & 23)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.63", "JPEG Full Progression, Hierarchical (Processes 24 & 26)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.64", "JPEG Full Progression, Hierarchical (Processes 25 & 27)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.65", "JPEG Lossless, Nonhierarchical (Process 28)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.66", "JPEG Lossless, Nonhierarchical (Process 29)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.70", "JPEG Lossless, Nonhierarchical, First- Order Prediction (Processes 14 [Selection Value 1])"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.80", "JPEG-LS Lossless Image Compression"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.81", "JPEG-LS Lossy (Near- Lossless) Image Compression"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.90", "JPEG 2000 Image Compression (Lossless Only)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.91", "JPEG 2000 Image Compression"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.92", "JPEG 2000 Part 2 Multicomponent Image Compression (Lossless Only)"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.93", "JPEG 2000 Part 2 Multicomponent Image Compression"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.94", "JPIP Referenced"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.95", "JPIP Referenced Deflate"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.100", "MPEG2 Main Profile Main Level"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.102", "MPEG-4 AVC/H.264 High Profile / Level 4.1"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.4.103", "MPEG-4 AVC/H.264 BD-compatible High Profile / Level 4.1"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.5", "RLE Lossless"),
  TransferSyntax::encapsulated("1.2.840.10008.1.2.6.1", "RFC 2557 MIME Encapsulation"),
];

pub fn lookup(transfer_syntax_uid: &str) -> Option<&'static TransferSyntax> {
  TRANSFER_SYNTAXES.iter().find(|ts| ts.uid == transfer_syntax_uid)
}

pub fn get_transfer_syntax_uid_label(transfer_syntax_uid: &str) -> Result<&'static str, DicomError> {
  lookup(transfer_syntax_uid)
    .map(|ts| ts.name)
    .ok_or_else(|| DicomError::new(&format!("Unknown transfer_syntax_uid: {}", transfer_syntax_uid)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn native_syntaxes_are_uncompressed() {
    assert!(lookup(IMPLICIT_VR_LITTLE_ENDIAN).unwrap().is_uncompressed());
    assert!(lookup(EXPLICIT_VR_BIG_ENDIAN).unwrap().encoding.big_endian);
    assert!(lookup(DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN).unwrap().deflated);
    assert!(!lookup("1.2.840.10008.1.2.4.50").unwrap().is_uncompressed());
  }

  #[test]
  fn labels_known_uids_only() {
    assert_eq!(get_transfer_syntax_uid_label("1.2.840.10008.1.2.5").unwrap(), "RLE Lossless");
    assert!(get_transfer_syntax_uid_label("1.2.3.4").is_err());
  }
}
