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

// https://dicom.nema.org/medical/dicom/current/output/chtml/part05/sect_6.2.html

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueRepresentation {
  AE, AS, AT, CS, DA, DS, DT, FL, FD, IS, LO, LT, OB, OD, OF, OL, OV, OW, PN,
  SH, SL, SQ, SS, ST, SV, TM, UC, UI, UL, UN, UR, US, UT, UV,
}

impl ValueRepresentation {
  /// Parses the two VR characters of an explicit VR header.
  pub fn from_bytes(bytes: [u8; 2]) -> Option<ValueRepresentation> {
    use ValueRepresentation::*;
    Some(match &bytes {
      b"AE" => AE, b"AS" => AS, b"AT" => AT, b"CS" => CS, b"DA" => DA,
      b"DS" => DS, b"DT" => DT, b"FL" => FL, b"FD" => FD, b"IS" => IS,
      b"LO" => LO, b"LT" => LT, b"OB" => OB, b"OD" => OD, b"OF" => OF,
      b"OL" => OL, b"OV" => OV, b"OW" => OW, b"PN" => PN, b"SH" => SH,
      b"SL" => SL, b"SQ" => SQ, b"SS" => SS, b"ST" => ST, b"SV" => SV,
      b"TM" => TM, b"UC" => UC, b"UI" => UI, b"UL" => UL, b"UN" => UN,
      b"UR" => UR, b"US" => US, b"UT" => UT, b"UV" => UV,
      _ => return None,
    })
  }

  pub fn as_str(&self) -> &'static str {
    (*self).into()
  }

  /// VRs whose explicit header carries 2 reserved bytes and a 4 bytes length.
  /// https://dicom.nema.org/medical/dicom/current/output/chtml/part05/chapter_7.html#sect_7.1.2
  pub fn has_long_length(&self) -> bool {
    use ValueRepresentation::*;
    matches!(self, OB | OD | OF | OL | OV | OW | SQ | SV | UC | UN | UR | UT | UV)
  }

  /// Bulk binary payloads. Their value is never inlined in DICOM JSON.
  pub fn is_opaque(&self) -> bool {
    use ValueRepresentation::*;
    matches!(self, OB | OD | OF | OL | OV | OW | UN)
  }

  pub fn is_text(&self) -> bool {
    use ValueRepresentation::*;
    matches!(
      self,
      AE | AS | CS | DA | DS | DT | IS | LO | LT | PN | SH | ST | TM | UC | UI | UR | UT
    )
  }

  /// Text VRs that hold a single value, the backslash being a regular character.
  pub fn is_single_valued_text(&self) -> bool {
    use ValueRepresentation::*;
    matches!(self, LT | ST | UR | UT)
  }

  /// Width in bytes of one value of a fixed size binary VR.
  pub fn numeric_width(&self) -> Option<usize> {
    use ValueRepresentation::*;
    match self {
      SS | US => Some(2),
      AT | FL | SL | UL => Some(4),
      FD | SV | UV => Some(8),
      _ => None,
    }
  }

  pub fn padding(&self) -> u8 {
    match self {
      ValueRepresentation::UI => 0x00,
      vr if vr.is_text() => b' ',
      _ => 0x00,
    }
  }
}

impl fmt::Display for ValueRepresentation {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl From<ValueRepresentation> for &'static str {
  fn from(value_representation: ValueRepresentation) -> Self {
    match value_representation {
      ValueRepresentation::AE => "AE",
      ValueRepresentation::AS => "AS",
      ValueRepresentation::AT => "AT",
      ValueRepresentation::CS => "CS",
      ValueRepresentation::DA => "DA",
      ValueRepresentation::DS => "DS",
      ValueRepresentation::DT => "DT",
      ValueRepresentation::FL => "FL",
      ValueRepresentation::FD => "FD",
      ValueRepresentation::IS => "IS",
      ValueRepresentation::LO => "LO",
      ValueRepresentation::LT => "LT",
      ValueRepresentation::OB => "OB",
      ValueRepresentation::OD => "OD",
      ValueRepresentation::OF => "OF",
      ValueRepresentation::OL => "OL",
      ValueRepresentation::OV => "OV",
      ValueRepresentation::OW => "OW",
      ValueRepresentation::PN => "PN",
      ValueRepresentation::SH => "SH",
      ValueRepresentation::SL => "SL",
      ValueRepresentation::SQ => "SQ",
      ValueRepresentation::SS => "SS",
      ValueRepresentation::ST => "ST",
      ValueRepresentation::SV => "SV",
      ValueRepresentation::TM => "TM",
      ValueRepresentation::UC => "UC",
      ValueRepresentation::UI => "UI",
      ValueRepresentation::UL => "UL",
      ValueRepresentation::UN => "UN",
      ValueRepresentation::UR => "UR",
      ValueRepresentation::US => "US",
      ValueRepresentation::UT => "UT",
      ValueRepresentation::UV => "UV",
    }
  }
}

// Unknown codes fall back to UN, the DICOM catch-all.
impl<'a> From<&'a str> for ValueRepresentation {
  fn from(s: &'a str) -> Self {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
      return ValueRepresentation::UN;
    }
    ValueRepresentation::from_bytes([bytes[0], bytes[1]]).unwrap_or(ValueRepresentation::UN)
  }
}

#[cfg(test)]
mod tests {
  use super::ValueRepresentation;

  #[test]
  fn parses_header_bytes() {
    assert_eq!(ValueRepresentation::from_bytes(*b"PN"), Some(ValueRepresentation::PN));
    assert_eq!(ValueRepresentation::from_bytes(*b"zz"), None);
    assert_eq!(ValueRepresentation::from("XX"), ValueRepresentation::UN);
    assert_eq!(ValueRepresentation::from("SQ"), ValueRepresentation::SQ);
  }

  #[test]
  fn knows_header_layout() {
    for vr in ["OB", "OW", "OF", "OD", "SQ", "UN", "UT"] {
      assert!(ValueRepresentation::from(vr).has_long_length(), "{}", vr);
    }
    for vr in ["AE", "CS", "DS", "IS", "PN", "UI", "US", "FD"] {
      assert!(!ValueRepresentation::from(vr).has_long_length(), "{}", vr);
    }
  }

  #[test]
  fn serializes_as_its_code() {
    assert_eq!(serde_json::to_string(&ValueRepresentation::PN).unwrap(), "\"PN\"");
    assert_eq!(ValueRepresentation::UI.padding(), 0);
    assert_eq!(ValueRepresentation::LO.padding(), b' ');
    assert_eq!(ValueRepresentation::FD.numeric_width(), Some(8));
  }
}
