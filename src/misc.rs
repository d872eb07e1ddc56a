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

pub const PREAMBLE_LENGTH: usize = 128;
pub const MAGIC: &[u8; 4] = b"DICM";

pub fn has_dicom_header(buffer: &[u8]) -> bool {
  buffer.len() >= PREAMBLE_LENGTH + MAGIC.len()
    && &buffer[PREAMBLE_LENGTH..PREAMBLE_LENGTH + MAGIC.len()] == MAGIC
}

/**
 * Check if a file is a DICOM file.
 * Imperfect heuristic: headerless files are not recognized.
 */
pub fn is_dicom_file(file_path: &str) -> bool {
  match std::fs::read(file_path) {
    Ok(buf) => is_dicom(&buf),
    Err(_) => false,
  }
}

pub fn is_dicom(buffer: &[u8]) -> bool {
  has_dicom_header(buffer)
}

/// UIDs are used as path components by the store, so only dotted
/// alphanumerics are accepted (DICOM itself restricts them to digits and dots).
pub fn is_valid_uid(uid: &str) -> bool {
  !uid.is_empty()
    && uid.len() <= 64
    && uid.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
    && !uid.starts_with('.')
}
