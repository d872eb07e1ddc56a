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

use clap::Parser;

use rdicomweb::cli::setup;
use rdicomweb::dataset::{DataElement, Dataset, DicomValue};
use rdicomweb::dicom_tags::{keyword, DICTIONARY_EDITION};
use rdicomweb::error::DicomError;
use rdicomweb::instance::decode_file;
use rdicomweb::transfer_syntax::get_transfer_syntax_uid_label;
use rdicomweb::value_representation::ValueRepresentation;

/// A dcmdump clone based on rdicomweb
#[derive(Debug, Parser)]
#[command(version)]
struct Opt {
  /// DICOM input file to be dumped
  filepath: PathBuf,
  /// Configuration file
  #[arg(short, long)]
  config: Option<PathBuf>,
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

const MAX_DISPLAY_LENGTH: usize = 66;

//          (group, element, vr,     value,  length, multiplicity, tag_name, level)
type Line = (u16,   u16,     String, String, String, usize,        String,   usize);

fn truncate(mut value: String) -> String {
  if value.len() > MAX_DISPLAY_LENGTH {
    let mut end = MAX_DISPLAY_LENGTH;
    while !value.is_char_boundary(end) {
      end -= 1;
    }
    value.replace_range(end.., "...");
  }
  value
}

fn value_length(vr: ValueRepresentation, value: &DicomValue) -> usize {
  let length = match value {
    DicomValue::Empty | DicomValue::Sequence(_) | DicomValue::Fragments(_) => 0,
    DicomValue::Opaque(bytes) => bytes.len(),
    DicomValue::Single(_) | DicomValue::Multi(_) => match vr.numeric_width() {
      Some(width) => width * value.multiplicity(),
      None => value.scalars().iter().map(|s| s.to_string().len()).sum::<usize>() + value.multiplicity() - 1,
    },
  };
  length + length % 2
}

fn display_value(element: &DataElement) -> String {
  let vr = element.vr;
  match &element.value {
    DicomValue::Empty => "(no value available)".to_string(),
    DicomValue::Opaque(bytes) => truncate(
      bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<String>>().join("\\"),
    ),
    DicomValue::Fragments(fragments) => format!("(PixelSequence #={})", fragments.len()),
    DicomValue::Sequence(items) => format!("(Sequence #={})", items.len()),
    value if vr.is_text() => truncate(format!(
      "[{}]",
      value.scalars().iter().map(|s| s.to_string()).collect::<Vec<String>>().join("\\")
    )),
    value => truncate(value.scalars().iter().map(|s| s.to_string()).collect::<Vec<String>>().join("\\")),
  }
}

fn get_tag_sequence(dataset: &Dataset, level: usize) -> Vec<Line> {
  let mut result: Vec<Line> = vec![];
  for element in dataset {
    let name = keyword(element.tag).unwrap_or("Unknown Tag & Data").to_string();
    let (group, tag_element) = (element.tag.group, element.tag.element);
    match &element.value {
      DicomValue::Sequence(items) => {
        // Encoded lengths and delimiters are not kept once decoded.
        result.push((group, tag_element, element.vr.to_string(), display_value(element), "-".to_string(), items.len(), name, level));
        for item in items {
          result.push((0xFFFE, 0xE000, "na".to_string(), format!("(Item #={})", item.len()), "-".to_string(), 1, "Item".to_string(), level + 1));
          result.append(&mut get_tag_sequence(item, level + 2));
        }
      }
      DicomValue::Fragments(fragments) => {
        result.push((group, tag_element, element.vr.to_string(), display_value(element), "u/l".to_string(), 1, name, level));
        for fragment in fragments {
          result.push((0xFFFE, 0xE000, "pi".to_string(), format!("(fragment of {} bytes)", fragment.len()), format!("{}", fragment.len()), 1, "Item".to_string(), level + 1));
        }
        result.push((0xFFFE, 0xE0DD, "na".to_string(), "(SequenceDelimitationItem)".to_string(), "0".to_string(), 0, "SequenceDelimitationItem".to_string(), level));
      }
      value => {
        result.push((
          group,
          tag_element,
          element.vr.to_string(),
          display_value(element),
          format!("{}", value_length(element.vr, value)),
          value.multiplicity(),
          name,
          level,
        ));
      }
    }
  }
  result
}

fn print(lines: Vec<Line>) {
  for (group, element, vr, value, length, multiplicity, tag_name, level) in lines {
    println!("{}({:04x},{:04x}) {} {: <40} # {: >3},{: >2} {}",
      " ".repeat(level * 2), group, element, vr, value, length, multiplicity, tag_name);
  }
}

fn main() -> Result<(), DicomError> {
  let opt = Opt::parse();
  let config = setup(&opt.config, opt.verbose)?;
  let dataset = decode_file(&opt.filepath, &config.decode_options())?;

  println!();
  println!("# Dicom-File-Format");
  println!("# Data dictionary: PS3.6 {}", DICTIONARY_EDITION);
  if let Some(meta) = dataset.file_meta() {
    println!();
    println!("# Dicom-Meta-Information-Header");
    println!("# Used TransferSyntax: Little Endian Explicit");
    print(get_tag_sequence(meta, 0));
  }

  let transfer_syntax = match dataset.transfer_syntax_uid() {
    Some(uid) => get_transfer_syntax_uid_label(&uid).unwrap_or("Unknown Transfer Syntax").to_string(),
    None => "Unknown (no file meta information)".to_string(),
  };
  println!();
  println!("# Dicom-Data-Set");
  println!("# Used TransferSyntax: {}", transfer_syntax);
  print(get_tag_sequence(&dataset, 0));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use rdicomweb::dicom_tags::{PixelData, ReferencedImageSequence, ReferencedSOPInstanceUID};

  #[test]
  fn sequences_list_items_without_delimiters() {
    let mut item = Dataset::new();
    item.put(ReferencedSOPInstanceUID, ValueRepresentation::UI, DicomValue::text("1.2.3"));
    let mut dataset = Dataset::new();
    dataset
      .put(ReferencedImageSequence, ValueRepresentation::SQ, DicomValue::Sequence(vec![item.clone(), item]))
      .put(PixelData, ValueRepresentation::OB, DicomValue::Fragments(vec![vec![], vec![1, 2]]));

    let lines = get_tag_sequence(&dataset, 0);
    let tags: Vec<(u16, u16, usize)> = lines.iter().map(|line| (line.0, line.1, line.7)).collect();
    assert_eq!(tags, vec![
      (0x0008, 0x1140, 0),
      (0xFFFE, 0xE000, 1),
      (0x0008, 0x1155, 2),
      (0xFFFE, 0xE000, 1),
      (0x0008, 0x1155, 2),
      (0x7FE0, 0x0010, 0),
      (0xFFFE, 0xE000, 1),
      (0xFFFE, 0xE000, 1),
      (0xFFFE, 0xE0DD, 0),
    ]);
    assert_eq!(lines[0].4, "-");
    assert_eq!(lines[0].5, 2);
  }
}
