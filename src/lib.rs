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

//! DICOM decoding and DICOMweb JSON transcoding.
//!
//! Bytes are decoded into a [`Dataset`], which is then projected into
//! normalized metadata, a DICOMweb JSON attribute map or raw pixel frames.

#[cfg(feature = "tools")]
pub mod cli;
pub mod config;
pub mod config_file;
pub mod dataset;
pub mod dicom_representation;
pub mod dicom_tags;
pub mod error;
pub mod instance;
pub mod metadata;
pub mod misc;
pub mod pixel_data;
pub mod store;
pub mod tags;
pub mod transfer_syntax;
pub mod value_representation;
pub mod writer;

pub use dataset::{DataElement, Dataset, DicomValue, Scalar};
pub use dicom_representation::{to_dicomweb_json, to_dicomweb_json_array, to_dicomweb_json_string};
pub use error::{DicomError, ErrorKind};
pub use instance::{decode, decode_with_options, DecodeOptions};
pub use metadata::{extract_metadata, InstanceKey, NormalizedMetadata};
pub use pixel_data::frame;
pub use tags::Tag;
pub use value_representation::ValueRepresentation;
