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

//! Static data dictionary used to resolve value representations of implicit
//! VR streams. Entries follow DICOM PS3.6 2024b. Where the standard lists
//! several VRs ("US or SS", "OB or OW") the first one is recorded and the
//! decoder refines it from context.

#![allow(non_upper_case_globals)]

use crate::tags::Tag;
use crate::value_representation::ValueRepresentation;
use crate::value_representation::ValueRepresentation::*;

pub const DICTIONARY_EDITION: &str = "2024b";

#[derive(Debug, PartialEq)]
pub struct DictionaryEntry {
  pub tag: Tag,
  pub keyword: &'static str,
  pub vr: ValueRepresentation,
}

macro_rules! dictionary {
  ($(($group:literal, $element:literal, $keyword:ident, $vr:ident)),* $(,)?) => {
    $(pub const $keyword: Tag = Tag::new($group, $element);)*

    /// Sorted by tag, looked up with a binary search.
    pub static DICTIONARY: &[DictionaryEntry] = &[
      $(DictionaryEntry {
        tag: Tag::new($group, $element),
        keyword: stringify!($keyword),
        vr: $vr,
      },)*
    ];
  };
}

dictionary! {
  (0x0002, 0x0000, FileMetaInformationGroupLength, UL),
  (0x0002, 0x0001, FileMetaInformationVersion, OB),
  (0x0002, 0x0002, MediaStorageSOPClassUID, UI),
  (0x0002, 0x0003, MediaStorageSOPInstanceUID, UI),
  (0x0002, 0x0010, TransferSyntaxUID, UI),
  (0x0002, 0x0012, ImplementationClassUID, UI),
  (0x0002, 0x0013, ImplementationVersionName, SH),
  (0x0002, 0x0016, SourceApplicationEntityTitle, AE),
  (0x0002, 0x0017, SendingApplicationEntityTitle, AE),
  (0x0002, 0x0018, ReceivingApplicationEntityTitle, AE),
  (0x0002, 0x0100, PrivateInformationCreatorUID, UI),
  (0x0002, 0x0102, PrivateInformation, OB),
  (0x0008, 0x0005, SpecificCharacterSet, CS),
  (0x0008, 0x0008, ImageType, CS),
  (0x0008, 0x0012, InstanceCreationDate, DA),
  (0x0008, 0x0013, InstanceCreationTime, TM),
  (0x0008, 0x0014, InstanceCreatorUID, UI),
  (0x0008, 0x0016, SOPClassUID, UI),
  (0x0008, 0x0018, SOPInstanceUID, UI),
  (0x0008, 0x0020, StudyDate, DA),
  (0x0008, 0x0021, SeriesDate, DA),
  (0x0008, 0x0022, AcquisitionDate, DA),
  (0x0008, 0x0023, ContentDate, DA),
  (0x0008, 0x002A, AcquisitionDateTime, DT),
  (0x0008, 0x0030, StudyTime, TM),
  (0x0008, 0x0031, SeriesTime, TM),
  (0x0008, 0x0032, AcquisitionTime, TM),
  (0x0008, 0x0033, ContentTime, TM),
  (0x0008, 0x0050, AccessionNumber, SH),
  (0x0008, 0x0052, QueryRetrieveLevel, CS),
  (0x0008, 0x0054, RetrieveAETitle, AE),
  (0x0008, 0x0056, InstanceAvailability, CS),
  (0x0008, 0x0060, Modality, CS),
  (0x0008, 0x0061, ModalitiesInStudy, CS),
  (0x0008, 0x0064, ConversionType, CS),
  (0x0008, 0x0070, Manufacturer, LO),
  (0x0008, 0x0080, InstitutionName, LO),
  (0x0008, 0x0081, InstitutionAddress, ST),
  (0x0008, 0x0090, ReferringPhysicianName, PN),
  (0x0008, 0x0100, CodeValue, SH),
  (0x0008, 0x0102, CodingSchemeDesignator, SH),
  (0x0008, 0x0104, CodeMeaning, LO),
  (0x0008, 0x0201, TimezoneOffsetFromUTC, SH),
  (0x0008, 0x1010, StationName, SH),
  (0x0008, 0x1030, StudyDescription, LO),
  (0x0008, 0x1032, ProcedureCodeSequence, SQ),
  (0x0008, 0x103E, SeriesDescription, LO),
  (0x0008, 0x1040, InstitutionalDepartmentName, LO),
  (0x0008, 0x1048, PhysiciansOfRecord, PN),
  (0x0008, 0x1050, PerformingPhysicianName, PN),
  (0x0008, 0x1060, NameOfPhysiciansReadingStudy, PN),
  (0x0008, 0x1070, OperatorsName, PN),
  (0x0008, 0x1080, AdmittingDiagnosesDescription, LO),
  (0x0008, 0x1090, ManufacturerModelName, LO),
  (0x0008, 0x1110, ReferencedStudySequence, SQ),
  (0x0008, 0x1111, ReferencedPerformedProcedureStepSequence, SQ),
  (0x0008, 0x1115, ReferencedSeriesSequence, SQ),
  (0x0008, 0x1120, ReferencedPatientSequence, SQ),
  (0x0008, 0x1140, ReferencedImageSequence, SQ),
  (0x0008, 0x1150, ReferencedSOPClassUID, UI),
  (0x0008, 0x1155, ReferencedSOPInstanceUID, UI),
  (0x0008, 0x1160, ReferencedFrameNumber, IS),
  (0x0008, 0x1190, RetrieveURL, UR),
  (0x0008, 0x2111, DerivationDescription, ST),
  (0x0008, 0x2112, SourceImageSequence, SQ),
  (0x0010, 0x0010, PatientName, PN),
  (0x0010, 0x0020, PatientID, LO),
  (0x0010, 0x0021, IssuerOfPatientID, LO),
  (0x0010, 0x0030, PatientBirthDate, DA),
  (0x0010, 0x0032, PatientBirthTime, TM),
  (0x0010, 0x0040, PatientSex, CS),
  (0x0010, 0x1000, OtherPatientIDs, LO),
  (0x0010, 0x1001, OtherPatientNames, PN),
  (0x0010, 0x1010, PatientAge, AS),
  (0x0010, 0x1020, PatientSize, DS),
  (0x0010, 0x1030, PatientWeight, DS),
  (0x0010, 0x2160, EthnicGroup, SH),
  (0x0010, 0x21B0, AdditionalPatientHistory, LT),
  (0x0010, 0x4000, PatientComments, LT),
  (0x0018, 0x0010, ContrastBolusAgent, LO),
  (0x0018, 0x0015, BodyPartExamined, CS),
  (0x0018, 0x0020, ScanningSequence, CS),
  (0x0018, 0x0021, SequenceVariant, CS),
  (0x0018, 0x0022, ScanOptions, CS),
  (0x0018, 0x0023, MRAcquisitionType, CS),
  (0x0018, 0x0050, SliceThickness, DS),
  (0x0018, 0x0060, KVP, DS),
  (0x0018, 0x0080, RepetitionTime, DS),
  (0x0018, 0x0081, EchoTime, DS),
  (0x0018, 0x0082, InversionTime, DS),
  (0x0018, 0x0083, NumberOfAverages, DS),
  (0x0018, 0x0084, ImagingFrequency, DS),
  (0x0018, 0x0085, ImagedNucleus, SH),
  (0x0018, 0x0086, EchoNumbers, IS),
  (0x0018, 0x0087, MagneticFieldStrength, DS),
  (0x0018, 0x0088, SpacingBetweenSlices, DS),
  (0x0018, 0x0091, EchoTrainLength, IS),
  (0x0018, 0x0095, PixelBandwidth, DS),
  (0x0018, 0x1000, DeviceSerialNumber, LO),
  (0x0018, 0x1020, SoftwareVersions, LO),
  (0x0018, 0x1030, ProtocolName, LO),
  (0x0018, 0x1100, ReconstructionDiameter, DS),
  (0x0018, 0x1110, DistanceSourceToDetector, DS),
  (0x0018, 0x1111, DistanceSourceToPatient, DS),
  (0x0018, 0x1120, GantryDetectorTilt, DS),
  (0x0018, 0x1130, TableHeight, DS),
  (0x0018, 0x1150, ExposureTime, IS),
  (0x0018, 0x1151, XRayTubeCurrent, IS),
  (0x0018, 0x1152, Exposure, IS),
  (0x0018, 0x1160, FilterType, SH),
  (0x0018, 0x1164, ImagerPixelSpacing, DS),
  (0x0018, 0x1210, ConvolutionKernel, SH),
  (0x0018, 0x1250, ReceiveCoilName, SH),
  (0x0018, 0x1310, AcquisitionMatrix, US),
  (0x0018, 0x1312, InPlanePhaseEncodingDirection, CS),
  (0x0018, 0x1314, FlipAngle, DS),
  (0x0018, 0x5100, PatientPosition, CS),
  (0x0018, 0x5101, ViewPosition, CS),
  (0x0020, 0x000D, StudyInstanceUID, UI),
  (0x0020, 0x000E, SeriesInstanceUID, UI),
  (0x0020, 0x0010, StudyID, SH),
  (0x0020, 0x0011, SeriesNumber, IS),
  (0x0020, 0x0012, AcquisitionNumber, IS),
  (0x0020, 0x0013, InstanceNumber, IS),
  (0x0020, 0x0020, PatientOrientation, CS),
  (0x0020, 0x0032, ImagePositionPatient, DS),
  (0x0020, 0x0037, ImageOrientationPatient, DS),
  (0x0020, 0x0052, FrameOfReferenceUID, UI),
  (0x0020, 0x0060, Laterality, CS),
  (0x0020, 0x0100, TemporalPositionIdentifier, IS),
  (0x0020, 0x0105, NumberOfTemporalPositions, IS),
  (0x0020, 0x1002, ImagesInAcquisition, IS),
  (0x0020, 0x1040, PositionReferenceIndicator, LO),
  (0x0020, 0x1041, SliceLocation, DS),
  (0x0020, 0x1206, NumberOfStudyRelatedSeries, IS),
  (0x0020, 0x1208, NumberOfStudyRelatedInstances, IS),
  (0x0020, 0x1209, NumberOfSeriesRelatedInstances, IS),
  (0x0020, 0x4000, ImageComments, LT),
  (0x0020, 0x9056, StackID, SH),
  (0x0020, 0x9057, InStackPositionNumber, UL),
  (0x0020, 0x9111, FrameContentSequence, SQ),
  (0x0020, 0x9113, PlanePositionSequence, SQ),
  (0x0020, 0x9116, PlaneOrientationSequence, SQ),
  (0x0020, 0x9128, TemporalPositionIndex, UL),
  (0x0020, 0x9157, DimensionIndexValues, UL),
  (0x0028, 0x0002, SamplesPerPixel, US),
  (0x0028, 0x0004, PhotometricInterpretation, CS),
  (0x0028, 0x0006, PlanarConfiguration, US),
  (0x0028, 0x0008, NumberOfFrames, IS),
  (0x0028, 0x0009, FrameIncrementPointer, AT),
  (0x0028, 0x0010, Rows, US),
  (0x0028, 0x0011, Columns, US),
  (0x0028, 0x0030, PixelSpacing, DS),
  (0x0028, 0x0034, PixelAspectRatio, IS),
  (0x0028, 0x0100, BitsAllocated, US),
  (0x0028, 0x0101, BitsStored, US),
  (0x0028, 0x0102, HighBit, US),
  (0x0028, 0x0103, PixelRepresentation, US),
  (0x0028, 0x0106, SmallestImagePixelValue, US),
  (0x0028, 0x0107, LargestImagePixelValue, US),
  (0x0028, 0x0108, SmallestPixelValueInSeries, US),
  (0x0028, 0x0109, LargestPixelValueInSeries, US),
  (0x0028, 0x0120, PixelPaddingValue, US),
  (0x0028, 0x0121, PixelPaddingRangeLimit, US),
  (0x0028, 0x0301, BurnedInAnnotation, CS),
  (0x0028, 0x1040, PixelIntensityRelationship, CS),
  (0x0028, 0x1050, WindowCenter, DS),
  (0x0028, 0x1051, WindowWidth, DS),
  (0x0028, 0x1052, RescaleIntercept, DS),
  (0x0028, 0x1053, RescaleSlope, DS),
  (0x0028, 0x1054, RescaleType, LO),
  (0x0028, 0x1055, WindowCenterWidthExplanation, LO),
  (0x0028, 0x1056, VOILUTFunction, CS),
  (0x0028, 0x1101, RedPaletteColorLookupTableDescriptor, US),
  (0x0028, 0x1102, GreenPaletteColorLookupTableDescriptor, US),
  (0x0028, 0x1103, BluePaletteColorLookupTableDescriptor, US),
  (0x0028, 0x1201, RedPaletteColorLookupTableData, OW),
  (0x0028, 0x1202, GreenPaletteColorLookupTableData, OW),
  (0x0028, 0x1203, BluePaletteColorLookupTableData, OW),
  (0x0028, 0x2110, LossyImageCompression, CS),
  (0x0028, 0x2112, LossyImageCompressionRatio, DS),
  (0x0028, 0x2114, LossyImageCompressionMethod, CS),
  (0x0028, 0x3000, ModalityLUTSequence, SQ),
  (0x0028, 0x3002, LUTDescriptor, US),
  (0x0028, 0x3003, LUTExplanation, LO),
  (0x0028, 0x3004, ModalityLUTType, LO),
  (0x0028, 0x3006, LUTData, OW),
  (0x0028, 0x3010, VOILUTSequence, SQ),
  (0x0028, 0x9110, PixelMeasuresSequence, SQ),
  (0x0028, 0x9132, FrameVOILUTSequence, SQ),
  (0x0028, 0x9145, PixelValueTransformationSequence, SQ),
  (0x0032, 0x1060, RequestedProcedureDescription, LO),
  (0x0040, 0x0244, PerformedProcedureStepStartDate, DA),
  (0x0040, 0x0245, PerformedProcedureStepStartTime, TM),
  (0x0040, 0x0253, PerformedProcedureStepID, SH),
  (0x0040, 0x0254, PerformedProcedureStepDescription, LO),
  (0x0040, 0x0275, RequestAttributesSequence, SQ),
  (0x0040, 0x1001, RequestedProcedureID, SH),
  (0x0054, 0x0016, RadiopharmaceuticalInformationSequence, SQ),
  (0x0054, 0x1001, Units, CS),
  (0x5200, 0x9229, SharedFunctionalGroupsSequence, SQ),
  (0x5200, 0x9230, PerFrameFunctionalGroupsSequence, SQ),
  (0x6000, 0x0010, OverlayRows, US),
  (0x6000, 0x0011, OverlayColumns, US),
  (0x6000, 0x0040, OverlayType, CS),
  (0x6000, 0x0050, OverlayOrigin, SS),
  (0x6000, 0x0100, OverlayBitsAllocated, US),
  (0x6000, 0x0102, OverlayBitPosition, US),
  (0x6000, 0x3000, OverlayData, OW),
  (0x7FE0, 0x0001, ExtendedOffsetTable, OV),
  (0x7FE0, 0x0002, ExtendedOffsetTableLengths, OV),
  (0x7FE0, 0x0008, FloatPixelData, OF),
  (0x7FE0, 0x0009, DoubleFloatPixelData, OD),
  (0x7FE0, 0x0010, PixelData, OW),
  (0xFFFA, 0xFFFA, DigitalSignaturesSequence, SQ),
  (0xFFFC, 0xFFFC, DataSetTrailingPadding, OB),
}

// Sequence delimiters have no VR and are not part of the dictionary.
pub const Item: Tag = Tag::new(0xFFFE, 0xE000);
pub const ItemDelimitationItem: Tag = Tag::new(0xFFFE, 0xE00D);
pub const SequenceDelimitationItem: Tag = Tag::new(0xFFFE, 0xE0DD);

pub fn lookup(tag: Tag) -> Option<&'static DictionaryEntry> {
  let find = |tag: Tag| {
    DICTIONARY
      .binary_search_by(|entry| entry.tag.cmp(&tag))
      .ok()
      .map(|index| &DICTIONARY[index])
  };
  find(tag).or_else(|| {
    // Repeating groups (curves, overlays) are registered under their base group.
    match tag.group & 0xFF00 {
      0x5000 | 0x6000 if tag.group & 0x00FF != 0 => find(Tag::new(tag.group & 0xFF00, tag.element)),
      _ => None,
    }
  })
}

pub fn keyword(tag: Tag) -> Option<&'static str> {
  lookup(tag).map(|entry| entry.keyword)
}

/// The value representation used for `tag` in an implicit VR stream.
pub fn implicit_vr(tag: Tag) -> ValueRepresentation {
  if tag.is_group_length() {
    return UL;
  }
  if tag.is_private() {
    // Private creator elements are LO; everything else is opaque to us.
    return if (0x0010..=0x00FF).contains(&tag.element) { LO } else { UN };
  }
  lookup(tag).map(|entry| entry.vr).unwrap_or(UN)
}

/// Attributes declared "US or SS" whose actual VR follows PixelRepresentation.
pub fn depends_on_pixel_representation(tag: Tag) -> bool {
  matches!(
    tag,
    SmallestImagePixelValue
      | LargestImagePixelValue
      | SmallestPixelValueInSeries
      | LargestPixelValueInSeries
      | PixelPaddingValue
      | PixelPaddingRangeLimit
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_is_sorted_and_unique() {
    for pair in DICTIONARY.windows(2) {
      assert!(pair[0].tag < pair[1].tag, "{} >= {}", pair[0].tag, pair[1].tag);
    }
  }

  #[test]
  fn resolves_known_tags() {
    assert_eq!(implicit_vr(PatientName), PN);
    assert_eq!(implicit_vr(StudyInstanceUID), UI);
    assert_eq!(implicit_vr(Rows), US);
    assert_eq!(implicit_vr(PixelData), OW);
    assert_eq!(keyword(WindowCenter), Some("WindowCenter"));
  }

  #[test]
  fn resolves_special_tags() {
    assert_eq!(implicit_vr(Tag::new(0x0018, 0x0000)), UL);
    assert_eq!(implicit_vr(Tag::new(0x0009, 0x0010)), LO);
    assert_eq!(implicit_vr(Tag::new(0x0009, 0x1001)), UN);
    assert_eq!(implicit_vr(Tag::new(0x6002, 0x3000)), OW);
    assert_eq!(keyword(Tag::new(0x6004, 0x0010)), Some("OverlayRows"));
  }

  #[test]
  fn unknown_tags_are_opaque() {
    assert_eq!(implicit_vr(Tag::new(0x0022, 0x0042)), UN);
    assert_eq!(lookup(Tag::new(0x0022, 0x0042)), None);
  }
}
