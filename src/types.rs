use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

/// A pixel coordinate. Origin is the top-left corner of the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Friction ridge generalized position.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Frgp {
    #[default]
    Unknown = 0,
    RightThumb = 1,
    RightIndex = 2,
    RightMiddle = 3,
    RightRing = 4,
    RightLittle = 5,
    LeftThumb = 6,
    LeftIndex = 7,
    LeftMiddle = 8,
    LeftRing = 9,
    LeftLittle = 10,
    RightFullPalm = 21,
    LeftFullPalm = 23,
}

impl Frgp {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Kind of slap capture.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SlapKind {
    /// Tenprint card
    TwoInch = 2,
    /// Identification flats
    ThreeInch = 3,
    UpperPalm = 5,
    FullPalm = 8,
}

impl SlapKind {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Only identification flats must come back axis-aligned.
    pub fn can_be_rotated(self) -> bool {
        self != SlapKind::ThreeInch
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CaptureTechnology {
    #[default]
    Unknown = 0,
    ScannedInkOnPaper = 2,
    OpticalTirBright = 3,
}

impl CaptureTechnology {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Hand orientation being segmented.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Right = 0,
    Left = 1,
    Thumbs = 2,
}

impl Orientation {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Reasons an image cannot be reliably segmented.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumCount,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Deficiency {
    /// Halos, ghost impressions and the like
    Artifacts = 0,
    ImageQuality = 1,
    /// Sideways, upside-down or overly rotated hand
    HandGeometry = 2,
    /// Most of the expected ridge structure is missing
    Incomplete = 3,
}

/// Overall status returned by the engine for one image.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReturnCode {
    #[default]
    Success = 0,
    InvalidImageData = 1,
    RequestRecapture = 2,
    RequestRecaptureWithAttempt = 3,
    UnsupportedResolution = 4,
    UnsupportedSlapType = 5,
    NotImplemented = 6,
    VendorDefined = 7,
}

impl ReturnCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_recapture(self) -> bool {
        matches!(
            self,
            ReturnCode::RequestRecapture | ReturnCode::RequestRecaptureWithAttempt
        )
    }

    /// Statuses that come with positions worth validating.
    pub fn has_attempt(self) -> bool {
        matches!(
            self,
            ReturnCode::Success | ReturnCode::RequestRecaptureWithAttempt
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnStatus {
    pub code: ReturnCode,
    pub deficiencies: BTreeSet<Deficiency>,
    pub message: String,
}

impl ReturnStatus {
    pub fn new(code: ReturnCode) -> Self {
        Self {
            code,
            ..Default::default()
        }
    }

    pub fn with_message(code: ReturnCode, message: impl Into<String>) -> Self {
        Self {
            code,
            deficiencies: BTreeSet::new(),
            message: message.into(),
        }
    }

    pub fn recapture(
        code: ReturnCode,
        deficiencies: impl IntoIterator<Item = Deficiency>,
    ) -> Self {
        Self {
            code,
            deficiencies: deficiencies.into_iter().collect(),
            message: String::new(),
        }
    }
}

/// Per-finger outcome code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionCode {
    #[default]
    Success = 0,
    FingerNotFound = 1,
    FailedToSegment = 2,
    VendorDefined = 3,
}

impl PositionCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionResult {
    pub code: PositionCode,
    pub message: String,
}

impl PositionResult {
    pub fn new(code: PositionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// One finger (or palm) region located by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationPosition {
    pub frgp: Frgp,
    pub tl: Coordinate,
    pub tr: Coordinate,
    pub bl: Coordinate,
    pub br: Coordinate,
    pub result: PositionResult,
}

impl SegmentationPosition {
    pub fn new(
        frgp: Frgp,
        tl: impl Into<Coordinate>,
        tr: impl Into<Coordinate>,
        bl: impl Into<Coordinate>,
        br: impl Into<Coordinate>,
    ) -> Self {
        Self {
            frgp,
            tl: tl.into(),
            tr: tr.into(),
            bl: bl.into(),
            br: br.into(),
            result: PositionResult::default(),
        }
    }

    /// A placeholder for a position the engine could not produce.
    pub fn failed(frgp: Frgp, code: PositionCode, message: impl Into<String>) -> Self {
        Self {
            frgp,
            result: PositionResult::new(code, message),
            ..Default::default()
        }
    }

    pub fn corners(&self) -> [Coordinate; 4] {
        [self.tl, self.tr, self.bl, self.br]
    }
}

/// Image data and metadata handed to the engine.
#[derive(Debug, Clone)]
pub struct SlapImage {
    pub width: u16,
    pub height: u16,
    pub ppi: u16,
    pub kind: SlapKind,
    pub capture_technology: CaptureTechnology,
    /// `None` when the engine is asked to determine the orientation itself.
    pub orientation: Option<Orientation>,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionIdentification {
    pub library_identifier: String,
    pub version: u16,
    pub marketing_identifier: String,
}

impl SubmissionIdentification {
    /// Problems with the identification strings, if any.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.library_identifier.is_empty()
            || !self
                .library_identifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            problems.push(format!(
                "library identifier '{}' is not alphanumeric",
                self.library_identifier
            ));
        }
        if !self
            .marketing_identifier
            .chars()
            .all(|c| c.is_ascii_graphic() || c == ' ')
        {
            problems.push("marketing identifier contains non-printable characters".to_string());
        }
        problems
    }
}

/// Capabilities reported by an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supported {
    pub kinds: BTreeSet<SlapKind>,
    pub determine_orientation: bool,
}

impl Supported {
    pub fn supports(&self, kind: SlapKind) -> bool {
        self.kinds.contains(&kind)
    }
}
