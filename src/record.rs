use crate::types::{Frgp, Orientation, ReturnStatus, SegmentationPosition};
use crate::validate::{Deficiencies, Errors};
use std::io::Write;

pub const SEGMENTATION_HEADER: &[&str] = &[
    "name",
    "elapsed",
    "rCode",
    "\"rMessage\"",
    "frgp",
    "tlx",
    "tly",
    "trx",
    "try",
    "blx",
    "bly",
    "brx",
    "bry",
    "sCode",
    "\"sMessage\"",
    "\"errors\"",
    "\"deficiencies\"",
    "correctQuantity",
];

pub const ORIENTATION_HEADER: &[&str] =
    &["name", "elapsed", "rCode", "\"rMessage\"", "orientation"];

const NA: &str = "NA";

/// Make a free-text message safe for a quoted CSV column.
///
/// Works byte by byte: every byte of a multi-byte character becomes its
/// own space.
pub fn sanitize_message(message: &str) -> String {
    if message.is_empty() {
        return "\"\"".to_string();
    }

    let mut sanitized = String::with_capacity(message.len() + 2);
    sanitized.push('"');
    for b in message.bytes() {
        match b {
            b'"' => sanitized.push_str("\\\""),
            b if b.is_ascii_graphic() || b == b' ' => sanitized.push(char::from(b)),
            _ => sanitized.push(' '),
        }
    }
    sanitized.push('"');
    sanitized
}

fn quoted(s: impl std::fmt::Display) -> String {
    format!("\"{}\"", s)
}

/// A position returned by the engine, with its geometry findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionResult {
    pub position: SegmentationPosition,
    pub errors: Errors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regions {
    /// The engine made an attempt; one entry per returned position.
    Attempted {
        regions: Vec<RegionResult>,
        deficiencies: Deficiencies,
        correct_quantity: bool,
    },
    /// The engine declined; one placeholder per expected position.
    Declined { expected: Vec<Frgp> },
}

/// Everything logged for one segmented image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationRecord {
    pub name: String,
    pub elapsed_us: u128,
    pub status: ReturnStatus,
    pub regions: Regions,
}

impl SegmentationRecord {
    pub fn rows(&self) -> Vec<Vec<String>> {
        let prefix = [
            self.name.clone(),
            self.elapsed_us.to_string(),
            self.status.code.code().to_string(),
            sanitize_message(&self.status.message),
        ];

        match &self.regions {
            Regions::Attempted {
                regions,
                deficiencies,
                correct_quantity,
            } => regions
                .iter()
                .map(|r| {
                    let p = &r.position;
                    let mut row = prefix.to_vec();
                    row.push(p.frgp.code().to_string());
                    for c in p.corners() {
                        row.push(c.x.to_string());
                        row.push(c.y.to_string());
                    }
                    row.push(p.result.code.code().to_string());
                    row.push(sanitize_message(&p.result.message));
                    row.push(quoted(r.errors));
                    row.push(quoted(deficiencies));
                    row.push(u8::from(*correct_quantity).to_string());
                    row
                })
                .collect(),
            Regions::Declined { expected } => expected
                .iter()
                .map(|frgp| {
                    let mut row = prefix.to_vec();
                    row.push(frgp.code().to_string());
                    row.extend(std::iter::repeat(NA.to_string()).take(9));
                    row.extend(std::iter::repeat("\"\"".to_string()).take(3));
                    row.push(NA.to_string());
                    row
                })
                .collect(),
        }
    }
}

/// Everything logged for one orientation determination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientationRecord {
    pub name: String,
    pub elapsed_us: u128,
    pub status: ReturnStatus,
    pub orientation: Option<Orientation>,
}

impl OrientationRecord {
    pub fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.elapsed_us.to_string(),
            self.status.code.code().to_string(),
            sanitize_message(&self.status.message),
            self.orientation
                .map(|o| o.code().to_string())
                .unwrap_or_else(|| NA.to_string()),
        ]
    }
}

/// CSV log sink. Fields arrive pre-rendered, so the writer never quotes.
pub struct LogWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> LogWriter<W> {
    pub fn new(writer: W, header: &[&str]) -> Result<Self, csv::Error> {
        let mut inner = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .flexible(false)
            .from_writer(writer);
        inner.write_record(header)?;
        inner.flush()?;
        Ok(Self { inner })
    }

    pub fn write_segmentation(&mut self, record: &SegmentationRecord) -> Result<(), csv::Error> {
        for row in record.rows() {
            self.inner.write_record(&row)?;
        }
        self.inner.flush()?;
        Ok(())
    }

    pub fn write_orientation(&mut self, record: &OrientationRecord) -> Result<(), csv::Error> {
        self.inner.write_record(record.row())?;
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, csv::Error> {
        self.inner
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}
