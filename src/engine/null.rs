use super::{OrientationOutput, SegmentOutput, SegmentationEngine};
use crate::error::EngineError;
use crate::types::{
    Deficiency, Frgp, Orientation, PositionCode, ReturnCode, ReturnStatus, SegmentationPosition,
    SlapImage, SlapKind, SubmissionIdentification, Supported,
};
use crate::validate::expected_positions;
use tracing::debug;

/// Reference implementation. Returns a 10x10 box at the origin for every
/// expected position and does not determine orientation.
///
/// The flaky variant fails 1% of images outright and, for another 1%,
/// reports one randomly chosen finger as not found and asks for a
/// recapture because of the hand geometry.
#[derive(Default)]
pub struct NullEngine {
    rng: Option<fastrand::Rng>,
}

impl NullEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flaky(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        Self { rng: Some(rng) }
    }
}

fn unit_box(frgp: Frgp) -> SegmentationPosition {
    SegmentationPosition::new(frgp, (0, 0), (10, 0), (0, 10), (10, 10))
}

impl SegmentationEngine for NullEngine {
    fn identification(&self) -> SubmissionIdentification {
        SubmissionIdentification {
            library_identifier: "nullimpl".to_string(),
            version: 0x0001,
            marketing_identifier: "Slap Segmentation Stub Implementation (version 0.0.1)"
                .to_string(),
        }
    }

    fn supported(&self) -> Supported {
        Supported {
            kinds: [
                SlapKind::TwoInch,
                SlapKind::ThreeInch,
                SlapKind::UpperPalm,
                SlapKind::FullPalm,
            ]
            .into_iter()
            .collect(),
            determine_orientation: false,
        }
    }

    fn segment(&mut self, image: &SlapImage) -> Result<SegmentOutput, EngineError> {
        if !self.supported().supports(image.kind) {
            return Ok((ReturnStatus::new(ReturnCode::UnsupportedSlapType), vec![]));
        }
        let Some(orientation) = image.orientation else {
            return Ok((
                ReturnStatus::with_message(ReturnCode::InvalidImageData, "Missing orientation"),
                vec![],
            ));
        };

        let expected = expected_positions(image.kind, orientation);

        if let Some(rng) = self.rng.as_mut() {
            match rng.u8(1..=100) {
                1 => {
                    debug!("Randomly failing image");
                    return Ok((
                        ReturnStatus::with_message(ReturnCode::VendorDefined, "Randomly failing"),
                        vec![],
                    ));
                }
                50 => {
                    let missing = rng.usize(..expected.len());
                    let positions = expected
                        .iter()
                        .enumerate()
                        .map(|(i, &frgp)| {
                            if i == missing {
                                SegmentationPosition::failed(
                                    frgp,
                                    PositionCode::FingerNotFound,
                                    "Randomly not finding finger",
                                )
                            } else {
                                unit_box(frgp)
                            }
                        })
                        .collect();
                    let mut status = ReturnStatus::recapture(
                        ReturnCode::RequestRecaptureWithAttempt,
                        [Deficiency::HandGeometry],
                    );
                    status.message = "Randomly failing".to_string();
                    return Ok((status, positions));
                }
                _ => {}
            }
        }

        Ok((
            ReturnStatus::default(),
            expected.into_iter().map(unit_box).collect(),
        ))
    }

    fn determine_orientation(
        &mut self,
        _image: &SlapImage,
    ) -> Result<OrientationOutput, EngineError> {
        Ok((
            ReturnStatus::new(ReturnCode::NotImplemented),
            Orientation::Right,
        ))
    }
}
