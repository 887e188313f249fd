use super::Deficiencies;
use crate::error::{SlapResult, SlapSegError};
use crate::types::{Frgp, Orientation, ReturnStatus, SegmentationPosition, SlapKind};
use std::collections::BTreeSet;

/// Positions a perfect segmentation of this kind of image would return.
pub fn expected_positions(kind: SlapKind, orientation: Orientation) -> BTreeSet<Frgp> {
    let positions: &[Frgp] = match (orientation, kind) {
        (Orientation::Thumbs, _) => &[Frgp::LeftThumb, Frgp::RightThumb],
        (Orientation::Right, SlapKind::FullPalm) => &[
            Frgp::RightIndex,
            Frgp::RightMiddle,
            Frgp::RightRing,
            Frgp::RightLittle,
            Frgp::RightFullPalm,
        ],
        (Orientation::Right, _) => &[
            Frgp::RightIndex,
            Frgp::RightMiddle,
            Frgp::RightRing,
            Frgp::RightLittle,
        ],
        (Orientation::Left, SlapKind::FullPalm) => &[
            Frgp::LeftIndex,
            Frgp::LeftMiddle,
            Frgp::LeftRing,
            Frgp::LeftLittle,
            Frgp::LeftFullPalm,
        ],
        (Orientation::Left, _) => &[
            Frgp::LeftIndex,
            Frgp::LeftMiddle,
            Frgp::LeftRing,
            Frgp::LeftLittle,
        ],
    };
    positions.iter().copied().collect()
}

pub fn correct_quantity(kind: SlapKind, orientation: Orientation) -> usize {
    expected_positions(kind, orientation).len()
}

pub fn has_correct_quantity(
    positions: &[SegmentationPosition],
    kind: SlapKind,
    orientation: Orientation,
) -> bool {
    positions.len() == correct_quantity(kind, orientation)
}

pub fn gather_deficiencies(status: &ReturnStatus) -> Deficiencies {
    status.deficiencies.iter().copied().collect()
}

/// Deficiencies must be declared if and only if a recapture is requested.
pub fn check_deficiency_contract(status: &ReturnStatus, image: &str) -> SlapResult<()> {
    let recapture = status.code.is_recapture();
    let declared = !status.deficiencies.is_empty();

    if recapture && !declared {
        return Err(SlapSegError::ContractViolation {
            image: image.to_string(),
            reason: "at least one image deficiency must be set when requesting recapture"
                .to_string(),
        });
    }
    if declared && !recapture {
        return Err(SlapSegError::ContractViolation {
            image: image.to_string(),
            reason: format!(
                "image deficiencies declared without requesting recapture (status {})",
                status.code
            ),
        });
    }
    Ok(())
}
