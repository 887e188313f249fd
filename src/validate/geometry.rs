use super::{ErrorCode, Errors};
use crate::types::{Coordinate, PositionCode, SegmentationPosition, SlapKind};

/// Maximum deviation from 90 degrees allowed at each corner of a box
/// in a capture kind that permits rotation. Engines may compute rotated
/// boxes in floating point and round to whole pixels.
pub const ANGLE_TOLERANCE_DEGREES: f64 = 0.3;

/// Validate one position against the geometry rules for `kind`.
/// Positions the engine did not claim to have segmented are not checked.
pub fn validate_segmentation_position(
    position: &SegmentationPosition,
    kind: SlapKind,
    width: u16,
    height: u16,
) -> Errors {
    let mut errors = Errors::new();
    if position.result.code != PositionCode::Success {
        return errors;
    }

    if has_irregular_coordinates(position) {
        errors.insert(ErrorCode::IrregularCoordinates);
    }
    if !is_rectangular(position, kind) {
        errors.insert(ErrorCode::NonRectangularCoordinates);
    }

    if !kind.can_be_rotated() {
        if is_rotated(position) {
            errors.insert(ErrorCode::Rotated);
        }
        if is_outside_image(position, width, height) {
            errors.insert(ErrorCode::CoordinatesOutsideImage);
        }
    }

    errors
}

/// True unless left corners are strictly left of right corners and top
/// corners strictly above bottom corners.
pub fn has_irregular_coordinates(p: &SegmentationPosition) -> bool {
    !((p.tl.x < p.tr.x) && (p.bl.x < p.br.x) && (p.tl.y < p.bl.y) && (p.tr.y < p.br.y))
}

fn squared_len(a: Coordinate, b: Coordinate) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx * dx + dy * dy
}

pub fn is_rectangular(p: &SegmentationPosition, kind: SlapKind) -> bool {
    let top = squared_len(p.tr, p.tl);
    let bottom = squared_len(p.br, p.bl);
    let left = squared_len(p.tl, p.bl);
    let right = squared_len(p.tr, p.br);

    if !kind.can_be_rotated() {
        return top == bottom && left == right;
    }

    let top = (top as f64).sqrt();
    let bottom = (bottom as f64).sqrt();
    let left = (left as f64).sqrt();
    let right = (right as f64).sqrt();

    // Angles of the two triangles on either side of the diagonal
    let t1a1 = bottom.atan2(left).to_degrees();
    let t1a2 = left.atan2(bottom).to_degrees();
    let t2a1 = right.atan2(top).to_degrees();
    let t2a2 = top.atan2(right).to_degrees();

    let corners = [
        t1a1 + t2a1,
        t1a2 + t2a2,
        180.0 - t1a1 - t1a2,
        180.0 - t2a1 - t2a2,
    ];

    corners
        .iter()
        .all(|angle| (90.0 - angle).abs() <= ANGLE_TOLERANCE_DEGREES)
}

/// Any edge that is not axis-aligned. Assumes the box is rectangular.
pub fn is_rotated(p: &SegmentationPosition) -> bool {
    p.tl.x != p.bl.x || p.tr.x != p.br.x || p.tl.y != p.tr.y || p.bl.y != p.br.y
}

pub fn is_outside_image(p: &SegmentationPosition, width: u16, height: u16) -> bool {
    let (width, height) = (i32::from(width), i32::from(height));
    p.corners()
        .iter()
        .any(|c| c.x < 0 || c.y < 0 || c.x >= width || c.y >= height)
}
