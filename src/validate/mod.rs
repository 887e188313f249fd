pub mod contract;
pub mod geometry;

pub use self::contract::{
    check_deficiency_contract, correct_quantity, expected_positions, gather_deficiencies,
    has_correct_quantity,
};
pub use self::geometry::{
    has_irregular_coordinates, is_outside_image, is_rectangular, is_rotated,
    validate_segmentation_position, ANGLE_TOLERANCE_DEGREES,
};

use crate::types::Deficiency;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumIter};

/// Things that can be wrong with a single segmentation position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display, Serialize, Deserialize,
)]
pub enum ErrorCode {
    /// Corners do not respect their names (concave or crossed shape)
    IrregularCoordinates = 0,
    NonRectangularCoordinates = 1,
    /// Rotated where the capture kind forbids it
    Rotated = 2,
    CoordinatesOutsideImage = 3,
}

/// A closed enumeration that can live in a [`FlagSet`].
pub trait Flag: Copy + IntoEnumIterator + EnumCount {
    fn bit(self) -> u8;
}

impl Flag for ErrorCode {
    fn bit(self) -> u8 {
        self as u8
    }
}

impl Flag for Deficiency {
    fn bit(self) -> u8 {
        self as u8
    }
}

/// Fixed-width set of flags. Renders as a bit string with the highest
/// code first, matching the column layout of the segmentation log.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSet<F: Flag> {
    bits: u8,
    _flag: PhantomData<F>,
}

pub type Errors = FlagSet<ErrorCode>;
pub type Deficiencies = FlagSet<Deficiency>;

impl<F: Flag> FlagSet<F> {
    pub fn new() -> Self {
        Self {
            bits: 0,
            _flag: PhantomData,
        }
    }

    pub fn insert(&mut self, flag: F) {
        self.bits |= 1 << flag.bit();
    }

    pub fn contains(&self, flag: F) -> bool {
        self.bits & (1 << flag.bit()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = F> + '_ {
        F::iter().filter(move |f| self.contains(*f))
    }
}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl<F: Flag> fmt::Display for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in (0..F::COUNT).rev() {
            let set = self.bits & (1 << bit) != 0;
            f.write_str(if set { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl<F: Flag + fmt::Debug> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
