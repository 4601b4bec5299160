//! Static 3x3 cube topology.
//!
//! This module defines the fixed tables of the puzzle: the 20 movable pieces
//! and the slot each one starts in, and for each of the 6 faces the ordered
//! ring of pieces a turn of that face moves, the axis it rotates around, and
//! the two axes spanning its rotation plane.
//!
//! Spatial frame: W = +Y, Y = -Y, B = +X, G = -X, R = +Z, O = -Z.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Unit, Vector3};
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

/// Number of movable pieces (8 corners + 12 edges).
pub const PIECE_COUNT: usize = 20;
/// Number of pieces moved by a single face turn.
pub const FACE_PIECE_COUNT: usize = 8;
/// Index shift within a face ring produced by one quarter turn.
pub const QUARTER_TURN_SHIFT: usize = 2;

/// Error produced when looking up an identifier that is not in the tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// No piece has this name
    #[error("unknown piece {0:?}")]
    UnknownPiece(String),
    /// No face has this name
    #[error("unknown face {0:?}")]
    UnknownFace(String),
    /// No face is bound to this move letter
    #[error("unknown move {0:?}")]
    UnknownNotation(char),
}

/// One of the three principal axes.
#[derive(EnumIter, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis in a 3D vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Unit<Vector3<f32>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }

    /// Returns the two axes `[a, b]` spanning the plane perpendicular to this
    /// one, ordered so that a point at `a = r sin θ`, `b = r cos θ` moves
    /// along a right-handed rotation about `self` as θ increases.
    pub const fn plane(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Z, Axis::Y],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::Y, Axis::X],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// The 6 faces, named by their center color.
#[derive(EnumIter, EnumCount, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    /// White
    W,
    /// Red
    R,
    /// Blue
    B,
    /// Yellow
    Y,
    /// Orange
    O,
    /// Green
    G,
}

const W_RING: [Piece; FACE_PIECE_COUNT] = {
    use Piece::*;
    [OGW, OW, OBW, BW, RBW, RW, RGW, GW]
};
const R_RING: [Piece; FACE_PIECE_COUNT] = {
    use Piece::*;
    [RGW, RW, RBW, RB, RYB, RY, RYG, RG]
};
const B_RING: [Piece; FACE_PIECE_COUNT] = {
    use Piece::*;
    [OBW, OB, OYB, YB, RYB, RB, RBW, BW]
};
const Y_RING: [Piece; FACE_PIECE_COUNT] = {
    use Piece::*;
    [OYG, OY, OYB, YB, RYB, RY, RYG, YG]
};
const O_RING: [Piece; FACE_PIECE_COUNT] = {
    use Piece::*;
    [OGW, OW, OBW, OB, OYB, OY, OYG, OG]
};
const G_RING: [Piece; FACE_PIECE_COUNT] = {
    use Piece::*;
    [OGW, OG, OYG, YG, RYG, RG, RGW, GW]
};

impl Face {
    /// Index of this face in per-face tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name of this face, as used for its scene object.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns the face whose name is the single color letter `c`.
    pub fn from_letter(c: char) -> Option<Self> {
        Face::iter().find(|face| face.name().starts_with(c))
    }

    /// Ordered ring of pieces moved by a turn of this face, alternating
    /// corner and edge.
    ///
    /// A quarter turn carries the piece at ring index `i + 2` onto the slot
    /// at ring index `i`.
    pub const fn pieces(self) -> &'static [Piece; FACE_PIECE_COUNT] {
        match self {
            Face::W => &W_RING,
            Face::R => &R_RING,
            Face::B => &B_RING,
            Face::Y => &Y_RING,
            Face::O => &O_RING,
            Face::G => &G_RING,
        }
    }

    /// Slots moved by a turn of this face, in ring order.
    pub fn slots(self) -> [Slot; FACE_PIECE_COUNT] {
        (*self.pieces()).map(Piece::slot)
    }

    /// Axis this face turns around.
    pub const fn axis(self) -> Axis {
        match self {
            Face::W | Face::Y => Axis::Y,
            Face::B | Face::G => Axis::X,
            Face::R | Face::O => Axis::Z,
        }
    }

    /// Axes spanning this face's rotation plane. See [`Axis::plane()`].
    pub const fn plane(self) -> [Axis; 2] {
        self.axis().plane()
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            Face::W => Vector3::y(),
            Face::Y => -Vector3::y(),
            Face::B => Vector3::x(),
            Face::G => -Vector3::x(),
            Face::R => Vector3::z(),
            Face::O => -Vector3::z(),
        }
    }

    /// Conventional move letter for a turn of this face.
    pub const fn notation(self) -> char {
        match self {
            Face::W => 'U',
            Face::Y => 'D',
            Face::R => 'F',
            Face::O => 'B',
            Face::B => 'R',
            Face::G => 'L',
        }
    }

    /// Returns the face turned by the move letter `c`.
    pub fn from_notation(c: char) -> Result<Self, TopologyError> {
        Face::iter()
            .find(|face| face.notation() == c)
            .ok_or(TopologyError::UnknownNotation(c))
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Face {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Face::iter()
            .find(|face| face.name() == s)
            .ok_or_else(|| TopologyError::UnknownFace(s.to_owned()))
    }
}

/// The 20 movable pieces, named by the colors they show.
///
/// Discriminants are the index of the slot each piece starts in: 8 top-layer
/// slots, then 4 middle-layer slots, then 8 bottom-layer slots.
#[allow(clippy::upper_case_acronyms)]
#[derive(EnumIter, EnumCount, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    OGW = 0,
    OW,
    OBW,
    BW,
    RBW,
    RW,
    RGW,
    GW,
    OG,
    OB,
    RB,
    RG,
    OYG,
    OY,
    OYB,
    YB,
    RYB,
    RY,
    RYG,
    YG,
}

impl Piece {
    /// Name of this piece, as used for its scene object.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Slot this piece occupies before any turn.
    pub const fn slot(self) -> Slot {
        Slot(self as u8)
    }

    /// Faces this piece shows a sticker on.
    pub fn faces(self) -> impl Iterator<Item = Face> {
        self.name().chars().filter_map(Face::from_letter)
    }

    /// Whether this piece is a corner (three stickers).
    pub fn is_corner(self) -> bool {
        self.faces().count() == 3
    }

    /// Resting position of this piece, with `spacing` scene units between
    /// adjacent slots.
    pub fn rest_position(self, spacing: f32) -> Vector3<f32> {
        self.faces().map(Face::normal).sum::<Vector3<f32>>() * spacing
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Piece {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Piece::iter()
            .find(|piece| piece.name() == s)
            .ok_or_else(|| TopologyError::UnknownPiece(s.to_owned()))
    }
}

/// All pieces, in slot order.
pub const PIECES: [Piece; PIECE_COUNT] = {
    use Piece::*;
    [
        OGW, OW, OBW, BW, RBW, RW, RGW, GW, // top
        OG, OB, RB, RG, // middle
        OYG, OY, OYB, YB, RYB, RY, RYG, YG, // bottom
    ]
};

/// One of the 20 fixed positions a piece can occupy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u8);

impl Slot {
    /// Index of this slot in the occupancy mapping.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Piece that occupies this slot before any turn.
    pub fn home_piece(self) -> Piece {
        PIECES[self.index()]
    }

    /// Iterates over all slots in occupancy order.
    pub fn all() -> impl Iterator<Item = Slot> {
        Piece::iter().map(Piece::slot)
    }
}

/// Returns the occupancy index of the piece named `name`.
pub fn slot_of(name: &str) -> Result<Slot, TopologyError> {
    name.parse::<Piece>().map(Piece::slot)
}
