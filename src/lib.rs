//! Animated quarter turns for a 3x3 cube puzzle.
//!
//! The cube's pieces live in an external scene as named objects. A
//! [`CubeSession`] resolves those objects, animates one face turn at a time
//! by rewriting their positions and rotations frame by frame, and keeps track
//! of which piece occupies which slot.

pub mod clock;
pub mod config;
pub mod cube;
pub mod easing;
pub mod engine;
pub mod scene;


pub use clock::{FrameClock, Tick, Ticker};
pub use config::{ConfigError, CubeConfig};
pub use cube::{Axis, Face, Piece, Slot, TopologyError};
pub use easing::{Curve, Easing};
pub use engine::{CubeSession, Occupancy, TURN, TurnOutcome};
pub use scene::{ObjectId, Scene, SceneGraph};
