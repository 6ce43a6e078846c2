//! Shared protocol crate for the lattice-life client.
//!
//! This crate contains:
//! - Coordinate key encoding/parsing for the 3D lattice
//! - Outbound action and inbound result message definitions
//! - The per-tick cell snapshot type

mod coord;
mod error;
mod message;

pub use coord::Coord;
pub use error::ProtocolError;
pub use message::{CellSnapshot, ClientAction, ServerMessage};

/// A point on the integer lattice, using glam's IVec3.
pub type LatticePoint = glam::IVec3;
