//! Canonical lattice coordinate keys.

use std::fmt;
use std::str::FromStr;

use crate::{LatticePoint, ProtocolError};

/// A lattice cell coordinate.
///
/// On the wire a coordinate is the string `"x:y:z"` (three signed base-10
/// integers joined by `:`). Two coordinates are equal iff all three
/// components are equal, which makes this the registry key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord(pub LatticePoint);

impl Coord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(LatticePoint::new(x, y, z))
    }

    #[inline]
    pub const fn x(&self) -> i32 {
        self.0.x
    }

    #[inline]
    pub const fn y(&self) -> i32 {
        self.0.y
    }

    #[inline]
    pub const fn z(&self) -> i32 {
        self.0.z
    }

    #[inline]
    pub const fn point(&self) -> LatticePoint {
        self.0
    }

    /// The canonical key string, e.g. `"-3:0:7"`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.0.x, self.0.y, self.0.z)
    }
}

impl FromStr for Coord {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidCoordinateKey(s.to_string());

        let mut parts = s.split(':');
        let x = parts.next().ok_or_else(invalid)?;
        let y = parts.next().ok_or_else(invalid)?;
        let z = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Coord::new(
            x.parse().map_err(|_| invalid())?,
            y.parse().map_err(|_| invalid())?,
            z.parse().map_err(|_| invalid())?,
        ))
    }
}

impl From<LatticePoint> for Coord {
    fn from(point: LatticePoint) -> Self {
        Self(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        for (x, y, z) in [(0, 0, 0), (-3, 0, 7), (12, -45, 3), (i32::MIN, i32::MAX, -1)] {
            let coord = Coord::new(x, y, z);
            let parsed: Coord = coord.key().parse().unwrap();
            assert_eq!(parsed, coord);
        }
    }

    #[test]
    fn test_negative_encoding() {
        assert_eq!(Coord::new(-3, 0, 7).key(), "-3:0:7");
    }

    #[test]
    fn test_rejects_malformed_keys() {
        for key in ["", "1:2", "1:2:3:4", "a:b:c", "1.5:0:0", "1:2:", ":1:2"] {
            assert_eq!(
                key.parse::<Coord>(),
                Err(ProtocolError::InvalidCoordinateKey(key.to_string())),
                "key {key:?} should be rejected",
            );
        }
    }
}
