//! Positions and the grid collaborator trait.
//!
//! The engine works in world-space coordinates. The grid itself
//! (occupancy, pathfinding, line of sight) belongs to the host; the
//! engine only needs radius queries for area effects and the two
//! coordinate conversions.

use serde::{Deserialize, Serialize};

use super::unit::UnitId;

/// A position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    /// Create a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    ///
    /// ```
    /// use dark_protocol::core::WorldPos;
    ///
    /// let a = WorldPos::new(0.0, 0.0);
    /// let b = WorldPos::new(3.0, 4.0);
    /// assert_eq!(a.distance(b), 5.0);
    /// ```
    #[must_use]
    pub fn distance(self, other: WorldPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for WorldPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// A cell coordinate on the combat grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Create a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Grid collaborator.
///
/// Implemented by the host's spatial index. `units_in_radius` is the
/// candidate query for area effects; the resolver re-measures each
/// candidate's exact distance for falloff, so the query may be
/// conservative (cell-center based) as long as it never misses a unit
/// inside the radius.
pub trait Grid {
    /// All units within `radius` of `center`, boundary inclusive.
    fn units_in_radius(&self, center: WorldPos, radius: f32) -> Vec<UnitId>;

    /// Snap a world position to its containing cell.
    fn world_to_grid(&self, world: WorldPos) -> GridPos;

    /// The world-space center of a cell.
    fn grid_to_world(&self, grid: GridPos) -> WorldPos;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let origin = WorldPos::new(0.0, 0.0);
        assert_eq!(origin.distance(WorldPos::new(3.0, 4.0)), 5.0);
        assert_eq!(origin.distance(origin), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = WorldPos::new(1.5, -2.0);
        let b = WorldPos::new(-4.0, 7.25);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn test_grid_pos_equality() {
        assert_eq!(GridPos::new(2, 3), GridPos::new(2, 3));
        assert_ne!(GridPos::new(2, 3), GridPos::new(3, 2));
    }

    #[test]
    fn test_serialization() {
        let pos = WorldPos::new(1.5, 2.5);
        let json = serde_json::to_string(&pos).unwrap();
        let back: WorldPos = serde_json::from_str(&json).unwrap();
        assert_eq!(pos, back);
    }
}
