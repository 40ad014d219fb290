//! Cell-based occupancy grid for skirmish matches.

use rustc_hash::FxHashMap;

use crate::core::{Grid, GridPos, UnitId, WorldPos};

/// Square-cell occupancy grid, one unit per cell.
///
/// Units stand at cell centers, so the radius query measures from
/// there. That matches the resolver's falloff measurement as long as
/// the match keeps unit positions snapped to the grid.
#[derive(Clone, Debug)]
pub struct SkirmishGrid {
    cell_size: f32,
    cells: FxHashMap<GridPos, UnitId>,
    units: FxHashMap<UnitId, GridPos>,
}

impl SkirmishGrid {
    /// Create a grid with the given cell edge length.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not positive.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            cell_size,
            cells: FxHashMap::default(),
            units: FxHashMap::default(),
        }
    }

    /// Place a unit on a cell. Fails if the cell is occupied or the
    /// unit is already placed.
    pub fn place(&mut self, unit: UnitId, cell: GridPos) -> bool {
        if self.cells.contains_key(&cell) || self.units.contains_key(&unit) {
            return false;
        }
        self.cells.insert(cell, unit);
        self.units.insert(unit, cell);
        true
    }

    /// Remove a unit, returning the cell it stood on.
    pub fn remove(&mut self, unit: UnitId) -> Option<GridPos> {
        let cell = self.units.remove(&unit)?;
        self.cells.remove(&cell);
        Some(cell)
    }

    /// Move a placed unit to a free cell.
    pub fn move_unit(&mut self, unit: UnitId, to: GridPos) -> bool {
        let Some(&from) = self.units.get(&unit) else {
            return false;
        };
        if from == to {
            return true;
        }
        if self.cells.contains_key(&to) {
            return false;
        }
        self.cells.remove(&from);
        self.cells.insert(to, unit);
        self.units.insert(unit, to);
        true
    }

    /// The cell a unit stands on.
    #[must_use]
    pub fn cell_of(&self, unit: UnitId) -> Option<GridPos> {
        self.units.get(&unit).copied()
    }

    /// The unit standing on a cell.
    #[must_use]
    pub fn unit_at(&self, cell: GridPos) -> Option<UnitId> {
        self.cells.get(&cell).copied()
    }

    /// Whether a cell is free.
    #[must_use]
    pub fn is_free(&self, cell: GridPos) -> bool {
        !self.cells.contains_key(&cell)
    }

    /// Number of placed units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the grid has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Grid for SkirmishGrid {
    fn units_in_radius(&self, center: WorldPos, radius: f32) -> Vec<UnitId> {
        let mut hits: Vec<UnitId> = self
            .units
            .iter()
            .filter(|(_, &cell)| self.grid_to_world(cell).distance(center) <= radius)
            .map(|(&unit, _)| unit)
            .collect();
        // Stable order so resolution replays identically from a seed.
        hits.sort_by_key(|unit| unit.raw());
        hits
    }

    fn world_to_grid(&self, world: WorldPos) -> GridPos {
        GridPos::new(
            (world.x / self.cell_size).floor() as i32,
            (world.y / self.cell_size).floor() as i32,
        )
    }

    fn grid_to_world(&self, grid: GridPos) -> WorldPos {
        WorldPos::new(
            (grid.x as f32 + 0.5) * self.cell_size,
            (grid.y as f32 + 0.5) * self.cell_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_collision() {
        let mut grid = SkirmishGrid::new(1.0);
        assert!(grid.place(UnitId::new(1), GridPos::new(0, 0)));
        assert!(!grid.place(UnitId::new(2), GridPos::new(0, 0)), "cell occupied");
        assert!(!grid.place(UnitId::new(1), GridPos::new(1, 0)), "already placed");
        assert_eq!(grid.unit_at(GridPos::new(0, 0)), Some(UnitId::new(1)));
    }

    #[test]
    fn test_move_unit() {
        let mut grid = SkirmishGrid::new(1.0);
        grid.place(UnitId::new(1), GridPos::new(0, 0));
        grid.place(UnitId::new(2), GridPos::new(1, 0));

        assert!(!grid.move_unit(UnitId::new(1), GridPos::new(1, 0)), "destination occupied");
        assert!(grid.move_unit(UnitId::new(1), GridPos::new(2, 2)));
        assert!(grid.is_free(GridPos::new(0, 0)));
        assert_eq!(grid.cell_of(UnitId::new(1)), Some(GridPos::new(2, 2)));
    }

    #[test]
    fn test_remove() {
        let mut grid = SkirmishGrid::new(1.0);
        grid.place(UnitId::new(1), GridPos::new(3, 3));
        assert_eq!(grid.remove(UnitId::new(1)), Some(GridPos::new(3, 3)));
        assert_eq!(grid.remove(UnitId::new(1)), None);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_coordinate_conversion() {
        let grid = SkirmishGrid::new(2.0);
        assert_eq!(grid.world_to_grid(WorldPos::new(3.5, -0.5)), GridPos::new(1, -1));
        assert_eq!(grid.grid_to_world(GridPos::new(1, -1)), WorldPos::new(3.0, -1.0));

        // Cell centers round-trip.
        let center = grid.grid_to_world(GridPos::new(4, 7));
        assert_eq!(grid.world_to_grid(center), GridPos::new(4, 7));
    }

    #[test]
    fn test_units_in_radius_boundary_inclusive() {
        let mut grid = SkirmishGrid::new(1.0);
        grid.place(UnitId::new(1), GridPos::new(0, 0));
        grid.place(UnitId::new(2), GridPos::new(2, 0));
        grid.place(UnitId::new(3), GridPos::new(5, 0));

        let center = grid.grid_to_world(GridPos::new(0, 0));
        let hits = grid.units_in_radius(center, 2.0);
        assert_eq!(hits, vec![UnitId::new(1), UnitId::new(2)], "unit at exactly 2.0 included");
    }

    #[test]
    fn test_units_in_radius_sorted() {
        let mut grid = SkirmishGrid::new(1.0);
        grid.place(UnitId::new(9), GridPos::new(1, 0));
        grid.place(UnitId::new(2), GridPos::new(0, 1));
        grid.place(UnitId::new(5), GridPos::new(1, 1));

        let hits = grid.units_in_radius(WorldPos::new(1.0, 1.0), 3.0);
        assert_eq!(hits, vec![UnitId::new(2), UnitId::new(5), UnitId::new(9)]);
    }
}
