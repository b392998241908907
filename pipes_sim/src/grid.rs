// Dense 3D occupancy grid for pipe growth.
//
// Stored as a flat `Vec<u32>` indexed by `x + z * size_x + y * size_x * size_z`.
// A zero cell is free; a nonzero cell has been claimed by a pipe and records
// either the claiming path's id or its step index, depending on the session
// policy. Cells only ever go from zero to nonzero. The single way back is
// `reset()`, which clears the whole grid.
//
// Unlike a world grid that tolerates stray reads, occupancy queries here are
// a contract: `is_occupied()` and `occupy()` expect in-bounds coordinates and
// panic otherwise. `is_free()` combines both checks and is what the grower
// uses for candidate filtering.
//
// See also: `grower.rs` which is the only writer during growth,
// `session.rs` which owns the grid and decides when to reset it.

use crate::types::CellCoord;

/// Fixed-size occupancy grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipeGrid {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    cells: Vec<u32>,
    size_x: u32,
    size_y: u32,
    size_z: u32,
}

impl PipeGrid {
    /// Create an all-free grid.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        let volume = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            cells: vec![0; volume],
            size_x,
            size_y,
            size_z,
        }
    }

    /// Create an all-free cube.
    pub fn cube(size: u32) -> Self {
        Self::new(size, size, size)
    }

    pub fn dims(&self) -> (u32, u32, u32) {
        (self.size_x, self.size_y, self.size_z)
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.cells.len()
    }

    /// True iff every component lies in `[0, dim)`.
    pub fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    fn index(&self, coord: CellCoord) -> usize {
        assert!(
            self.in_bounds(coord),
            "cell {coord} outside grid {}x{}x{}",
            self.size_x,
            self.size_y,
            self.size_z
        );
        let sx = self.size_x as usize;
        let sz = self.size_z as usize;
        coord.x as usize + coord.z as usize * sx + coord.y as usize * sx * sz
    }

    /// True iff the cell has been claimed. Panics if out of bounds; check
    /// `in_bounds()` first.
    pub fn is_occupied(&self, coord: CellCoord) -> bool {
        self.cells[self.index(coord)] != 0
    }

    /// In bounds and unclaimed.
    pub fn is_free(&self, coord: CellCoord) -> bool {
        self.in_bounds(coord) && !self.is_occupied(coord)
    }

    /// Raw cell value. Out-of-bounds reads return 0.
    pub fn get(&self, coord: CellCoord) -> u32 {
        if self.in_bounds(coord) {
            self.cells[self.index(coord)]
        } else {
            0
        }
    }

    /// Claim a cell. The caller guarantees the cell is in bounds and free and
    /// that `value` is nonzero.
    pub fn occupy(&mut self, coord: CellCoord, value: u32) {
        debug_assert_ne!(value, 0, "occupying {coord} with the free marker");
        let i = self.index(coord);
        debug_assert_eq!(self.cells[i], 0, "cell {coord} already occupied");
        self.cells[i] = value;
    }

    /// Clear every cell. Dimensions are unchanged.
    pub fn reset(&mut self) {
        self.cells.fill(0);
    }

    /// True iff no free cell remains. O(volume); meant to run between
    /// paths, not per step.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != 0)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }
}
