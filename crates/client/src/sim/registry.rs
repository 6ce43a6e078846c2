// Cell registry - the one authority on what is currently rendered
use std::collections::HashMap;

use protocol::Coord;

/// Maps each live coordinate to its rendered visual handle.
///
/// Invariant: a coordinate is present here iff its cell is currently shown
/// in the scene. Only the diff engine inserts and removes entries; the
/// controller reaches it through reconciliation and full resets.
#[derive(Debug, Default)]
pub struct CellRegistry<H> {
    cells: HashMap<Coord, H>,
}

impl<H> CellRegistry<H> {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn insert(&mut self, coord: Coord, handle: H) -> Option<H> {
        self.cells.insert(coord, handle)
    }

    pub fn remove(&mut self, coord: Coord) -> Option<H> {
        self.cells.remove(&coord)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.keys().copied()
    }
}
