//! Pair store
//!
//! A bump-allocated vector of two-slot cells. A pair's handle is its index, so
//! handles grow with allocation order and a pair can only point at pairs
//! older than itself. The collector in [`crate::gc`] relies on both facts.

use crate::error::{LispError, Result};
use crate::value::{PairId, Value};

/// One cons cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub car: Value,
    pub cdr: Value,
}

#[derive(Debug, Default)]
pub struct Heap {
    pub(crate) cells: Vec<Cell>,
    limit: Option<usize>,
    peak: usize,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A heap that refuses to hold more than `limit` pairs at once.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Heap {
            limit,
            ..Self::default()
        }
    }

    /// Allocate a fresh pair.
    pub fn cons(&mut self, car: Value, cdr: Value) -> Result<Value> {
        if let Some(limit) = self.limit {
            if self.cells.len() >= limit {
                return Err(LispError::HeapExhausted { limit });
            }
        }
        let id = PairId::new(self.cells.len()).ok_or(LispError::HeapExhausted {
            limit: self.cells.len(),
        })?;
        self.cells.push(Cell { car, cdr });
        self.peak = self.peak.max(self.cells.len());
        Ok(Value::Pair(id))
    }

    pub fn cell(&self, id: PairId) -> Cell {
        self.cells[id.index()]
    }

    pub fn car(&self, id: PairId) -> Value {
        self.cell(id).car
    }

    pub fn cdr(&self, id: PairId) -> Value {
        self.cell(id).cdr
    }

    /// Current allocation length. Recording it before an evaluation gives the
    /// mark that [`Heap::compact`] later collects down to.
    pub fn mark(&self) -> usize {
        self.cells.len()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highest number of pairs held at once.
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Drop every pair. Only valid when no value handle will be used again.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Build a proper list from `items`.
    pub fn list(&mut self, items: &[Value]) -> Result<Value> {
        items
            .iter()
            .rev()
            .try_fold(Value::Nil, |tail, &item| self.cons(item, tail))
    }

    /// Number of distinct pairs reachable from `root` that are at or above
    /// `mark`.
    pub fn reachable_since(&self, root: Value, mark: usize) -> usize {
        self.young_pairs(root, mark).len()
    }

    /// Every pair reachable from `root` allocated at or after `mark`, sorted
    /// by handle.
    pub(crate) fn young_pairs(&self, root: Value, mark: usize) -> Vec<PairId> {
        let mut seen = vec![false; self.cells.len().saturating_sub(mark)];
        let mut found = Vec::new();
        let mut stack = vec![root];

        while let Some(value) = stack.pop() {
            let Value::Pair(id) = value else { continue };
            if id.index() < mark || seen[id.index() - mark] {
                continue;
            }
            seen[id.index() - mark] = true;
            found.push(id);
            let cell = self.cell(id);
            stack.push(cell.cdr);
            stack.push(cell.car);
        }

        found.sort_unstable();
        found
    }
}
