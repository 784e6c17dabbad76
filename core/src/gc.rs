//! Scope-bounded copying collector.
//!
//! An evaluation hands back nothing but its result, so every pair allocated
//! during it that the result cannot reach is garbage once it returns. The
//! collector takes the heap length recorded before the evaluation (the mark)
//! and keeps only the reachable pairs above it. Pairs below the mark never
//! move.
//!
//! The mark pass gathers reachable young pairs in handle order. The copy pass
//! rebuilds them into a fresh segment, renaming children through a forwarding
//! table; a child always has a smaller handle than its parent, so it is copied
//! first. The heap is cut back to the mark and the segment appended.

use log::debug;
use rustc_hash::FxHashMap;

use crate::heap::{Cell, Heap};
use crate::value::{PairId, Value};

/// Which evaluations are followed by a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GcPolicy {
    /// Once per top-level read-eval-print cycle.
    #[default]
    TopLevel,
    /// After every evaluation of a non-quoted pair, nested ones included.
    EveryEval,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcStats {
    pub collections: usize,
    pub pairs_copied: usize,
    pub pairs_reclaimed: usize,
}

impl Heap {
    /// Collect every pair allocated since `mark` that `root` cannot reach and
    /// return `root`'s new handle. Afterwards the heap holds exactly `mark`
    /// plus the number of young pairs reachable from `root`.
    pub fn compact(&mut self, root: Value, mark: usize, stats: &mut GcStats) -> Value {
        let before = self.cells.len();
        if before <= mark {
            return root;
        }

        let live = self.young_pairs(root, mark);
        let mut forward: FxHashMap<PairId, PairId> =
            FxHashMap::with_capacity_and_hasher(live.len(), Default::default());
        let mut segment = Vec::with_capacity(live.len());

        for old in live {
            let cell = self.cell(old);
            segment.push(Cell {
                car: relocate(cell.car, mark, &forward),
                cdr: relocate(cell.cdr, mark, &forward),
            });
            // Never above `old`, so the slot has a handle.
            forward.insert(old, PairId::from_index(mark + segment.len() - 1));
        }

        let copied = segment.len();
        self.cells.truncate(mark);
        self.cells.extend(segment);

        stats.collections += 1;
        stats.pairs_copied += copied;
        stats.pairs_reclaimed += before - mark - copied;
        debug!(
            "gc: mark={mark} allocated={} kept={copied} reclaimed={}",
            before - mark,
            before - mark - copied
        );

        relocate(root, mark, &forward)
    }
}

fn relocate(value: Value, mark: usize, forward: &FxHashMap<PairId, PairId>) -> Value {
    match value {
        Value::Pair(id) if id.index() >= mark => forward
            .get(&id)
            .copied()
            .map_or(value, Value::Pair),
        _ => value,
    }
}
