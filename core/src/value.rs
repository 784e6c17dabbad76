//! Value representation
//!
//! Every Lisp object is one of three things: the empty list `NIL`, an interned
//! atom, or a pair living in the [`Heap`](crate::heap::Heap). Atoms and pairs
//! are opaque handles; the data they name lives in the runtime's stores.

use string_interner::DefaultSymbol;

// ============================================================================
// Handles
// ============================================================================

/// Handle to an interned atom name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomId(pub(crate) DefaultSymbol);

/// Handle to a pair cell. Handles grow with allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(pub(crate) u32);

impl PairId {
    /// Handle for slot `index`, or `None` past the handle range.
    pub(crate) fn new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(PairId)
    }

    /// Handle for a slot no higher than one an existing handle names.
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        PairId(index as u32)
    }

    /// Position of the cell in the pair store.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// Value
// ============================================================================

/// A Lisp value. Equality is identity: two atoms are equal iff they were
/// interned from the same name, two pairs iff they are the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Value {
    #[default]
    Nil,
    Atom(AtomId),
    Pair(PairId),
}

impl Value {
    pub fn is_nil(self) -> bool {
        matches!(self, Value::Nil)
    }

    /// True for `NIL` and atoms, false for pairs.
    pub fn is_atom(self) -> bool {
        !self.is_pair()
    }

    pub fn is_pair(self) -> bool {
        matches!(self, Value::Pair(_))
    }

    pub fn as_pair(self) -> Option<PairId> {
        match self {
            Value::Pair(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_atom(self) -> Option<AtomId> {
        match self {
            Value::Atom(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_is_an_atom() {
        assert!(Value::Nil.is_atom());
        assert!(Value::Nil.is_nil());
        assert!(!Value::Nil.is_pair());
    }

    #[test]
    fn test_pair_is_not_an_atom() {
        let pair = Value::Pair(PairId::from_index(3));
        assert!(pair.is_pair());
        assert!(!pair.is_atom());
        assert_eq!(pair.as_pair().map(PairId::index), Some(3));
    }

    #[test]
    fn test_handle_range() {
        assert_eq!(PairId::new(7).map(PairId::index), Some(7));
        assert_eq!(PairId::new(u32::MAX as usize).map(PairId::index), Some(u32::MAX as usize));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_handle_range_overflow() {
        assert_eq!(PairId::new(u32::MAX as usize + 1), None);
    }

    #[test]
    fn test_pair_handles_order_by_allocation() {
        assert!(PairId::from_index(1) < PairId::from_index(2));
    }
}
