use string_interner::{DefaultBackend, StringInterner};

use crate::value::{AtomId, Value};

/// Names interned at startup, in this order, so that `NIL` is the first entry.
const BUILTIN_NAMES: [&str; 11] = [
    "NIL", "T", "QUOTE", "COND", "READ", "PRINT", "ATOM", "CAR", "CDR", "CONS", "EQ",
];

/// Atoms the evaluator recognises by identity.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub nil: AtomId,
    pub t: AtomId,
    pub quote: AtomId,
    pub cond: AtomId,
    pub read: AtomId,
    pub print: AtomId,
    pub atom: AtomId,
    pub car: AtomId,
    pub cdr: AtomId,
    pub cons: AtomId,
    pub eq: AtomId,
}

/// The atom table. Entries are never removed, so an [`AtomId`] stays valid
/// for as long as the table lives.
pub struct SymbolTable {
    interner: StringInterner<DefaultBackend>,
    builtins: Builtins,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut interner = StringInterner::<DefaultBackend>::default();
        let [nil, t, quote, cond, read, print, atom, car, cdr, cons, eq] =
            BUILTIN_NAMES.map(|name| AtomId(interner.get_or_intern(name)));

        SymbolTable {
            interner,
            builtins: Builtins {
                nil,
                t,
                quote,
                cond,
                read,
                print,
                atom,
                car,
                cdr,
                cons,
                eq,
            },
        }
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Intern `name` and return its value. The name `NIL` yields [`Value::Nil`].
    pub fn intern(&mut self, name: &str) -> Value {
        let id = AtomId(self.interner.get_or_intern(name));
        self.atom_value(id)
    }

    /// Look `name` up without interning it.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.interner
            .get(name)
            .map(|sym| self.atom_value(AtomId(sym)))
    }

    /// The name of an atom. Total because ids only come from this table.
    pub fn resolve(&self, id: AtomId) -> &str {
        self.interner.resolve(id.0).unwrap_or_default()
    }

    /// Number of distinct names interned so far, builtins included.
    pub fn len(&self) -> usize {
        self.interner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interner.is_empty()
    }

    fn atom_value(&self, id: AtomId) -> Value {
        if id == self.builtins.nil {
            Value::Nil
        } else {
            Value::Atom(id)
        }
    }
}
