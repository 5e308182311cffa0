use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::with_session_globals;

newtype_index! {
    pub struct SymbolIndex { .. }
}

/// An interned atom name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(SymbolIndex);

impl Symbol {
    const fn new(n: u32) -> Self {
        Symbol(SymbolIndex::from_u32(n))
    }

    /// Maps a string to its interned representation.
    pub fn intern(string: &str) -> Self {
        with_session_globals(|session_globals| session_globals.symbol_interner.intern(string))
    }

    /// Calls `f` with the underlying string.
    ///
    /// The interner stays borrowed while `f` runs, so `f` must not intern
    /// new symbols.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        with_session_globals(|session_globals| session_globals.symbol_interner.with_str(*self, f))
    }

    pub fn as_u32(self) -> u32 {
        self.0.as_u32()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| fmt::Debug::fmt(s, f))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| fmt::Display::fmt(s, f))
    }
}

#[derive(Default)]
pub(crate) struct Interner(RefCell<InternerInner>);

#[derive(Default)]
struct InternerInner {
    names: HashMap<Rc<str>, Symbol>,
    strings: Vec<Rc<str>>,
}

impl Interner {
    pub fn fresh() -> Self {
        Self {
            ..Default::default()
        }
    }

    #[inline]
    fn intern(&self, string: &str) -> Symbol {
        let mut inner = self.0.borrow_mut();
        if let Some(&name) = inner.names.get(string) {
            return name;
        }

        let name = Symbol::new(inner.strings.len() as u32);
        let string: Rc<str> = Rc::from(string);
        inner.strings.push(Rc::clone(&string));
        inner.names.insert(string, name);
        name
    }

    fn with_str<R>(&self, symbol: Symbol, f: impl FnOnce(&str) -> R) -> R {
        let inner = self.0.borrow();
        f(&inner.strings[symbol.0.as_usize()])
    }
}
