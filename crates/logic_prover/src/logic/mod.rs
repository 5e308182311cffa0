use std::{collections::HashMap, fmt};

use crate::symbol::Symbol;

#[cfg(test)]
mod proptest_tests;

newtype_index! {
    /// Handle of a hash-consed formula inside a [`FormulaArena`].
    pub struct FormulaId { .. }
}

/// One node of a propositional formula. Children are arena handles, so two
/// formulas are structurally equal exactly when their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formula {
    Atom(Symbol),
    Not(FormulaId),
    And(FormulaId, FormulaId),
    Or(FormulaId, FormulaId),
    Impl(FormulaId, FormulaId),
}

impl Formula {
    /// The infix operator of a binary node.
    pub fn op(&self) -> Option<char> {
        match self {
            Formula::And(..) => Some('.'),
            Formula::Or(..) => Some('v'),
            Formula::Impl(..) => Some('>'),
            Formula::Atom(_) | Formula::Not(_) => None,
        }
    }

    fn needs_parens(&self) -> bool {
        !matches!(self, Formula::Atom(_) | Formula::Not(_))
    }
}

/// Hash-consing store for the formulas of one proof attempt.
#[derive(Debug, Default)]
pub struct FormulaArena {
    nodes: Vec<Formula>,
    ids: HashMap<Formula, FormulaId>,
}

impl FormulaArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, formula: Formula) -> FormulaId {
        if let Some(&id) = self.ids.get(&formula) {
            return id;
        }
        let id = FormulaId::from_usize(self.nodes.len());
        self.nodes.push(formula);
        self.ids.insert(formula, id);
        id
    }

    pub fn atom(&mut self, name: &str) -> FormulaId {
        self.intern(Formula::Atom(Symbol::intern(name)))
    }

    pub fn not(&mut self, child: FormulaId) -> FormulaId {
        self.intern(Formula::Not(child))
    }

    pub fn and(&mut self, left: FormulaId, right: FormulaId) -> FormulaId {
        self.intern(Formula::And(left, right))
    }

    pub fn or(&mut self, left: FormulaId, right: FormulaId) -> FormulaId {
        self.intern(Formula::Or(left, right))
    }

    pub fn implies(&mut self, left: FormulaId, right: FormulaId) -> FormulaId {
        self.intern(Formula::Impl(left, right))
    }

    #[inline]
    pub fn get(&self, id: FormulaId) -> Formula {
        self.nodes[id.as_usize()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `id` followed by all of its sub-formulas, in pre-order.
    pub fn subformulas(&self, id: FormulaId) -> Vec<FormulaId> {
        let mut out = vec![];
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            match self.get(cur) {
                Formula::Atom(_) => {}
                Formula::Not(c) => stack.push(c),
                Formula::And(l, r) | Formula::Or(l, r) | Formula::Impl(l, r) => {
                    stack.push(r);
                    stack.push(l);
                }
            }
        }
        out
    }

    /// Canonical rendering of `id`, e.g. `~P v (Q . R)`.
    pub fn display(&self, id: FormulaId) -> FormulaDisplay<'_> {
        FormulaDisplay { arena: self, id }
    }
}

pub struct FormulaDisplay<'a> {
    arena: &'a FormulaArena,
    id: FormulaId,
}

impl FormulaDisplay<'_> {
    fn operand(&self, f: &mut fmt::Formatter<'_>, id: FormulaId) -> fmt::Result {
        let child = self.arena.display(id);
        if self.arena.get(id).needs_parens() {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }
}

impl fmt::Display for FormulaDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.arena.get(self.id);
        match node {
            Formula::Atom(s) => write!(f, "{}", s),
            Formula::Not(c) => {
                f.write_str("~")?;
                self.operand(f, c)
            }
            Formula::And(l, r) | Formula::Or(l, r) | Formula::Impl(l, r) => {
                self.operand(f, l)?;
                if let Some(op) = node.op() {
                    write!(f, " {} ", op)?;
                }
                self.operand(f, r)
            }
        }
    }
}
