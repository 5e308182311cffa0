use std::collections::HashSet;

use crate::logic::{FormulaArena, FormulaId};

/// Every distinct sub-formula of the conclusion and the premises. Addition
/// and conjunction may only produce members of this set.
#[derive(Debug, Clone, Default)]
pub struct GoalSet {
    members: Vec<FormulaId>,
    seen: HashSet<FormulaId>,
}

impl GoalSet {
    /// Collects the conclusion's sub-formulas first, then each premise's, in
    /// pre-order, keeping the first occurrence of every formula.
    pub fn new(arena: &FormulaArena, conclusion: FormulaId, premises: &[FormulaId]) -> Self {
        let mut goals = Self::default();
        for &root in std::iter::once(&conclusion).chain(premises) {
            for id in arena.subformulas(root) {
                if goals.seen.insert(id) {
                    goals.members.push(id);
                }
            }
        }
        goals
    }

    pub fn contains(&self, id: FormulaId) -> bool {
        self.seen.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = FormulaId> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
