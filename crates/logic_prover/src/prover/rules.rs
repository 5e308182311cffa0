use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::goals::GoalSet;
use crate::logic::{Formula, FormulaArena, FormulaId};

/// Justification tag of a proof step as it appears in a rendered proof.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "&str")]
pub enum RuleTag {
    Premise,
    Repl,
    Simp,
    Add,
    Conj,
    MP,
    MT,
    DS,
    HS,
    CD,
}

impl RuleTag {
    pub fn to_str(&self) -> &'static str {
        match self {
            RuleTag::Premise => "Premise",
            RuleTag::Repl => "Repl",
            RuleTag::Simp => "Simp",
            RuleTag::Add => "Add",
            RuleTag::Conj => "Conj",
            RuleTag::MP => "MP",
            RuleTag::MT => "MT",
            RuleTag::DS => "DS",
            RuleTag::HS => "HS",
            RuleTag::CD => "CD",
        }
    }

    /// Number of earlier steps a step with this tag cites.
    pub fn arity(&self) -> usize {
        match self {
            RuleTag::Premise => 0,
            RuleTag::Repl | RuleTag::Simp | RuleTag::Add => 1,
            RuleTag::Conj | RuleTag::MP | RuleTag::MT | RuleTag::DS | RuleTag::HS | RuleTag::CD => {
                2
            }
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl<'a> TryFrom<&'a str> for RuleTag {
    type Error = &'static str;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        match s {
            "Premise" => Ok(RuleTag::Premise),
            "Repl" => Ok(RuleTag::Repl),
            "Simp" => Ok(RuleTag::Simp),
            "Add" => Ok(RuleTag::Add),
            "Conj" => Ok(RuleTag::Conj),
            "MP" => Ok(RuleTag::MP),
            "MT" => Ok(RuleTag::MT),
            "DS" => Ok(RuleTag::DS),
            "HS" => Ok(RuleTag::HS),
            "CD" => Ok(RuleTag::CD),
            _ => Err("Unknown rule"),
        }
    }
}

impl Serialize for RuleTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_str())
    }
}

/// The equivalence behind a `Repl` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    DN,
    Comm,
    Impl,
    DM,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub formula: FormulaId,
    pub tag: RuleTag,
    pub via: Option<Equivalence>,
}

impl Candidate {
    fn new(formula: FormulaId, tag: RuleTag) -> Self {
        Self {
            formula,
            tag,
            via: None,
        }
    }

    fn repl(formula: FormulaId, via: Equivalence) -> Self {
        Self {
            formula,
            tag: RuleTag::Repl,
            via: Some(via),
        }
    }
}

/// Equivalent rewrites of `p` at its top level.
pub fn replacements(arena: &mut FormulaArena, p: FormulaId) -> Vec<Candidate> {
    let mut res = vec![];
    let node = arena.get(p);

    if let Formula::Not(c) = node {
        if let Formula::Not(inner) = arena.get(c) {
            res.push(Candidate::repl(inner, Equivalence::DN));
        }
    }
    let np = arena.not(p);
    res.push(Candidate::repl(arena.not(np), Equivalence::DN));

    match node {
        Formula::And(l, r) => res.push(Candidate::repl(arena.and(r, l), Equivalence::Comm)),
        Formula::Or(l, r) => res.push(Candidate::repl(arena.or(r, l), Equivalence::Comm)),
        _ => {}
    }

    if let Formula::Impl(l, r) = node {
        let nl = arena.not(l);
        res.push(Candidate::repl(arena.or(nl, r), Equivalence::Impl));
    }
    if let Formula::Or(l, r) = node {
        if let Formula::Not(a) = arena.get(l) {
            res.push(Candidate::repl(arena.implies(a, r), Equivalence::Impl));
        }
    }

    // ~(P . Q) only; there is no rule for ~(P v Q)
    if let Formula::Not(c) = node {
        if let Formula::And(a, b) = arena.get(c) {
            let na = arena.not(a);
            let nb = arena.not(b);
            res.push(Candidate::repl(arena.or(na, nb), Equivalence::DM));
        }
    }

    res
}

/// Everything derivable from the single step `p`: replacements, then
/// simplification, then additions restricted to the goal set.
pub fn one_premise(arena: &mut FormulaArena, goals: &GoalSet, p: FormulaId) -> Vec<Candidate> {
    let mut res = replacements(arena, p);

    if let Formula::And(l, r) = arena.get(p) {
        res.push(Candidate::new(l, RuleTag::Simp));
        res.push(Candidate::new(r, RuleTag::Simp));
    }

    for g in goals.iter() {
        if let Formula::Or(x, y) = arena.get(g) {
            if x == p || y == p {
                res.push(Candidate::new(g, RuleTag::Add));
            }
        }
    }

    res
}

/// Everything derivable from `p1` and `p2` in that order.
pub fn two_premise(
    arena: &mut FormulaArena,
    goals: &GoalSet,
    p1: FormulaId,
    p2: FormulaId,
) -> Vec<Candidate> {
    let mut res = vec![];
    let first = arena.get(p1);
    let second = arena.get(p2);

    if let Formula::Impl(a, b) = first {
        if a == p2 {
            res.push(Candidate::new(b, RuleTag::MP));
        }
        if let Formula::Not(x) = second {
            if x == b {
                res.push(Candidate::new(arena.not(a), RuleTag::MT));
            }
        }
    }

    if let (Formula::Or(a, b), Formula::Not(x)) = (first, second) {
        if x == a {
            res.push(Candidate::new(b, RuleTag::DS));
        }
        if x == b {
            res.push(Candidate::new(a, RuleTag::DS));
        }
    }

    if let (Formula::Impl(a, b), Formula::Impl(c, d)) = (first, second) {
        if b == c {
            res.push(Candidate::new(arena.implies(a, d), RuleTag::HS));
        }
    }

    if let (Formula::And(left, right), Formula::Or(x, y)) = (first, second) {
        if let (Formula::Impl(p, q), Formula::Impl(r, s)) = (arena.get(left), arena.get(right)) {
            if (x == p && y == r) || (x == r && y == p) {
                res.push(Candidate::new(arena.or(q, s), RuleTag::CD));
            }
        }
    }

    for g in goals.iter() {
        if let Formula::And(x, y) = arena.get(g) {
            if (x == p1 && y == p2) || (x == p2 && y == p1) {
                res.push(Candidate::new(g, RuleTag::Conj));
            }
        }
    }

    res
}
