use std::fmt;

use crate::logic::{FormulaArena, FormulaId};

pub type ParseResult<T> = Result<T, ParseErr>;

/// Nesting depth beyond which a formula is rejected instead of recursed into.
pub const DEFAULT_MAX_NESTING: usize = 256;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParseErr {
    EmptyFormula,
    MissingOperand(char, usize),
    TooDeep(usize),
}

impl fmt::Display for ParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErr::EmptyFormula => write!(f, "Encountered an empty formula"),
            ParseErr::MissingOperand(op, pos) => {
                write!(f, "Operator '{}' at position {} is missing an operand", op, pos)
            }
            ParseErr::TooDeep(limit) => {
                write!(f, "Formula exceeds the nesting limit of {}", limit)
            }
        }
    }
}

pub fn parse_formula(arena: &mut FormulaArena, formula: &str) -> ParseResult<FormulaId> {
    FormulaParser::new(arena, formula, DEFAULT_MAX_NESTING).parse()
}

/// Splits on the top-level operators of the loosest level present instead of
/// tokenizing, folding the segments to the left. This gives `>` the lowest
/// precedence and puts `.` and `v` on one shared level: `P . Q v R` reads as
/// `(P . Q) v R` and `P v Q . R` as `(P v Q) . R`.
///
/// Only parentheses and `~` count towards the nesting limit, so flat chains
/// like `A . B . C . ...` parse at any length.
pub struct FormulaParser<'a> {
    arena: &'a mut FormulaArena,
    chars: Vec<char>,
    max_nesting: usize,
}

impl<'a> FormulaParser<'a> {
    pub fn new(arena: &'a mut FormulaArena, formula: &str, max_nesting: usize) -> Self {
        Self {
            arena,
            chars: formula.chars().filter(|c| !c.is_whitespace()).collect(),
            max_nesting,
        }
    }

    pub fn parse(mut self) -> ParseResult<FormulaId> {
        let end = self.chars.len();
        self.parse_range(0, end, 0)
    }

    fn parse_range(&mut self, start: usize, end: usize, nesting: usize) -> ParseResult<FormulaId> {
        if nesting > self.max_nesting {
            return Err(ParseErr::TooDeep(self.max_nesting));
        }
        if start == end {
            return Err(ParseErr::EmptyFormula);
        }

        if self.is_wrapped(start, end) {
            return self.parse_range(start + 1, end - 1, nesting + 1);
        }

        let mut splits = self.top_level_ops(start, end, |c| c == '>');
        if splits.is_empty() {
            splits = self.top_level_ops(start, end, |c| c == 'v' || c == '.');
        }

        if let Some(&first) = splits.first() {
            self.parse_chain(start, end, &splits, first, nesting)
        } else if self.chars[start] == '~' {
            let child = self.operand(start + 1, end, '~', start, nesting + 1)?;
            Ok(self.arena.not(child))
        } else {
            let name: String = self.chars[start..end].iter().collect();
            Ok(self.arena.atom(&name))
        }
    }

    /// Left fold over the segments between the operator positions `splits`.
    fn parse_chain(
        &mut self,
        start: usize,
        end: usize,
        splits: &[usize],
        first: usize,
        nesting: usize,
    ) -> ParseResult<FormulaId> {
        let first_op = self.chars[first];
        let mut acc = self.operand(start, first, first_op, first, nesting)?;
        for (k, &idx) in splits.iter().enumerate() {
            let op = self.chars[idx];
            let seg_end = splits.get(k + 1).copied().unwrap_or(end);
            let right = self.operand(idx + 1, seg_end, op, idx, nesting)?;
            acc = match op {
                '>' => self.arena.implies(acc, right),
                'v' => self.arena.or(acc, right),
                _ => self.arena.and(acc, right),
            };
        }
        Ok(acc)
    }

    fn operand(
        &mut self,
        start: usize,
        end: usize,
        op: char,
        pos: usize,
        nesting: usize,
    ) -> ParseResult<FormulaId> {
        if start == end {
            return Err(ParseErr::MissingOperand(op, pos));
        }
        self.parse_range(start, end, nesting)
    }

    /// True if the range is one parenthesized group, i.e. the opening paren
    /// is only balanced by the final character.
    fn is_wrapped(&self, start: usize, end: usize) -> bool {
        if end - start < 2 || self.chars[start] != '(' || self.chars[end - 1] != ')' {
            return false;
        }
        let mut balance = 0i32;
        for &c in &self.chars[start..end - 1] {
            match c {
                '(' => balance += 1,
                ')' => balance -= 1,
                _ => {}
            }
            if balance == 0 {
                return false;
            }
        }
        true
    }

    /// Ascending indices in the range whose character matches `is_op` and
    /// sits outside all parentheses. Balance is counted from the right end.
    fn top_level_ops(&self, start: usize, end: usize, is_op: impl Fn(char) -> bool) -> Vec<usize> {
        let mut balance = 0i32;
        let mut res = vec![];
        for idx in (start..end).rev() {
            let c = self.chars[idx];
            match c {
                ')' => balance += 1,
                '(' => balance -= 1,
                _ => {}
            }
            if balance == 0 && is_op(c) {
                res.push(idx);
            }
        }
        res.reverse();
        res
    }
}
