use std::collections::HashSet;
use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::logic::{FormulaArena, FormulaId};
use crate::parse::{FormulaParser, ParseErr, DEFAULT_MAX_NESTING};
use crate::session;

pub mod check;
pub mod goals;
pub mod result;
pub mod rules;

use goals::GoalSet;
use result::SolveResult;
use rules::{Candidate, Equivalence, RuleTag};

pub type ProverResult<T> = Result<T, ProverErr>;

pub const MAX_DEPTH: usize = 12;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ProverErr {
    InvalidInput,
    NotFound(usize),
    StepLimit(u64),
    Parse(usize, ParseErr),
    BadIndex(usize),
    MalformedRef(usize),
    ForwardRef(usize),
    PremiseMismatch(usize),
    LatePremise(usize),
    Unjustified(usize),
    Duplicate(usize),
    ConclusionMissing,
}

impl fmt::Display for ProverErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProverErr::InvalidInput => write!(f, "Error: Invalid Input."),
            ProverErr::NotFound(depth) => write!(f, "No proof within {} derivation steps", depth),
            ProverErr::StepLimit(limit) => write!(f, "Search aborted after {} steps", limit),
            ProverErr::Parse(step, e) => write!(f, "Step {}: {}", step, e),
            ProverErr::BadIndex(step) => write!(f, "Step {} is out of sequence", step),
            ProverErr::MalformedRef(step) => {
                write!(f, "Step {} does not cite the right number of lines", step)
            }
            ProverErr::ForwardRef(step) => write!(f, "Step {} cites a line that is not earlier", step),
            ProverErr::PremiseMismatch(step) => write!(f, "Step {} is not one of the premises", step),
            ProverErr::LatePremise(step) => {
                write!(f, "Step {} states a premise after a derived line", step)
            }
            ProverErr::Unjustified(step) => {
                write!(f, "Step {} does not follow from the cited lines by its rule", step)
            }
            ProverErr::Duplicate(step) => write!(f, "Step {} repeats an earlier line", step),
            ProverErr::ConclusionMissing => write!(f, "The proof never reaches the conclusion"),
        }
    }
}

impl ProverErr {
    /// The message a caller of [`solve`] sees for this failure.
    pub fn failure_message(&self) -> &'static str {
        match self {
            ProverErr::InvalidInput => "Error: Invalid Input.",
            _ => "Proof not found within search limits.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct ProverParams {
    pub max_depth: usize,
    pub max_nesting: usize,
    pub step_limit: Option<u64>,
}

impl Default for ProverParams {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_nesting: DEFAULT_MAX_NESTING,
            step_limit: None,
        }
    }
}

/// Earlier steps a proof step cites, as 0-based path indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refs {
    Given,
    One(usize),
    Two(usize, usize),
}

impl Refs {
    pub fn to_vec(&self) -> Vec<usize> {
        match *self {
            Refs::Given => vec![],
            Refs::One(i) => vec![i],
            Refs::Two(i, j) => vec![i, j],
        }
    }
}

impl fmt::Display for Refs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Refs::Given => Ok(()),
            Refs::One(i) => write!(f, "({})", i + 1),
            Refs::Two(i, j) => write!(f, "({}, {})", i + 1, j + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofStep {
    pub formula: FormulaId,
    pub rule: RuleTag,
    pub via: Option<Equivalence>,
    pub refs: Refs,
}

impl ProofStep {
    pub fn premise(formula: FormulaId) -> Self {
        Self {
            formula,
            rule: RuleTag::Premise,
            via: None,
            refs: Refs::Given,
        }
    }

    fn derived(candidate: Candidate, refs: Refs) -> Self {
        Self {
            formula: candidate.formula,
            rule: candidate.tag,
            via: candidate.via,
            refs,
        }
    }
}

/// Ordered proof lines; no formula occurs twice.
#[derive(Debug, Clone, Default)]
pub struct DerivationPath {
    steps: Vec<ProofStep>,
    known: HashSet<FormulaId>,
}

impl DerivationPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Premise steps for each distinct formula, in input order.
    pub fn from_premises(premises: &[FormulaId]) -> Self {
        let mut path = Self::new();
        for &p in premises {
            path.push(ProofStep::premise(p));
        }
        path
    }

    pub fn contains(&self, formula: FormulaId) -> bool {
        self.known.contains(&formula)
    }

    /// Appends `step` unless its formula is already on the path.
    pub fn push(&mut self, step: ProofStep) -> bool {
        if !self.known.insert(step.formula) {
            return false;
        }
        self.steps.push(step);
        true
    }

    pub fn pop(&mut self) -> Option<ProofStep> {
        let step = self.steps.pop()?;
        self.known.remove(&step.formula);
        Some(step)
    }

    pub fn formula(&self, idx: usize) -> FormulaId {
        self.steps[idx].formula
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

struct Budget {
    limit: Option<u64>,
    spent: u64,
}

impl Budget {
    fn spend(&mut self) -> ProverResult<()> {
        self.spent += 1;
        match self.limit {
            Some(limit) if self.spent > limit => Err(ProverErr::StepLimit(limit)),
            _ => Ok(()),
        }
    }
}

/// Iterative deepening over derivation paths. The goal set belongs to the
/// call that built the prover and is never shared between searches.
pub struct Prover<'a> {
    arena: &'a mut FormulaArena,
    goals: &'a GoalSet,
    target: FormulaId,
    budget: Budget,
}

impl<'a> Prover<'a> {
    pub fn new(
        arena: &'a mut FormulaArena,
        goals: &'a GoalSet,
        target: FormulaId,
        step_limit: Option<u64>,
    ) -> Self {
        Self {
            arena,
            goals,
            target,
            budget: Budget {
                limit: step_limit,
                spent: 0,
            },
        }
    }

    /// Tries depth limits `1..=max_depth`, each from a fresh copy of
    /// `initial`, and returns the first path that reaches the target.
    pub fn search(
        &mut self,
        initial: &DerivationPath,
        max_depth: usize,
    ) -> ProverResult<Option<DerivationPath>> {
        for depth in 1..=max_depth {
            let mut path = initial.clone();
            debug!("Searching with depth limit {}", depth);
            if self.expand(&mut path, 0, depth)? {
                debug!(
                    "Found proof of {} lines at depth limit {} after {} steps",
                    path.len(),
                    depth,
                    self.budget.spent
                );
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Depth-first extension of `path`. On failure the path is left as it
    /// was on entry.
    fn expand(&mut self, path: &mut DerivationPath, cur: usize, max: usize) -> ProverResult<bool> {
        if path.contains(self.target) {
            return Ok(true);
        }
        if cur >= max {
            return Ok(false);
        }

        let n = path.len();
        for i in 0..n {
            let p1 = path.formula(i);

            for c in rules::one_premise(self.arena, self.goals, p1) {
                if self.try_step(path, c, Refs::One(i), cur, max)? {
                    return Ok(true);
                }
            }

            for j in 0..n {
                if i == j {
                    continue;
                }
                let p2 = path.formula(j);
                for c in rules::two_premise(self.arena, self.goals, p1, p2) {
                    if self.try_step(path, c, Refs::Two(i, j), cur, max)? {
                        return Ok(true);
                    }
                }
            }
        }

        Ok(false)
    }

    fn try_step(
        &mut self,
        path: &mut DerivationPath,
        candidate: Candidate,
        refs: Refs,
        cur: usize,
        max: usize,
    ) -> ProverResult<bool> {
        if path.contains(candidate.formula) {
            return Ok(false);
        }
        self.budget.spend()?;
        trace!(
            "{} {:?} {} => {}",
            candidate.tag,
            candidate.via,
            refs,
            self.arena.display(candidate.formula)
        );

        path.push(ProofStep::derived(candidate, refs));
        if self.expand(path, cur + 1, max)? {
            return Ok(true);
        }
        path.pop();
        Ok(false)
    }
}

/// Parses the inputs and searches for a proof of `conclusion`.
///
/// Premises that fail to parse are skipped. Must run inside a [`session`].
pub fn prove(
    arena: &mut FormulaArena,
    premises: &[&str],
    conclusion: &str,
    params: &ProverParams,
) -> ProverResult<DerivationPath> {
    let mut parsed = vec![];
    for p in premises {
        match FormulaParser::new(arena, p, params.max_nesting).parse() {
            Ok(id) => parsed.push(id),
            Err(e) => debug!("Dropping premise '{}': {}", p, e),
        }
    }

    let conclusion = FormulaParser::new(arena, conclusion, params.max_nesting)
        .parse()
        .map_err(|e| {
            debug!("Rejecting conclusion: {}", e);
            ProverErr::InvalidInput
        })?;
    if parsed.is_empty() {
        return Err(ProverErr::InvalidInput);
    }

    let goals = GoalSet::new(arena, conclusion, &parsed);
    let initial = DerivationPath::from_premises(&parsed);
    debug!(
        "Proving {} from {} premises with {} goals",
        arena.display(conclusion),
        initial.len(),
        goals.len()
    );

    let mut prover = Prover::new(arena, &goals, conclusion, params.step_limit);
    prover
        .search(&initial, params.max_depth)?
        .ok_or(ProverErr::NotFound(params.max_depth))
}

pub fn solve(premises: &[&str], conclusion: &str) -> SolveResult {
    solve_with(premises, conclusion, &ProverParams::default())
}

pub fn solve_with(premises: &[&str], conclusion: &str, params: &ProverParams) -> SolveResult {
    session(|| {
        let mut arena = FormulaArena::new();
        match prove(&mut arena, premises, conclusion, params) {
            Ok(path) => SolveResult::from_path(&arena, &path),
            Err(e) => {
                debug!("{}", e);
                SolveResult::failure(&e)
            }
        }
    })
}

/// Like [`solve`], with the premises given as one comma-separated string.
pub fn solve_premise_list(premises: &str, conclusion: &str) -> SolveResult {
    solve_premise_list_with(premises, conclusion, &ProverParams::default())
}

pub fn solve_premise_list_with(
    premises: &str,
    conclusion: &str,
    params: &ProverParams,
) -> SolveResult {
    let premises: Vec<&str> = premises.split(',').collect();
    solve_with(&premises, conclusion, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prover::result::StepRecord;

    fn rules_of(steps: &[StepRecord]) -> Vec<RuleTag> {
        steps.iter().map(|s| s.rule).collect()
    }

    fn assert_well_formed(steps: &[StepRecord]) {
        for (k, s) in steps.iter().enumerate() {
            assert_eq!(k + 1, s.index);
            for other in &steps[..k] {
                assert_ne!(other.expression, s.expression);
            }
        }
    }

    mod scenarios {
        use super::*;

        #[test]
        fn modus_ponens() {
            let res = solve(&["P > Q", "P"], "Q");
            let steps = res.steps().unwrap();
            assert_well_formed(steps);
            let mp: Vec<_> = steps.iter().filter(|s| s.rule == RuleTag::MP).collect();
            assert_eq!(1, mp.len());
            assert_eq!("(1, 2)", mp[0].reference);
            assert_eq!("Q", steps.last().unwrap().expression);
        }

        #[test]
        fn modus_tollens() {
            let res = solve(&["P > Q", "~Q"], "~P");
            let steps = res.steps().unwrap();
            assert_eq!(
                vec![RuleTag::Premise, RuleTag::Premise, RuleTag::MT],
                rules_of(steps)
            );
            assert_eq!("~P", steps[2].expression);
            assert_eq!("(1, 2)", steps[2].reference);
        }

        #[test]
        fn addition_from_goal() {
            let res = solve(&["P"], "P v Q");
            let steps = res.steps().unwrap();
            assert_eq!(vec![RuleTag::Premise, RuleTag::Add], rules_of(steps));
            assert_eq!("P v Q", steps[1].expression);
            assert_eq!("(1)", steps[1].reference);
        }

        #[test]
        fn unrelated_atoms() {
            let res = solve(&["P"], "Q");
            assert!(!res.is_success());
            assert_eq!(Some("Proof not found within search limits."), res.message());
        }

        #[test]
        fn invalid_input() {
            let res = solve(&[], "Q");
            assert_eq!(Some("Error: Invalid Input."), res.message());
            let res = solve(&["P"], "");
            assert_eq!(Some("Error: Invalid Input."), res.message());
            let res = solve(&["", "  ", "P >"], "P");
            assert_eq!(Some("Error: Invalid Input."), res.message());
        }

        #[test]
        fn malformed_premises_are_dropped() {
            let res = solve(&["P >", "P > Q", "", "P"], "Q");
            let steps = res.steps().unwrap();
            assert_eq!("P > Q", steps[0].expression);
            assert_eq!("P", steps[1].expression);
            assert_eq!("(1, 2)", steps[2].reference);
        }

        #[test]
        fn conclusion_among_premises() {
            let res = solve(&["P", "Q"], "(Q)");
            let steps = res.steps().unwrap();
            assert_eq!(vec![RuleTag::Premise, RuleTag::Premise], rules_of(steps));
        }

        #[test]
        fn duplicate_premises_collapse() {
            let res = solve(&["P", "P", "P > Q"], "Q");
            let steps = res.steps().unwrap();
            assert_well_formed(steps);
            assert_eq!(
                vec![RuleTag::Premise, RuleTag::Premise, RuleTag::MP],
                rules_of(steps)
            );
            assert_eq!("(2, 1)", steps[2].reference);
        }
    }

    mod inference {
        use super::*;

        #[test]
        fn hypothetical_syllogism() {
            let res = solve(&["P > Q", "Q > R"], "P > R");
            let steps = res.steps().unwrap();
            assert_eq!(RuleTag::HS, steps[2].rule);
        }

        #[test]
        fn disjunctive_syllogism() {
            let res = solve(&["P v Q", "~P"], "Q");
            assert_eq!(RuleTag::DS, res.steps().unwrap()[2].rule);
        }

        #[test]
        fn constructive_dilemma() {
            let res = solve(&["(P > Q) . (R > S)", "P v R"], "Q v S");
            let steps = res.steps().unwrap();
            assert_eq!(RuleTag::CD, steps[2].rule);
            assert_eq!("Q v S", steps[2].expression);
        }

        #[test]
        fn conjunction() {
            let res = solve(&["P", "Q"], "P . Q");
            let steps = res.steps().unwrap();
            assert_eq!(RuleTag::Conj, steps[2].rule);
            assert_eq!("(1, 2)", steps[2].reference);
        }

        #[test]
        fn simplification() {
            let res = solve(&["P . Q"], "Q");
            let steps = res.steps().unwrap();
            assert_eq!(vec![RuleTag::Premise, RuleTag::Simp], rules_of(steps));
        }

        #[test]
        fn chained() {
            let res = solve(&["P > Q", "Q > R", "P"], "R");
            let steps = res.steps().unwrap();
            assert_well_formed(steps);
            assert_eq!(5, steps.len());
            assert_eq!("R", steps[4].expression);
        }

        #[test]
        fn de_morgan_then_syllogism() {
            let res = solve(&["~(P . Q)", "P"], "~Q");
            let steps = res.steps().unwrap();
            assert_well_formed(steps);
            assert!(rules_of(steps).contains(&RuleTag::Repl));
            assert_eq!("~Q", steps.last().unwrap().expression);
        }
    }

    mod search {
        use super::*;

        #[test]
        fn references_point_backwards() {
            session(|| {
                let mut arena = FormulaArena::new();
                let path = prove(
                    &mut arena,
                    &["(A > B) . (C > D)", "A v C", "~B"],
                    "D",
                    &ProverParams::default(),
                )
                .unwrap();
                for (k, step) in path.steps().iter().enumerate() {
                    for r in step.refs.to_vec() {
                        assert!(r < k, "step {} cites {}", k, r);
                    }
                }
            })
        }

        #[test]
        fn failed_branches_leave_path_unchanged() {
            session(|| {
                let mut arena = FormulaArena::new();
                let p = arena.atom("P");
                let q = arena.atom("Q");
                let goals = GoalSet::new(&arena, q, &[p]);
                let initial = DerivationPath::from_premises(&[p]);
                let mut path = initial.clone();
                let mut prover = Prover::new(&mut arena, &goals, q, None);
                assert!(!prover.expand(&mut path, 0, 4).unwrap());
                assert_eq!(initial.steps(), path.steps());
            })
        }

        #[test]
        fn step_limit_aborts() {
            let params = ProverParams {
                step_limit: Some(3),
                ..Default::default()
            };
            let res = solve_with(&["P"], "Q", &params);
            assert_eq!(Some("Proof not found within search limits."), res.message());

            session(|| {
                let mut arena = FormulaArena::new();
                let err = prove(&mut arena, &["P"], "Q", &params).unwrap_err();
                assert_eq!(ProverErr::StepLimit(3), err);
            })
        }

        #[test]
        fn step_limit_does_not_change_found_proofs() {
            let unlimited = solve(&["P > Q", "Q > R", "P"], "R");
            let params = ProverParams {
                step_limit: Some(1_000_000),
                ..Default::default()
            };
            let limited = solve_with(&["P > Q", "Q > R", "P"], "R", &params);
            assert_eq!(unlimited, limited);
        }

        #[test]
        fn shallow_depth_limit() {
            let params = ProverParams {
                max_depth: 1,
                ..Default::default()
            };
            let res = solve_with(&["P > Q", "Q > R", "P"], "R", &params);
            assert!(!res.is_success());
        }

        #[test]
        fn premise_list_string() {
            let res = solve_premise_list("P > Q, P", "Q");
            assert!(res.is_success());
            let res = solve_premise_list("", "Q");
            assert_eq!(Some("Error: Invalid Input."), res.message());
        }

        #[test]
        fn concurrent_solves_do_not_interfere() {
            let problems: Vec<(Vec<&'static str>, &'static str)> = vec![
                (vec!["P > Q", "P"], "Q"),
                (vec!["Rain > Wet", "~Wet"], "~Rain"),
                (vec!["P > Q", "Q > R", "P"], "R"),
                (vec!["(A > B) . (C > D)", "A v C", "~B"], "D"),
                (vec!["P"], "Q"),
            ];
            let expected: Vec<SolveResult> = problems
                .iter()
                .map(|(premises, conclusion)| solve(premises, conclusion))
                .collect();

            let handles: Vec<_> = problems
                .iter()
                .cloned()
                .map(|(premises, conclusion)| {
                    std::thread::spawn(move || solve(&premises, conclusion))
                })
                .collect();
            for (handle, want) in handles.into_iter().zip(&expected) {
                assert_eq!(want, &handle.join().unwrap());
            }
        }

        #[test]
        fn nested_solve_keeps_outer_session() {
            let expected = solve(&["Q v P", "~Q"], "P");
            session(|| {
                let mut arena = FormulaArena::new();
                let outer = arena.atom("Outer");
                let inner = solve(&["Q v P", "~Q"], "P");
                assert_eq!(expected, inner);
                assert_eq!("Outer", arena.display(outer).to_string());
                assert_eq!(outer, arena.atom("Outer"));
            })
        }

        #[test]
        fn params_from_json() {
            let params: ProverParams = serde_json::from_str(r#"{"maxDepth": 3}"#).unwrap();
            assert_eq!(3, params.max_depth);
            assert_eq!(DEFAULT_MAX_NESTING, params.max_nesting);
            assert_eq!(None, params.step_limit);
        }
    }
}
