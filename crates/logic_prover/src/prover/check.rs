use std::collections::HashSet;

use log::debug;

use super::goals::GoalSet;
use super::result::StepRecord;
use super::rules::{self, RuleTag};
use super::{DerivationPath, ProofStep, ProverErr, ProverResult, Refs};
use crate::logic::{FormulaArena, FormulaId};
use crate::parse::parse_formula;
use crate::session;

/// Checks that `steps` is a sound derivation of `conclusion` from
/// `premises`, using the same rules and goal set as the search.
pub fn check_proof(premises: &[&str], conclusion: &str, steps: &[StepRecord]) -> ProverResult<()> {
    session(|| {
        let mut arena = FormulaArena::new();
        let given: Vec<FormulaId> = premises
            .iter()
            .filter_map(|p| parse_formula(&mut arena, p).ok())
            .collect();
        let target =
            parse_formula(&mut arena, conclusion).map_err(|_| ProverErr::InvalidInput)?;
        if given.is_empty() {
            return Err(ProverErr::InvalidInput);
        }

        let goals = GoalSet::new(&arena, target, &given);
        let given: HashSet<FormulaId> = given.into_iter().collect();
        let mut path = DerivationPath::new();
        let mut derived = false;

        for (k, step) in steps.iter().enumerate() {
            let line = k + 1;
            if step.index != line {
                return Err(ProverErr::BadIndex(line));
            }
            let formula = parse_formula(&mut arena, &step.expression)
                .map_err(|e| ProverErr::Parse(line, e))?;
            if path.contains(formula) {
                return Err(ProverErr::Duplicate(line));
            }

            let refs = parse_refs(&step.reference, step.rule, k)?;
            if step.rule == RuleTag::Premise {
                if derived {
                    return Err(ProverErr::LatePremise(line));
                }
                if !given.contains(&formula) {
                    return Err(ProverErr::PremiseMismatch(line));
                }
            } else {
                derived = true;
                let candidates = match refs {
                    Refs::One(i) => rules::one_premise(&mut arena, &goals, path.formula(i)),
                    Refs::Two(i, j) => {
                        rules::two_premise(&mut arena, &goals, path.formula(i), path.formula(j))
                    }
                    Refs::Given => vec![],
                };
                let justified = candidates
                    .iter()
                    .any(|c| c.tag == step.rule && c.formula == formula);
                if !justified {
                    debug!("Line {} ({}) is unjustified", line, step.expression);
                    return Err(ProverErr::Unjustified(line));
                }
            }

            path.push(ProofStep {
                formula,
                rule: step.rule,
                via: None,
                refs,
            });
        }

        if path.contains(target) {
            Ok(())
        } else {
            Err(ProverErr::ConclusionMissing)
        }
    })
}

/// Parses `""`, `"(i)"` or `"(i, j)"` into 0-based references for step `k`
/// and checks them against the arity of `rule`. A two-line citation must
/// name two different lines.
fn parse_refs(reference: &str, rule: RuleTag, k: usize) -> ProverResult<Refs> {
    let line = k + 1;
    let reference = reference.trim();
    let cited: Vec<usize> = if reference.is_empty() {
        vec![]
    } else {
        let inner = reference
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or(ProverErr::MalformedRef(line))?;
        inner
            .split(',')
            .map(|n| n.trim().parse::<usize>())
            .collect::<Result<_, _>>()
            .map_err(|_| ProverErr::MalformedRef(line))?
    };

    if cited.len() != rule.arity() {
        return Err(ProverErr::MalformedRef(line));
    }
    if cited.iter().any(|&c| c == 0 || c > k) {
        return Err(ProverErr::ForwardRef(line));
    }

    Ok(match cited.as_slice() {
        [] => Refs::Given,
        [i] => Refs::One(i - 1),
        [i, j] if i != j => Refs::Two(i - 1, j - 1),
        _ => return Err(ProverErr::MalformedRef(line)),
    })
}
