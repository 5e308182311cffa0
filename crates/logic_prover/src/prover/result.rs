use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

use super::rules::RuleTag;
use super::{DerivationPath, ProverErr};
use crate::logic::FormulaArena;

/// One rendered proof line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub expression: String,
    pub rule: RuleTag,
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Proved(Vec<StepRecord>),
    Failed(String),
}

impl SolveResult {
    pub fn from_path(arena: &FormulaArena, path: &DerivationPath) -> Self {
        let steps = path
            .steps()
            .iter()
            .enumerate()
            .map(|(i, step)| StepRecord {
                index: i + 1,
                expression: arena.display(step.formula).to_string(),
                rule: step.rule,
                reference: step.refs.to_string(),
            })
            .collect();
        SolveResult::Proved(steps)
    }

    pub fn failure(err: &ProverErr) -> Self {
        SolveResult::Failed(err.failure_message().to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SolveResult::Proved(_))
    }

    pub fn steps(&self) -> Option<&[StepRecord]> {
        match self {
            SolveResult::Proved(steps) => Some(steps.as_slice()),
            SolveResult::Failed(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SolveResult::Proved(_) => None,
            SolveResult::Failed(msg) => Some(msg.as_str()),
        }
    }
}

impl Serialize for SolveResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SolveResult", 2)?;
        state.serialize_field("success", &self.is_success())?;
        match self {
            SolveResult::Proved(steps) => state.serialize_field("steps", steps)?,
            SolveResult::Failed(msg) => state.serialize_field("message", msg)?,
        }
        state.end()
    }
}
