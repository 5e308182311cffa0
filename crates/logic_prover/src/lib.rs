#[macro_use]
mod macros;

pub mod logic;
pub mod parse;
pub mod prover;
pub mod symbol;

use serde::{Deserialize, Serialize};

pub use logic::{Formula, FormulaArena, FormulaId};
pub use prover::check::check_proof;
pub use prover::result::{SolveResult, StepRecord};
pub use prover::rules::RuleTag;
pub use prover::{
    solve, solve_premise_list, solve_premise_list_with, solve_with, ProverErr, ProverParams,
};

use symbol::Interner;

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckMsg {
    pub valid: bool,
    pub msg: String,
}

pub struct SessionGlobals {
    symbol_interner: Interner,
}

impl SessionGlobals {
    fn new() -> Self {
        Self {
            symbol_interner: Interner::fresh(),
        }
    }
}

scoped_tls::scoped_thread_local!(static SESSION_GLOBALS: SessionGlobals);

/// Runs `f` with a fresh symbol interner. Every [`symbol::Symbol`] and every
/// formula built from one is only meaningful inside the session that created it.
pub fn session<R>(f: impl FnOnce() -> R) -> R {
    let globals = SessionGlobals::new();
    SESSION_GLOBALS.set(&globals, f)
}

pub(crate) fn with_session_globals<R>(f: impl FnOnce(&SessionGlobals) -> R) -> R {
    SESSION_GLOBALS.with(f)
}
