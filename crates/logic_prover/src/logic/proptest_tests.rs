//! Property-based tests for canonical printing and structural equality.

use proptest::prelude::*;

use super::{FormulaArena, FormulaId};
use crate::parse::parse_formula;
use crate::session;

/// Formula description before interning
#[derive(Debug, Clone)]
enum FormulaDesc {
    Atom(u8),
    Not(Box<FormulaDesc>),
    And(Box<FormulaDesc>, Box<FormulaDesc>),
    Or(Box<FormulaDesc>, Box<FormulaDesc>),
    Impl(Box<FormulaDesc>, Box<FormulaDesc>),
}

const ATOMS: [&str; 4] = ["P", "Q", "R", "S"];

fn arb_formula_desc(max_depth: u32) -> BoxedStrategy<FormulaDesc> {
    if max_depth == 0 {
        (0..4u8).prop_map(FormulaDesc::Atom).boxed()
    } else {
        let sub = arb_formula_desc(max_depth - 1);
        prop_oneof![
            3 => (0..4u8).prop_map(FormulaDesc::Atom),
            1 => sub.clone().prop_map(|c| FormulaDesc::Not(Box::new(c))),
            1 => (sub.clone(), sub.clone())
                .prop_map(|(l, r)| FormulaDesc::And(Box::new(l), Box::new(r))),
            1 => (sub.clone(), sub.clone())
                .prop_map(|(l, r)| FormulaDesc::Or(Box::new(l), Box::new(r))),
            1 => (sub.clone(), sub)
                .prop_map(|(l, r)| FormulaDesc::Impl(Box::new(l), Box::new(r))),
        ]
        .boxed()
    }
}

fn build(desc: &FormulaDesc, arena: &mut FormulaArena) -> FormulaId {
    match desc {
        FormulaDesc::Atom(i) => arena.atom(ATOMS[*i as usize]),
        FormulaDesc::Not(c) => {
            let c = build(c, arena);
            arena.not(c)
        }
        FormulaDesc::And(l, r) => {
            let (l, r) = (build(l, arena), build(r, arena));
            arena.and(l, r)
        }
        FormulaDesc::Or(l, r) => {
            let (l, r) = (build(l, arena), build(r, arena));
            arena.or(l, r)
        }
        FormulaDesc::Impl(l, r) => {
            let (l, r) = (build(l, arena), build(r, arena));
            arena.implies(l, r)
        }
    }
}

proptest! {
    /// A bare atom prints back exactly as written.
    #[test]
    fn atom_prints_unchanged(name in "[A-Z][A-Za-uw-z0-9_]{0,8}") {
        session(|| {
            let mut arena = FormulaArena::new();
            let id = parse_formula(&mut arena, &name).unwrap();
            prop_assert_eq!(&name, &arena.display(id).to_string());
            Ok(())
        })?;
    }

    /// The canonical string parses back to the same formula.
    #[test]
    fn print_then_parse_is_identity(desc in arb_formula_desc(4)) {
        session(|| {
            let mut arena = FormulaArena::new();
            let id = build(&desc, &mut arena);
            let printed = arena.display(id).to_string();
            let reparsed = parse_formula(&mut arena, &printed).unwrap();
            prop_assert_eq!(id, reparsed, "printed: {}", printed);
            Ok(())
        })?;
    }

    /// Equality does not depend on extra whitespace or redundant parentheses.
    #[test]
    fn equality_ignores_layout(desc in arb_formula_desc(3)) {
        session(|| {
            let mut arena = FormulaArena::new();
            let id = build(&desc, &mut arena);
            let printed = arena.display(id).to_string();
            let padded = format!(" ( {} ) ", printed.replace(' ', "   "));
            let a = parse_formula(&mut arena, &printed).unwrap();
            let b = parse_formula(&mut arena, &padded).unwrap();
            prop_assert_eq!(a, b);
            prop_assert_eq!(b, a);
            prop_assert_eq!(a, id);
            Ok(())
        })?;
    }
}
