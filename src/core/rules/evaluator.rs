// ─── Rule Evaluation ───
// Decides whether a library or argument applies to an `Environment`.

use super::environment::Environment;
use super::model::{Clause, Conditional, OsCondition, RuleAction, Rules};

/// Anything gated by an optional manifest `rules` list.
///
/// Library entries and conditional arguments implement this so both go
/// through the same evaluation.
pub trait Applicability {
    fn rules(&self) -> Option<&Rules>;

    fn is_applicable(&self, env: &Environment) -> bool {
        is_applicable(self.rules(), env)
    }
}

impl Applicability for Conditional {
    fn rules(&self) -> Option<&Rules> {
        self.rules.as_ref()
    }
}

/// Evaluate a rule list against `env`.
///
/// - No rule list at all: applicable. A `rules` field that is present but
///   `null` or not an array is an empty list, not an absent one.
/// - Otherwise start from "not applicable" and scan clauses in order:
///   - `allow` without an OS scope marks the item applicable and keeps scanning.
///   - `allow` whose OS scope matches returns applicable immediately.
///   - every other action is ignored. `disallow` never excludes anything;
///     exclusion only comes from the absence of a matching `allow`.
pub fn is_applicable(rules: Option<&Rules>, env: &Environment) -> bool {
    let Some(Rules(clauses)) = rules else {
        return true;
    };

    let mut allowed = false;

    for clause in clauses {
        match clause {
            Clause {
                action: RuleAction::Allow,
                os: None,
            } => allowed = true,
            Clause {
                action: RuleAction::Allow,
                os: Some(os),
            } => {
                if os.is_wildcard() {
                    allowed = true;
                } else if os_matches(os, env) {
                    return true;
                }
            }
            Clause {
                action: RuleAction::Disallow | RuleAction::Unknown,
                ..
            } => {}
        }
    }

    allowed
}

fn os_matches(os: &OsCondition, env: &Environment) -> bool {
    let name_matches = os.name.as_deref().map_or(true, |n| n == env.os.as_str());
    let arch_matches = os.arch.as_deref().map_or(true, |a| a == env.arch.as_str());
    name_matches && arch_matches
}
