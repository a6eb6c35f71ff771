pub mod environment;
pub mod evaluator;
pub mod model;

pub use environment::{Arch, Environment, OsName};
pub use evaluator::{is_applicable, Applicability};
pub use model::{present_rules, Clause, Conditional, OsCondition, RuleAction, Rules};
