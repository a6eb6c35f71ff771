// ─── Rule Model ───
// Typed view of the `rules` arrays found on libraries and arguments.
//
// Conversion from JSON is total: anything that does not look like a
// well-formed clause becomes an inert clause instead of a parse error, so a
// single odd rule never rejects a whole version JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// What a clause asks for when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Allow,
    Disallow,
    /// Missing, misspelled or non-string action.
    Unknown,
}

impl RuleAction {
    fn from_json(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("allow") => RuleAction::Allow,
            Some("disallow") => RuleAction::Disallow,
            _ => RuleAction::Unknown,
        }
    }
}

/// OS scope of a clause. `None` fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsCondition {
    pub name: Option<String>,
    pub arch: Option<String>,
}

impl OsCondition {
    /// True when the condition constrains neither name nor arch.
    pub fn is_wildcard(&self) -> bool {
        self.name.is_none() && self.arch.is_none()
    }
}

/// One `{ "action": ..., "os": { ... } }` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct Clause {
    pub action: RuleAction,
    pub os: Option<OsCondition>,
}

impl Clause {
    #[cfg(test)]
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
        }
    }

    #[cfg(test)]
    pub fn with_os(mut self, name: Option<&str>, arch: Option<&str>) -> Self {
        self.os = Some(OsCondition {
            name: name.map(str::to_owned),
            arch: arch.map(str::to_owned),
        });
        self
    }

    fn inert() -> Self {
        Self {
            action: RuleAction::Unknown,
            os: None,
        }
    }
}

impl From<Value> for Clause {
    fn from(value: Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Clause::inert();
        };

        let os = match obj.get("os") {
            None | Some(Value::Null) => None,
            Some(Value::Object(os)) => {
                let field = |key: &str| match os.get(key) {
                    None | Some(Value::Null) => Ok(None),
                    Some(Value::String(s)) => Ok(Some(s.clone())),
                    Some(_) => Err(()),
                };
                match (field("name"), field("arch")) {
                    (Ok(name), Ok(arch)) => Some(OsCondition { name, arch }),
                    _ => return Clause::inert(),
                }
            }
            Some(_) => return Clause::inert(),
        };

        Clause {
            action: RuleAction::from_json(obj.get("action")),
            os,
        }
    }
}

/// Ordered clause list. A `rules` value that is not an array is read as an
/// empty list, which never grants applicability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct Rules(pub Vec<Clause>);

impl From<Value> for Rules {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Rules(items.into_iter().map(Clause::from).collect()),
            _ => Rules::default(),
        }
    }
}

/// `deserialize_with` helper for `rules` fields. Only a missing field is
/// `None`; any present value, `null` included, becomes a rule list.
/// Pair with `#[serde(default)]`.
pub fn present_rules<'de, D>(deserializer: D) -> Result<Option<Rules>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| Some(Rules::from(value)))
}

/// Any JSON object that may carry a `rules` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Conditional {
    #[serde(default, deserialize_with = "present_rules")]
    pub rules: Option<Rules>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clause_parses_action_and_os() {
        let clause: Clause =
            serde_json::from_value(json!({"action": "allow", "os": {"name": "osx"}})).unwrap();
        assert_eq!(clause, Clause::allow().with_os(Some("osx"), None));
    }

    #[test]
    fn malformed_clauses_become_inert() {
        for raw in [
            json!("allow"),
            json!({"os": {"name": "linux"}}),
            json!({"action": 1}),
            json!({"action": "allow", "os": {"name": 7}}),
            json!({"action": "allow", "os": "linux"}),
        ] {
            let clause: Clause = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(clause.action, RuleAction::Unknown, "input: {raw}");
        }
    }

    #[test]
    fn non_array_rules_are_empty() {
        let parsed: Conditional = serde_json::from_value(json!({"rules": 5})).unwrap();
        assert_eq!(parsed.rules, Some(Rules::default()));
    }

    #[test]
    fn null_rules_are_present_and_empty() {
        let parsed: Conditional = serde_json::from_value(json!({"rules": null})).unwrap();
        assert_eq!(parsed.rules, Some(Rules::default()));
    }

    #[test]
    fn missing_rules_field_stays_absent() {
        let parsed: Conditional = serde_json::from_value(json!({"name": "a:b:1"})).unwrap();
        assert!(parsed.rules.is_none());
    }
}
