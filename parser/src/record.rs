//! Goal and expected-field parsing for a single test record.

use std::sync::OnceLock;

use plgrade_core::{Expected, Goal, FIELD_SEPARATOR, RESULT_VAR};
use regex_lite::Regex;

use crate::{DslError, DslResult};

fn tvar_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<TVAR:([A-Z]\w*)>").expect("static TVAR pattern"))
}

/// Parse a goal expression, replacing every `<TVAR:Name>` with `Name`.
///
/// Repeated declarations of the same variable are recorded once, at the
/// position of their first occurrence.
pub fn parse_goal(source: &str) -> Goal {
    let pattern = tvar_pattern();

    let mut vars: Vec<String> = Vec::new();
    for caps in pattern.captures_iter(source) {
        let name = &caps[1];
        if !vars.iter().any(|v| v == name) {
            vars.push(name.to_string());
        }
    }

    let text = pattern.replace_all(source, "$1").into_owned();
    Goal::new(text, vars)
}

/// Parse an expected specification (`Var=Value|:|Var=Value|:|`) and check
/// every variable against the goal.
pub fn parse_expected(source: &str, goal: &Goal, test: &str, line: usize) -> DslResult<Expected> {
    let mut expected = Expected::new();

    for entry in source.split(FIELD_SEPARATOR).map(str::trim) {
        if entry.is_empty() {
            continue;
        }

        let (var, value) = entry
            .split_once('=')
            .ok_or_else(|| DslError::malformed_expected(line, test, entry))?;
        let var = var.trim();

        if !var.chars().next().is_some_and(char::is_uppercase) {
            return Err(DslError::lowercase_variable(line, test, var));
        }
        if var != RESULT_VAR && !goal.has_var(var) {
            return Err(DslError::unbound_variable(line, test, var));
        }

        expected.insert(var, value);
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_goal_markers_replaced() {
        let goal = parse_goal("append(<TVAR:L1>, [c], <TVAR:Out>)");
        assert_eq!(goal.text, "append(L1, [c], Out)");
        assert_eq!(goal.vars, vec!["L1", "Out"]);
    }

    #[test]
    fn test_goal_repeated_marker_deduplicated() {
        let goal = parse_goal("p(<TVAR:X>), q(<TVAR:Y>, <TVAR:X>)");
        assert_eq!(goal.text, "p(X), q(Y, X)");
        assert_eq!(goal.vars, vec!["X", "Y"]);
    }

    #[test]
    fn test_goal_lowercase_marker_left_alone() {
        let goal = parse_goal("p(<TVAR:x>)");
        assert_eq!(goal.text, "p(<TVAR:x>)");
        assert!(goal.vars.is_empty());
    }

    #[test]
    fn test_expected_pairs_in_order() {
        let goal = parse_goal("p(<TVAR:X>, <TVAR:Y>)");
        let expected = parse_expected("Y=[a,b]|:|X=f(1=2)|:|", &goal, "t", 1).unwrap();
        let pairs: Vec<_> = expected.iter().collect();
        assert_eq!(pairs, vec![("Y", "[a,b]"), ("X", "f(1=2)")]);
    }

    #[test]
    fn test_expected_result_sentinel_allowed() {
        let goal = parse_goal("p");
        let expected = parse_expected("Result=yes", &goal, "t", 1).unwrap();
        assert_eq!(expected.get("Result"), Some("yes"));
    }

    #[test]
    fn test_expected_unbound_variable() {
        let goal = parse_goal("p(<TVAR:X>)");
        let err = parse_expected("Z=1|:|", &goal, "t", 7).unwrap_err();
        assert!(matches!(err, DslError::UnboundVariable { line: 7, ref var, .. } if var == "Z"));
    }

    #[test]
    fn test_expected_lowercase_variable() {
        let goal = parse_goal("p(<TVAR:X>)");
        let err = parse_expected("x=1|:|", &goal, "t", 2).unwrap_err();
        assert!(matches!(err, DslError::LowercaseVariable { .. }));
    }

    #[test]
    fn test_expected_missing_equals() {
        let goal = parse_goal("p(<TVAR:X>)");
        let err = parse_expected("X|:|", &goal, "t", 3).unwrap_err();
        assert!(matches!(err, DslError::MalformedExpected { .. }));
    }
}
