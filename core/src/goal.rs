//! Goals and expected bindings.

use std::fmt;

/// A goal expression plus the test variables declared inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    /// The goal text with every `<TVAR:Name>` marker replaced by `Name`.
    pub text: String,
    /// Declared variables in first-seen order, without duplicates.
    pub vars: Vec<String>,
}

impl Goal {
    pub fn new(text: impl Into<String>, vars: Vec<String>) -> Self {
        Self {
            text: text.into(),
            vars,
        }
    }

    /// Returns true if `name` was declared as a test variable.
    pub fn has_var(&self, name: &str) -> bool {
        self.vars.iter().any(|v| v == name)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Expected values keyed by variable name, in declaration order.
///
/// Re-declaring a variable replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expected {
    entries: Vec<(String, String)>,
}

impl Expected {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the expected value for `var`.
    pub fn insert(&mut self, var: impl Into<String>, value: impl Into<String>) {
        let var = var.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == var) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((var, value)),
        }
    }

    pub fn get(&self, var: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == var)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn vars(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Expected {
    /// Renders as `Var=Value` pairs joined by commas.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (var, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", var, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Expected {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut expected = Expected::new();
        for (k, v) in iter {
            expected.insert(k, v);
        }
        expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_keeps_first_position_on_redeclare() {
        let mut expected = Expected::new();
        expected.insert("X", "1");
        expected.insert("Y", "2");
        expected.insert("X", "3");

        let pairs: Vec<_> = expected.iter().collect();
        assert_eq!(pairs, vec![("X", "3"), ("Y", "2")]);
        assert_eq!(expected.len(), 2);
    }

    #[test]
    fn test_expected_display() {
        let expected: Expected = [("X", "5"), ("Result", "[a,b]")].into_iter().collect();
        assert_eq!(expected.to_string(), "X=5,Result=[a,b]");
        assert_eq!(Expected::new().to_string(), "");
    }

    #[test]
    fn test_goal_has_var() {
        let goal = Goal::new("member(X, [1,2])", vec!["X".into()]);
        assert!(goal.has_var("X"));
        assert!(!goal.has_var("Y"));
        assert_eq!(goal.to_string(), "member(X, [1,2])");
    }
}
