//! Query syntax tree and rendering.
//!
//! A query is a `go :- ...` directive whose body is one expanded template
//! (single-case) or several parenthesized ones (fused). Each expanded template
//! is a [`Fragment`]: literal template text interleaved with conjunctions of
//! structured [`Clause`]s produced from the placeholders.

use std::fmt;

use plgrade_core::{
    CASE_TERMINATOR, ENTRY_DIRECTIVE, FAIL_TOKEN, FIELD_SEPARATOR, PASS_TOKEN,
};

use crate::rename::rename_variables;

/// One conjunct produced from a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// The goal expression, verbatim.
    Goal(String),
    /// `Var=Value`.
    Unify { var: String, value: String },
    /// Prints `label=<value of var>` followed by the field separator.
    Write { label: String, var: String },
}

impl Clause {
    fn rename(&mut self, suffix: &str) {
        match self {
            Clause::Goal(text) => *text = rename_variables(text, suffix),
            Clause::Unify { var, value } => {
                *var = rename_variables(var, suffix);
                *value = rename_variables(value, suffix);
            }
            // The label is printed, so it keeps the name the instructor wrote.
            Clause::Write { var, .. } => *var = rename_variables(var, suffix),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Goal(text) => f.write_str(text),
            Clause::Unify { var, value } => write!(f, "{}={}", var, value),
            Clause::Write { label, var } => write!(
                f,
                "write(\"{}\"),write(\"=\"),write({}),write(\"{}\")",
                label, var, FIELD_SEPARATOR
            ),
        }
    }
}

/// A run of an expanded template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Literal template text.
    Text(String),
    /// Clauses joined by the conjunction operator.
    Conjunction(Vec<Clause>),
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::Text(text) => f.write_str(text),
            Piece::Conjunction(clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", clause)?;
                }
                Ok(())
            }
        }
    }
}

/// One test case's expanded template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub pieces: Vec<Piece>,
}

impl Fragment {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    /// Suffix every variable in the fragment, leaving literals untouched.
    pub fn rename_variables(&mut self, suffix: &str) {
        for piece in &mut self.pieces {
            match piece {
                Piece::Text(text) => *text = rename_variables(text, suffix),
                Piece::Conjunction(clauses) => {
                    for clause in clauses {
                        clause.rename(suffix);
                    }
                }
            }
        }
    }

    /// Make the template's verdict writes end with the case terminator
    /// instead of a newline, so fused records stay separable.
    pub fn terminate_verdicts(&mut self) {
        let rewrites = [PASS_TOKEN, FAIL_TOKEN].map(|token| {
            (
                format!("writeln({})", token),
                format!("write({}),writeln('{}')", token, CASE_TERMINATOR),
            )
        });

        for piece in &mut self.pieces {
            if let Piece::Text(text) = piece {
                for (from, to) in &rewrites {
                    if text.contains(from.as_str()) {
                        *text = text.replace(from.as_str(), to);
                    }
                }
            }
        }
    }

    /// Drop trailing whitespace and a final `.` left by the template, since
    /// the directive supplies its own terminator.
    pub(crate) fn trim_terminator(&mut self) {
        while let Some(Piece::Text(text)) = self.pieces.last_mut() {
            let trimmed = text.trim_end();
            let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed).trim_end();
            if trimmed.is_empty() {
                self.pieces.pop();
                continue;
            }
            *text = trimmed.to_string();
            break;
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            write!(f, "{}", piece)?;
        }
        Ok(())
    }
}

/// A complete query directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    fragments: Vec<Fragment>,
    fused: bool,
}

impl Query {
    pub fn single(fragment: Fragment) -> Self {
        Self {
            fragments: vec![fragment],
            fused: false,
        }
    }

    pub fn fused(fragments: Vec<Fragment>) -> Self {
        Self {
            fragments,
            fused: true,
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_fused(&self) -> bool {
        self.fused
    }

    /// Render the query as evaluator source.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- ", ENTRY_DIRECTIVE)?;
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if self.fused {
                write!(f, "({})", fragment)?;
            } else {
                write!(f, "{}", fragment)?;
            }
        }
        f.write_str(".")
    }
}
