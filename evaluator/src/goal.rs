//! Start-goal construction.
//!
//! The evaluator runs inside the scratch directory, so every consulted file
//! is referenced by its bare name.

use plgrade_core::ENTRY_DIRECTIVE;

/// Pre-knowledge, consulted before the candidate knowledge.
pub const PRE_FILE: &str = "pre.temp";
/// The candidate knowledge.
pub const KNOWLEDGE_FILE: &str = "knowledge.temp";
/// Database consulted after retraction.
pub const DATABASE_FILE: &str = "database.temp";
/// Fused query for all cases of an exercise.
pub const COMPOSED_FILE: &str = "composed.temp";

const QUERY_FILE_PREFIX: &str = "query_";

/// Scratch file holding the single-case query for `test_type`.
///
/// The prefix keeps a type named like another scratch file (`knowledge`,
/// `composed`, ...) from overwriting it.
pub fn query_file(test_type: &str) -> String {
    format!("{}{}.temp", QUERY_FILE_PREFIX, test_type)
}

/// Compose the start goal in its fixed order: pre-knowledge, candidate
/// knowledge, retractions, database, query file, entry directive.
pub fn build_goal(query_file: &str, abolish: &[String], has_pre: bool, has_database: bool) -> String {
    let mut conjuncts = Vec::with_capacity(abolish.len() + 5);

    if has_pre {
        conjuncts.push(consult(PRE_FILE));
    }
    conjuncts.push(consult(KNOWLEDGE_FILE));
    conjuncts.extend(abolish.iter().map(|pi| format!("abolish({})", pi)));
    if has_database {
        conjuncts.push(consult(DATABASE_FILE));
    }
    conjuncts.push(consult(query_file));
    conjuncts.push(ENTRY_DIRECTIVE.to_string());

    conjuncts.join(",")
}

/// Goal that only loads the candidate knowledge, to catch syntax errors.
pub fn check_goal() -> String {
    consult(KNOWLEDGE_FILE)
}

fn consult(file: &str) -> String {
    format!("consult(\"{}\")", file)
}
