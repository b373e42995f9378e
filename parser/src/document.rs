//! Line-oriented parsing of a whole test description.

use std::collections::HashSet;
use std::path::Path;

use plgrade_core::{TestCase, TestGroup};

use crate::record::{parse_expected, parse_goal};
use crate::{DslError, DslResult};

const GROUP_PREFIX: &str = "GROUP:";
const GROUP_END_PREFIX: &str = "--";
const COMMENT_PREFIX: &str = "#";

/// Parse a test description into its groups, in order of first appearance.
///
/// A case outside any `GROUP:` block lands in a group named after itself;
/// a case inside one is appended to that group. Reopening a group name
/// appends to the existing group.
pub fn parse_tests(source: &str) -> DslResult<Vec<TestGroup>> {
    let mut groups: Vec<TestGroup> = Vec::new();
    let mut names: HashSet<String> = HashSet::new();
    let mut open_group: Option<String> = None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        if let Some(rest) = line.strip_prefix(GROUP_PREFIX) {
            let name = rest.trim();
            if name.is_empty() {
                return Err(DslError::EmptyGroupName { line: line_no });
            }
            open_group = Some(name.to_string());
            continue;
        }

        if line.starts_with(GROUP_END_PREFIX) {
            open_group = None;
            continue;
        }

        let case = parse_record(line, line_no)?;
        if !names.insert(case.name.clone()) {
            return Err(DslError::duplicate_name(line_no, case.name));
        }

        let group_name = open_group.clone().unwrap_or_else(|| case.name.clone());
        match groups.iter_mut().find(|g| g.name == group_name) {
            Some(group) => group.cases.push(case),
            None => {
                let mut group = TestGroup::new(group_name);
                group.cases.push(case);
                groups.push(group);
            }
        }
    }

    Ok(groups)
}

/// Load and parse a test description from disk.
pub fn load_tests(path: &Path) -> DslResult<Vec<TestGroup>> {
    let bytes = std::fs::read(path).map_err(|source| DslError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = String::from_utf8_lossy(&bytes);
    parse_tests(&source).map_err(|e| DslError::in_file(path, e))
}

fn parse_record(line: &str, line_no: usize) -> DslResult<TestCase> {
    // Fields may be padded with extra tabs for alignment.
    let fields: Vec<&str> = line
        .split('\t')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    let [name, goal, test_type, expected] = fields[..] else {
        return Err(DslError::field_count(line_no, fields.len()));
    };

    let goal = parse_goal(goal);
    let expected = parse_expected(expected, &goal, name, line_no)?;

    Ok(TestCase::new(name, test_type, goal, expected))
}
