//! Test groups and per-exercise test suites.

use crate::TestCase;

/// A named, ordered cluster of test cases.
///
/// Any single passing case credits the whole group. A case declared outside
/// of a `GROUP:` block forms a singleton group named after itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TestGroup {
    pub name: String,
    pub cases: Vec<TestCase>,
}

impl TestGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Number of cases whose last verdict was `pass`.
    pub fn score(&self) -> usize {
        self.cases.iter().filter(|c| c.success.is_pass()).count()
    }

    pub fn is_passing(&self) -> bool {
        self.score() > 0
    }

    /// Groups with more than one member are rendered with a banner in reports.
    pub fn is_optional(&self) -> bool {
        self.cases.len() > 1
    }
}

/// Everything needed to grade one exercise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Test {
    /// Groups in order of first appearance in the test description.
    pub groups: Vec<TestGroup>,
    /// Knowledge consulted before the candidate knowledge.
    pub pre: String,
    /// Predicate indicators retracted after loading the candidate knowledge.
    pub abolish: Vec<String>,
    /// Knowledge consulted after retraction.
    pub database: String,
}

impl Test {
    pub fn new(groups: Vec<TestGroup>) -> Self {
        Self {
            groups,
            ..Self::default()
        }
    }

    pub fn with_pre(mut self, pre: impl Into<String>) -> Self {
        self.pre = pre.into();
        self
    }

    pub fn with_abolish(mut self, abolish: Vec<String>) -> Self {
        self.abolish = abolish;
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn group(&self, name: &str) -> Option<&TestGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// All cases in declaration order.
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> {
        self.groups.iter().flat_map(|g| g.cases.iter())
    }

    pub fn cases_mut(&mut self) -> impl Iterator<Item = &mut TestCase> {
        self.groups.iter_mut().flat_map(|g| g.cases.iter_mut())
    }

    pub fn case_count(&self) -> usize {
        self.groups.iter().map(|g| g.cases.len()).sum()
    }

    pub fn has_pre(&self) -> bool {
        !self.pre.is_empty()
    }

    pub fn has_database(&self) -> bool {
        !self.database.is_empty()
    }

    /// Reset the scratch fields of every case.
    pub fn reset(&mut self) {
        for case in self.cases_mut() {
            case.reset();
        }
    }

    /// True when every group has at least one passing case.
    pub fn is_passing(&self) -> bool {
        self.groups.iter().all(TestGroup::is_passing)
    }
}
