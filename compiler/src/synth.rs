//! Single-case and fused query synthesis.

use plgrade_core::TestCase;
use plgrade_registry::TemplateRegistry;
use tracing::{debug, warn};

use crate::query::{Clause, Fragment, Piece, Query};
use crate::rename::variable_suffix;
use crate::template::{segments, Segment};
use crate::{SynthesisError, SynthesisResult};

/// Compiles test cases against a template registry.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'r> {
    templates: &'r TemplateRegistry,
}

impl<'r> Synthesizer<'r> {
    pub fn new(templates: &'r TemplateRegistry) -> Self {
        Self { templates }
    }

    /// Expand the case's template into a fragment.
    pub fn expand(&self, case: &TestCase) -> SynthesisResult<Fragment> {
        let template = self
            .templates
            .get(&case.test_type)
            .ok_or_else(|| SynthesisError::template_missing(&case.name, &case.test_type))?;

        let segs = segments(template);
        if !segs.contains(&Segment::Goal) {
            warn!(
                "Template '{}' has no <GOAL> placeholder; test '{}' never runs its goal",
                case.test_type, case.name
            );
        }

        let pieces = segs
            .into_iter()
            .map(|seg| match seg {
                Segment::Text(text) => Piece::Text(text),
                Segment::Goal => Piece::Conjunction(vec![Clause::Goal(case.goal.text.clone())]),
                Segment::Expected => Piece::Conjunction(
                    case.expected
                        .iter()
                        .map(|(var, value)| Clause::Unify {
                            var: var.to_string(),
                            value: value.to_string(),
                        })
                        .collect(),
                ),
                Segment::WriteVar => {
                    let mut clauses = vec![Clause::Goal(case.goal.text.clone())];
                    clauses.extend(case.expected.vars().map(|var| Clause::Write {
                        label: var.to_string(),
                        var: var.to_string(),
                    }));
                    Piece::Conjunction(clauses)
                }
            })
            .collect();

        let mut fragment = Fragment::new(pieces);
        fragment.trim_terminator();
        Ok(fragment)
    }

    /// Compile one case into a stand-alone query.
    pub fn synthesize(&self, case: &TestCase) -> SynthesisResult<Query> {
        Ok(Query::single(self.expand(case)?))
    }

    /// Fuse every case into one query.
    ///
    /// Each case's verdict writes end with the case terminator and each
    /// case's variables carry a suffix derived from its name. A single
    /// missing template fails the whole composition.
    pub fn synthesize_composed<'c>(
        &self,
        cases: impl IntoIterator<Item = &'c TestCase>,
    ) -> SynthesisResult<Query> {
        let mut fragments = Vec::new();
        for case in cases {
            let mut fragment = self.expand(case)?;
            fragment.terminate_verdicts();
            fragment.rename_variables(&variable_suffix(&case.name));
            fragments.push(fragment);
        }

        if fragments.is_empty() {
            return Err(SynthesisError::NothingToCompose);
        }

        debug!("Composed query from {} test cases", fragments.len());
        Ok(Query::fused(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plgrade_parser::parse_tests;
    use pretty_assertions::assert_eq;

    const UNIFY: &str =
        "(<GOAL> -> (<EXPECTED> -> <WRITEVAR>,writeln(pass) ; <WRITEVAR>,writeln(fail)) ; writeln(fail))";

    fn cases(source: &str) -> Vec<TestCase> {
        parse_tests(source)
            .unwrap()
            .into_iter()
            .flat_map(|g| g.cases)
            .collect()
    }

    #[test]
    fn test_single_case_query() {
        let registry = TemplateRegistry::new().with("type1", "<GOAL>,<EXPECTED>,<WRITEVAR>.");
        let case = &cases("t1\t<TVAR:X>\ttype1\tX=5|:|")[0];

        let query = Synthesizer::new(&registry).synthesize(case).unwrap();

        assert!(!query.is_fused());
        assert_eq!(
            query.render(),
            r#"go :- X,X=5,X,write("X"),write("="),write(X),write("|:|")."#
        );
    }

    #[test]
    fn test_expected_order_and_result_channel() {
        let registry = TemplateRegistry::new().with("agg", "<GOAL>,<EXPECTED>,<WRITEVAR>");
        let case = &cases("t\tq(<TVAR:A>, <TVAR:B>, Result)\tagg\tB=2|:|A=1|:|Result=ok|:|")[0];

        let rendered = Synthesizer::new(&registry).synthesize(case).unwrap().render();

        assert!(rendered.starts_with("go :- q(A, B, Result),B=2,A=1,Result=ok,q(A, B, Result),"));
        let labels: Vec<_> = rendered.match_indices("write(\"").map(|(i, _)| &rendered[i + 7..i + 8]).collect();
        assert_eq!(labels, vec!["B", "=", "|", "A", "=", "|", "R", "=", "|"]);
    }

    #[test]
    fn test_missing_template() {
        let registry = TemplateRegistry::new();
        let case = &cases("t1\tp\tnope\tResult=1")[0];
        let err = Synthesizer::new(&registry).synthesize(case).unwrap_err();
        assert!(matches!(err, SynthesisError::TemplateMissing { ref test_type, .. } if test_type == "nope"));
    }

    #[test]
    fn test_composed_renames_per_case() {
        let registry = TemplateRegistry::new().with("unify", UNIFY);
        let all = cases("t1\tp(<TVAR:Y>)\tunify\tY=1|:|\nt2\tq(<TVAR:Y>)\tunify\tY=2|:|\n");

        let query = Synthesizer::new(&registry).synthesize_composed(&all).unwrap();
        let rendered = query.render();

        assert!(query.is_fused());
        assert_eq!(query.fragments().len(), 2);
        assert!(rendered.starts_with("go :- ((p(Y_T1) -> (Y_T1=1 -> p(Y_T1),"));
        assert!(rendered.contains("),((q(Y_T2) -> (Y_T2=2 -> q(Y_T2),"));
        assert!(rendered.contains(r#"write("Y"),write("="),write(Y_T1)"#));
        assert!(rendered.contains(r#"write("Y"),write("="),write(Y_T2)"#));
        assert!(!rendered.contains("Y_T1_T"));
        assert!(!rendered.contains("writeln(pass)"));
        assert_eq!(rendered.matches("write(pass),writeln('||||')").count(), 2);
        assert!(rendered.ends_with("))."));
    }

    #[test]
    fn test_composed_fails_on_any_missing_template() {
        let registry = TemplateRegistry::new().with("unify", UNIFY);
        let all = cases("t1\tp(<TVAR:Y>)\tunify\tY=1|:|\nt2\tq\tmissing\tResult=2|:|\n");

        let err = Synthesizer::new(&registry).synthesize_composed(&all).unwrap_err();
        assert!(matches!(err, SynthesisError::TemplateMissing { ref test, .. } if test == "t2"));
    }

    #[test]
    fn test_composed_requires_cases() {
        let registry = TemplateRegistry::new();
        let err = Synthesizer::new(&registry)
            .synthesize_composed(std::iter::empty())
            .unwrap_err();
        assert!(matches!(err, SynthesisError::NothingToCompose));
    }
}
