//! Template segmentation.

use plgrade_core::{EXPECTED_PLACEHOLDER, GOAL_PLACEHOLDER, WRITEVAR_PLACEHOLDER};

/// A piece of a template: literal text or one of the placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Goal,
    Expected,
    WriteVar,
}

static PLACEHOLDERS: [(&str, Segment); 3] = [
    (GOAL_PLACEHOLDER, Segment::Goal),
    (EXPECTED_PLACEHOLDER, Segment::Expected),
    (WRITEVAR_PLACEHOLDER, Segment::WriteVar),
];

/// Split a template into text and placeholder segments, in order.
///
/// Empty text runs between adjacent placeholders are not emitted.
pub fn segments(template: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut rest = template;

    loop {
        let next = PLACEHOLDERS
            .iter()
            .filter_map(|(token, seg)| rest.find(token).map(|at| (at, *token, seg)))
            .min_by_key(|(at, _, _)| *at);

        let Some((at, token, seg)) = next else {
            if !rest.is_empty() {
                out.push(Segment::Text(rest.to_string()));
            }
            return out;
        };

        if at > 0 {
            out.push(Segment::Text(rest[..at].to_string()));
        }
        out.push(seg.clone());
        rest = &rest[at + token.len()..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_segments_in_order() {
        let segs = segments("(<GOAL> -> <EXPECTED>), <WRITEVAR>, writeln(pass)");
        assert_eq!(
            segs,
            vec![
                Segment::Text("(".into()),
                Segment::Goal,
                Segment::Text(" -> ".into()),
                Segment::Expected,
                Segment::Text("), ".into()),
                Segment::WriteVar,
                Segment::Text(", writeln(pass)".into()),
            ]
        );
    }

    #[test]
    fn test_adjacent_and_repeated_placeholders() {
        let segs = segments("<GOAL><GOAL>");
        assert_eq!(segs, vec![Segment::Goal, Segment::Goal]);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(segments("true"), vec![Segment::Text("true".into())]);
        assert!(segments("").is_empty());
    }
}
