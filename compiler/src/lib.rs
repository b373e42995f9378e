//! plgrade Query Compiler
//!
//! Turns test cases into queries the evaluator can consult.
//!
//! Responsibilities:
//! - Split templates into text and placeholder segments
//! - Expand placeholders into structured conjuncts (goal, unifications, writes)
//! - Fuse many cases into one query, suffixing every variable per case
//! - Render the query as a single `go :- ...` directive

mod error;
mod query;
mod rename;
mod synth;
mod template;

pub use error::{SynthesisError, SynthesisResult};
pub use query::{Clause, Fragment, Piece, Query};
pub use rename::{rename_variables, variable_suffix};
pub use synth::Synthesizer;
pub use template::{segments, Segment};
