//! plgrade Evaluator Adapter
//!
//! Runs synthesized queries through an external logic-program evaluator and
//! decodes what it prints.
//!
//! - `goal`: the start goal that consults every scratch file in order
//! - `process`: subprocess invocation with a wall-clock timeout
//! - `output`: record decoding and stderr classification

mod config;
mod error;
mod goal;
mod output;
mod process;

pub use config::EvaluatorConfig;
pub use error::{EvaluatorError, EvaluatorResult, RunFailure};
pub use goal::{
    build_goal, check_goal, query_file, COMPOSED_FILE, DATABASE_FILE, KNOWLEDGE_FILE, PRE_FILE,
};
pub use output::{decode_composed, decode_single, error_diagnostic, has_error, split_cases, Record};
pub use process::{run_process, Evaluator, Purpose, RawOutput, SwiProlog};
