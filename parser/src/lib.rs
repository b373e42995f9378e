//! plgrade Test Description Parser
//!
//! This crate parses the line-oriented test description language:
//! - `#` comments and blank lines
//! - `GROUP: name` ... `--` blocks declaring optional groups
//! - tab-separated `name  goal  type  expected` records
//! - `<TVAR:Name>` test-variable markers inside goals
//! - `Var=Value|:|Var=Value|:|` expected specifications

mod document;
mod error;
mod record;

pub use document::{load_tests, parse_tests};
pub use error::*;
pub use record::{parse_expected, parse_goal};
