//! plgrade Core Types
//!
//! This crate provides the data model shared by every grader component:
//! - Goals and their declared test variables
//! - Test cases, optional test groups and per-exercise test suites
//! - Student submissions (assignments)
//! - Wire protocol constants shared by the query synthesizer and result parser

mod assignment;
mod case;
mod goal;
mod protocol;
mod suite;

pub use assignment::*;
pub use case::*;
pub use goal::*;
pub use protocol::*;
pub use suite::*;
