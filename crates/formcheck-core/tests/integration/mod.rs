//! End-to-end analyzer and session scenarios over synthetic side-view poses.

pub mod analyzer_tests;
pub mod poses;
pub mod session_tests;
