//! Integration test suite for row blocks.
//!
//! 1. Scenarios over small hand-built blocks
//! 2. Randomized gathers checked against a row model
//! 3. Concurrent use of shared blocks

pub mod concurrency_tests;
pub mod helpers;
pub mod randomized_gather_tests;
pub mod scenario_tests;
