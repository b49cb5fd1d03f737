//! Integration tests for `panegrid-core`

mod persistence_tests;
mod runtime_tests;
mod scenario_tests;
mod workspace_tests;
