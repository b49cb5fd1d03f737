//! Property-based tests for `panegrid-core`

mod layout_tests;
mod registry_tests;
mod stream_tests;
mod tool_call_tests;
