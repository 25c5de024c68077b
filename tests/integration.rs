//! Integration test suite for end-to-end scenarios.

#[path = "integration/cli_smoke.rs"]
mod cli_smoke;
#[path = "integration/end_to_end.rs"]
mod end_to_end;
