//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence and default tests
//! - `field_resolution`: Token, repository, and naming resolution tests

mod helpers;
