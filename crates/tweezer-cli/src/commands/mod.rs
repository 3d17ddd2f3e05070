//! CLI command implementations.

pub mod common;
pub mod compile;
pub mod encode;
pub mod extract;
pub mod schedule;
pub mod version;
