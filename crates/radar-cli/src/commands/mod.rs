//! CLI command handlers

pub mod check;
pub mod filter;
pub mod submit;
