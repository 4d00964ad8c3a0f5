//! CLI library components for the NTM extraction pipeline.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
