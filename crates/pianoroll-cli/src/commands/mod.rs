//! CLI command implementations.

pub mod common;
pub mod copy_pattern;
pub mod edit;
pub mod geometry;
pub mod inspect;
pub mod models;
pub mod new;
pub mod render;
