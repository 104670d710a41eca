//! Core types: errors, registries, workspace context, git plumbing

pub mod context;
pub mod error;
pub mod registry;
pub mod vcs;
