//! Foundation types for flowmap.
//!
//! This crate contains the platform-agnostic types shared by all flowmap
//! crates: input events, geometry, languages and localized text,
//! configuration, and error types.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod text;
