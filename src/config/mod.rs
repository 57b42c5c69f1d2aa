// src/config/mod.rs

//! Argument resolution.
//!
//! - [`model`] holds the validated [`Configuration`].
//! - [`extra_env`] parses the extra environment declarations.
//! - [`resolve`] reads an [`crate::inputs::InputSource`] and produces a
//!   [`Configuration`], failing fast on missing credentials or malformed
//!   flags.

pub mod extra_env;
pub mod model;
pub mod resolve;

pub use model::{Configuration, DEFAULT_CLEVER_CLI};
pub use resolve::resolve;
