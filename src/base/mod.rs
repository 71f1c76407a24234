//! Foundation types shared by every other module.
//!
//! - [`FileId`] - opaque file handles
//! - [`TextRange`], [`TextSize`] - source offsets
//! - [`LineCol`], [`LineIndex`] - line/column conversion
//!
//! This module has NO dependencies on other modules of the crate.

mod file_id;
mod span;

pub use file_id::FileId;
pub use span::{LineCol, LineIndex, TextRange, TextSize};
