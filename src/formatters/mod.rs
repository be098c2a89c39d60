//! Formatter implementations

pub mod structured;
pub mod text;

pub use structured::StructuredFormatter;
pub use text::{SortingFunc, TextFormatter};

pub use crate::core::Formatter;
