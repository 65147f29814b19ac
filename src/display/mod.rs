//! Formatting and rendering of dashboard payloads into text fragments.

pub mod detail;
pub mod formatters;
pub mod render;

pub use detail::*;
pub use formatters::*;
pub use render::*;
