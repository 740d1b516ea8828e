//! Profile editing and form validation

mod editor;
mod validation;

pub use editor::*;
pub use validation::*;
