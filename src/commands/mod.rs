pub mod diff;
pub mod json;
