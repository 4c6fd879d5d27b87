//! Property-based checks of the partition engine against a flat label model.

mod model;
mod strategies;
mod support;
mod tests;
mod types;
