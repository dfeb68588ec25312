#![warn(clippy::pedantic)]
pub mod errors;
pub mod grammar;
pub mod incremental;
pub mod location;
pub mod nodes;
pub(crate) mod nodes_impl;
pub mod registry;
pub mod timestamp;
pub mod visitor;
