//! Table definitions
pub mod favorites;
pub mod recipes;
