//! Core data types.

pub mod item;
