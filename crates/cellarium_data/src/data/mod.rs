//! Core value types shared by the cellarium crates.

pub mod color;
pub mod position;
