// src/core/mod.rs

pub mod emission;
pub mod engine;
pub mod error;
pub mod transition;
pub mod types;
