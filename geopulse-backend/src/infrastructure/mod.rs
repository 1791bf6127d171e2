// src/infrastructure/mod.rs
pub mod geocoding;
