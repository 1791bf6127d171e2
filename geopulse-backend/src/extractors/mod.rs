// src/extractors/mod.rs
pub mod id;
pub mod uuid;

pub use self::id::ValidatedId;
pub use self::uuid::ValidatedUuid;
