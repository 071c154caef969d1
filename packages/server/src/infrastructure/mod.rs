//! Infrastructure layer: wire DTOs and the concrete registry.

pub mod dto;
pub mod registry;

pub use registry::InMemoryClientRegistry;
