//! Declarative macros shared across the crate.

pub mod deserialization;
