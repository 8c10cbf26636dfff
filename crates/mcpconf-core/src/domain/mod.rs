//! Schema model
//!
//! Canonical shapes for a server entry and a registry of entries.
//! Constructors reject structurally impossible combinations (unknown enum
//! values, a URL group on a stdio transport) with `SchemaError`. Semantically
//! inconsistent but representable entries are accepted and left to the
//! validator.

pub mod placeholder;
mod registry;
mod server;
mod transport;

pub use placeholder::{contains_placeholder, placeholders, Placeholder, PlaceholderKind};
pub use registry::*;
pub use server::*;
pub use transport::*;
