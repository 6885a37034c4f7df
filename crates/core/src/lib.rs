//! carve-core
//!
//! Core library for structural decomposition of flash firmware dumps.
//!
//! This crate locates every region inside an opaque dump by structural
//! signature (fixed-offset sectors, firmware magics, DER certificates, the
//! packed http file table), resolves each region's extent from neighbor
//! boundaries or self-described lengths, applies schema-specific payload
//! transforms, optionally verifies payloads against known-good references,
//! and renders a textual layout descriptor.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, Python bindings, etc.).

pub mod decompose;
pub mod error;
pub mod image;
pub mod layout;
pub mod locator;
pub mod model;
pub mod profile;
pub mod sizer;
pub mod transform;
pub mod verify;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
