//! # Collecting Member Records
//!
//! This module drives the lazy member stream of a resolved group and turns
//! raw platform entries into flat [`MemberRecord`]s ready for export. It
//! tolerates per-entry failures (the entry is dropped and enumeration
//! continues), reports progress every ten collected records, and honors the
//! platform's rate-limit signal by waiting out the mandated duration before
//! handing back whatever was collected so far.
//!
//! ## Submodules
//!
//! - **roster**: The enumeration loop.
//! - **types**: The flat member record produced for each entry.

mod roster;
mod types;

pub use roster::collect_members;
pub use types::MemberRecord;
