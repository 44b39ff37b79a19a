//! # Membership Sources
//!
//! This module defines the capability interface the pipeline uses to talk to
//! a messaging platform: starting an authenticated session, resolving a group
//! reference to a concrete entity, and lazily enumerating the group's member
//! list. The concrete platform is swappable; the shipped implementation talks
//! to an HTTP platform gateway.
//!
//! ## Submodules
//!
//! - **traits**: The `MembershipSource` capability interface and the lazy
//!   member stream type.
//! - **types**: Wire-level data structures and the source error taxonomy.
//! - **gateway**: An HTTP gateway implementation of `MembershipSource`.

mod gateway;
mod traits;
mod types;

pub use gateway::{GatewaySource, DEFAULT_GATEWAY_URL};
pub use traits::{MemberStream, MembershipSource};
pub use types::{GroupEntity, MemberEntry, SourceError};
