//! The capability interface between the pipeline and a concrete platform.
//!
//! The run orchestration only ever talks to a [`MembershipSource`], so the
//! concrete platform adapter can be swapped for a scripted source in tests.

use super::types::{GroupEntity, MemberEntry, SourceError};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// A lazy sequence of raw member entries.
///
/// Items are yielded in the order the platform reports them. An `Err` item
/// ends enumeration; in particular [`SourceError::RateLimited`] carries the
/// wait duration the platform mandates before any further requests.
pub type MemberStream<'a> =
    Pin<Box<dyn Stream<Item = Result<MemberEntry, SourceError>> + Send + 'a>>;

/// A platform capable of resolving groups and enumerating their members.
///
/// Implementations own the session lifecycle: `connect` is called once at
/// the start of a run and `disconnect` once at the end, on every exit path.
#[async_trait]
pub trait MembershipSource: Send + Sync {
    /// Establish an authenticated session with the platform.
    ///
    /// Implementations may prompt interactively for a verification code if
    /// the platform requires one to complete the sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be started or verified.
    async fn connect(&mut self) -> Result<(), SourceError>;

    /// Resolve a group reference (URL or handle) to a concrete entity.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] if the reference does not resolve
    /// and [`SourceError::AccessDenied`] if the group is private.
    async fn resolve(&self, reference: &str) -> Result<GroupEntity, SourceError>;

    /// Lazily enumerate the members of a resolved group.
    ///
    /// Uses the platform's exhaustive enumeration strategy where one is
    /// available, so large groups are paged through completely.
    fn members<'a>(&'a self, group: &'a GroupEntity) -> MemberStream<'a>;

    /// Release the platform session.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the shutdown request; the
    /// run treats this as non-fatal.
    async fn disconnect(&mut self) -> Result<(), SourceError>;
}
