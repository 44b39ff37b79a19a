use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// A group or channel resolved from a user-supplied reference.
///
/// Carries only what the rest of the pipeline needs: the numeric identifier
/// used for member enumeration and the display title used to label records
/// and name the output file.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupEntity {
    /// Platform-assigned numeric identifier of the group.
    pub id: i64,
    /// Human-readable group title (e.g., "Rust Meetup Kyiv").
    pub title: String,
}

/// A raw member entry as produced by the platform during enumeration.
///
/// Optional fields are frequently absent on real platforms (hidden phone
/// numbers, accounts without a username), so everything besides the id and
/// the bot flag is optional at the wire level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberEntry {
    /// Platform-assigned numeric identifier of the member.
    pub id: i64,
    /// Member's first name, if set.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Member's last name, if set.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Member's public handle without any prefix, if set.
    #[serde(default)]
    pub username: Option<String>,
    /// Member's phone number, if visible to the session.
    #[serde(default)]
    pub phone: Option<String>,
    /// Whether the member is a bot account.
    #[serde(default)]
    pub bot: bool,
}

/// Errors a membership source can surface to the pipeline.
///
/// The variants map one-to-one onto the conditions the run orchestration
/// must distinguish: unresolvable or inaccessible groups end the run before
/// enumeration, a rate-limit signal carries the mandated wait duration, and
/// everything else ends the current stage with partial results. Third-party
/// client types are not exposed; transport failures are carried as text.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The group reference did not resolve to any entity.
    #[error("group not found: {0}")]
    NotFound(String),

    /// The group exists but is private or otherwise inaccessible.
    #[error("group is private or access is denied")]
    AccessDenied,

    /// The platform imposed a rate limit and mandates a wait.
    #[error("rate limited by the platform, must wait {}s", wait.as_secs())]
    RateLimited {
        /// Duration the platform requires the session to pause.
        wait: Duration,
    },

    /// Session start or verification failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Network-level failure talking to the platform.
    #[error("transport error: {0}")]
    Transport(String),

    /// The platform answered with something the adapter cannot interpret.
    #[error("unexpected platform response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_entry_tolerates_missing_fields() {
        let entry: MemberEntry = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(entry.id, 42);
        assert!(entry.first_name.is_none());
        assert!(entry.username.is_none());
        assert!(!entry.bot);
    }

    #[test]
    fn test_rate_limited_display_carries_seconds() {
        let err = SourceError::RateLimited {
            wait: Duration::from_secs(5),
        };
        assert!(err.to_string().contains("5s"));
    }
}
