use crate::source::MemberEntry;
use anyhow::{bail, Result as AnyhowResult};
use chrono::Local;

/// Timestamp format recorded on each collected member.
const CAPTURE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A flat, export-ready member record.
///
/// One record is produced per successfully processed member entry. Records
/// are immutable once built and kept in encounter order for the duration of
/// the run; they exist only to be written out by the export stage.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    /// Title of the group the member belongs to.
    pub group: String,
    /// Platform-assigned numeric identifier.
    pub id: i64,
    /// First name, empty when not set.
    pub first_name: String,
    /// Last name, empty when not set.
    pub last_name: String,
    /// Handle formatted as `@username`, empty when not set.
    pub username: String,
    /// Phone number, empty when hidden or not set.
    pub phone: String,
    /// Whether the member is a bot account.
    pub bot: bool,
    /// Capture timestamp, formatted as `YYYY-MM-DD HH:MM`.
    pub captured_at: String,
}

impl MemberRecord {
    /// Builds a record from a raw platform entry.
    ///
    /// # Arguments
    ///
    /// * `group_title` - Title of the resolved group, copied onto the record.
    /// * `entry` - The raw member entry yielded during enumeration.
    ///
    /// # Errors
    ///
    /// Returns an error for entries without a usable id; the caller logs and
    /// skips those, and enumeration proceeds.
    pub fn from_entry(group_title: &str, entry: &MemberEntry) -> AnyhowResult<Self> {
        if entry.id <= 0 {
            bail!("member entry has no usable id ({})", entry.id);
        }
        Ok(Self {
            group: group_title.to_string(),
            id: entry.id,
            first_name: entry.first_name.clone().unwrap_or_default(),
            last_name: entry.last_name.clone().unwrap_or_default(),
            username: entry
                .username
                .as_deref()
                .map(|name| format!("@{}", name))
                .unwrap_or_default(),
            phone: entry.phone.clone().unwrap_or_default(),
            bot: entry.bot,
            captured_at: Local::now().format(CAPTURE_FORMAT).to_string(),
        })
    }

    /// Bot flag rendered the way the spreadsheet shows it.
    pub fn bot_label(&self) -> &'static str {
        if self.bot {
            "Yes"
        } else {
            "No"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64) -> MemberEntry {
        MemberEntry {
            id,
            first_name: Some("Ada".to_string()),
            last_name: None,
            username: Some("ada".to_string()),
            phone: None,
            bot: false,
        }
    }

    #[test]
    fn test_from_entry_formats_handle_and_blanks() {
        let record = MemberRecord::from_entry("Test Group", &entry(42)).unwrap();
        assert_eq!(record.group, "Test Group");
        assert_eq!(record.id, 42);
        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.last_name, "");
        assert_eq!(record.username, "@ada");
        assert_eq!(record.phone, "");
        assert_eq!(record.bot_label(), "No");
    }

    #[test]
    fn test_from_entry_rejects_unusable_id() {
        assert!(MemberRecord::from_entry("Test Group", &entry(0)).is_err());
        assert!(MemberRecord::from_entry("Test Group", &entry(-5)).is_err());
    }

    #[test]
    fn test_capture_timestamp_shape() {
        let record = MemberRecord::from_entry("Test Group", &entry(1)).unwrap();
        // YYYY-MM-DD HH:MM
        assert_eq!(record.captured_at.len(), 16);
        assert_eq!(&record.captured_at[4..5], "-");
        assert_eq!(&record.captured_at[13..14], ":");
    }
}
