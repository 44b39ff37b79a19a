use crate::collect::MemberRecord;
use anyhow::{Context, Result as AnyhowResult};
use chrono::Local;
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Column headers, in output order.
const COLUMNS: [&str; 8] = [
    "Group",
    "ID",
    "First Name",
    "Last Name",
    "Username",
    "Phone",
    "Bot",
    "Captured At",
];

/// Fixed filename prefix meaning "members of".
const FILE_PREFIX: &str = "Members";

/// Timestamp format used in output filenames.
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// UTF-8 byte-order mark written ahead of the CSV fallback.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes the collected roster to a spreadsheet in `out_dir`.
///
/// The file is named `Members_{title}_{timestamp}.xlsx`, with the group
/// title sanitized to alphanumerics, spaces, and underscores. If the
/// workbook write fails, the same rows are written to a `.csv` file with the
/// same base name, UTF-8 encoded with a byte-order mark.
///
/// All failures are logged rather than propagated; the run ends normally
/// either way.
///
/// # Arguments
///
/// * `records` - The collected records, in encounter order.
/// * `group_title` - Title of the enumerated group.
/// * `out_dir` - Directory the output file is placed in.
///
/// # Returns
///
/// The path of the file actually written, or `None` when the roster was
/// empty or both writes failed.
pub fn export_members(
    records: &[MemberRecord],
    group_title: &str,
    out_dir: &Path,
) -> Option<PathBuf> {
    if records.is_empty() {
        warn!("No members were collected, nothing to export");
        return None;
    }

    let base = base_name(group_title, &Local::now().format(FILE_TIMESTAMP_FORMAT).to_string());
    let xlsx_path = out_dir.join(format!("{}.xlsx", base));
    match write_workbook(records, &xlsx_path) {
        Ok(()) => {
            info!(
                "Saved {} member(s) to {}",
                records.len(),
                xlsx_path.display()
            );
            Some(xlsx_path)
        }
        Err(e) => {
            error!("Failed to save {}: {:#}", xlsx_path.display(), e);
            let csv_path = out_dir.join(format!("{}.csv", base));
            match write_csv_fallback(records, &csv_path) {
                Ok(()) => {
                    info!("Saved fallback copy to {}", csv_path.display());
                    Some(csv_path)
                }
                Err(e) => {
                    error!("Failed to save fallback copy {}: {:#}", csv_path.display(), e);
                    None
                }
            }
        }
    }
}

/// Composes the output base name from a sanitized title and a timestamp.
fn base_name(group_title: &str, timestamp: &str) -> String {
    format!("{}_{}_{}", FILE_PREFIX, sanitize_title(group_title), timestamp)
}

/// Strips a group title down to characters safe in a filename.
///
/// Keeps alphanumerics, spaces, and underscores; trailing whitespace is
/// trimmed so the name never ends just before the timestamp separator with
/// a dangling space.
fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();
    kept.trim_end().to_string()
}

/// Renders one record as its output cells, in column order.
///
/// Both writers share this so their rows cannot drift apart. The id is
/// rendered as text: spreadsheet numbers are IEEE 754 doubles, which would
/// corrupt platform ids above 2^53.
fn row_cells(record: &MemberRecord) -> [String; 8] {
    [
        record.group.clone(),
        record.id.to_string(),
        record.first_name.clone(),
        record.last_name.clone(),
        record.username.clone(),
        record.phone.clone(),
        record.bot_label().to_string(),
        record.captured_at.clone(),
    ]
}

/// Writes the records as a single-sheet workbook: header row, then one row
/// per record, no index column.
fn write_workbook(records: &[MemberRecord], path: &Path) -> AnyhowResult<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in row_cells(record).iter().enumerate() {
            sheet.write_string(row, col as u16, cell.as_str())?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("could not save workbook to {}", path.display()))?;
    Ok(())
}

/// Writes the records as comma-delimited text, UTF-8 with a byte-order mark,
/// same columns and order as the workbook.
fn write_csv_fallback(records: &[MemberRecord], path: &Path) -> AnyhowResult<()> {
    let mut file =
        File::create(path).with_context(|| format!("could not create {}", path.display()))?;
    file.write_all(UTF8_BOM).context("could not write byte-order mark")?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(COLUMNS).context("could not write header row")?;
    for record in records {
        writer
            .write_record(row_cells(record))
            .context("could not write record row")?;
    }
    writer.flush().context("could not flush fallback file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> MemberRecord {
        MemberRecord {
            group: "Test Group".to_string(),
            id,
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            username: format!("@user{}", id),
            phone: String::new(),
            bot: id % 2 == 0,
            captured_at: "2026-08-24 12:00".to_string(),
        }
    }

    #[test]
    fn test_sanitize_title_strips_punctuation() {
        assert_eq!(sanitize_title("Test/Group#1"), "TestGroup1");
        assert_eq!(sanitize_title("plain_name 2"), "plain_name 2");
        assert_eq!(sanitize_title("trailing!!!   "), "trailing");
    }

    #[test]
    fn test_base_name_shape() {
        assert_eq!(
            base_name("Test/Group#1", "20260824_1200"),
            "Members_TestGroup1_20260824_1200"
        );
    }

    #[test]
    fn test_row_cells_keep_large_ids_exact() {
        let mut sample = record(1);
        sample.id = 9_007_199_254_740_993; // 2^53 + 1, not representable as f64
        let cells = row_cells(&sample);
        assert_eq!(cells[1], "9007199254740993");
        assert_eq!(cells.len(), COLUMNS.len());
    }

    #[test]
    fn test_empty_roster_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_members(&[], "Test Group", dir.path()).is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<MemberRecord> = (1..=3).map(record).collect();
        let path = export_members(&records, "Test/Group#1", dir.path()).unwrap();
        assert_eq!(path.extension().unwrap(), "xlsx");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Members_TestGroup1_"));
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_csv_fallback_has_bom_and_identical_rows() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<MemberRecord> = (1..=2).map(record).collect();
        let path = dir.path().join("fallback.csv");
        write_csv_fallback(&records, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);

        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Group,ID,First Name,Last Name,Username,Phone,Bot,Captured At"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Test Group,1,First1,Last1,@user1,,No,2026-08-24 12:00"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Test Group,2,First2,Last2,@user2,,Yes,2026-08-24 12:00"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_primary_failure_falls_back_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<MemberRecord> = (1..=2).map(record).collect();

        // Occupy the workbook path with a directory so the primary write
        // cannot succeed. Block the next minute's name too in case the
        // clock ticks over between here and the export call.
        for now in [Local::now(), Local::now() + chrono::Duration::minutes(1)] {
            let base = base_name("Blocked", &now.format(FILE_TIMESTAMP_FORMAT).to_string());
            std::fs::create_dir(dir.path().join(format!("{}.xlsx", base))).unwrap();
        }

        let path = export_members(&records, "Blocked", dir.path()).unwrap();
        assert_eq!(path.extension().unwrap(), "csv");
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
        // Header plus one line per record.
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
