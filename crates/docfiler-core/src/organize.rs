//! Relocating an organized file and recording the action.
//!
//! The move is the primary contract: it either completes (file at the new
//! path) or fails cleanly (file untouched at the old path). The audit log
//! append is best-effort and never rolls back a completed move.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::reply::{FALLBACK_FOLDER, StructuredResult};

/// Default audit log filename, created in the organized file's parent
/// directory.
pub const AUDIT_LOG_FILENAME: &str = "docfiler_log.txt";

/// Separator line ending each audit record.
const RECORD_SEPARATOR: &str = "----------------------------------------";

#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("{0} has no parent directory")]
    NoParent(PathBuf),
    #[error("failed to create directory {dir}: {source}")]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),
    #[error("failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Record of one completed file move. Appended immutably to the audit log;
/// never mutated or deleted by this system.
#[derive(Debug, Clone)]
pub struct OrganizeOutcome {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub folder_name: String,
    pub keywords: Vec<String>,
    pub timestamp: DateTime<Local>,
    /// Set when the move succeeded but the audit record could not be written.
    /// Reported to the user separately; the move is not rolled back.
    pub log_error: Option<String>,
}

/// Append-only audit log shared across organize calls. Writes are serialized
/// by the mutex and each record goes out in a single `write_all`, so
/// concurrent organizes cannot interleave lines.
pub struct AuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, outcome: &OrganizeOutcome) -> std::io::Result<()> {
        let record = format!(
            "file: {}\nmoved_to: {}\nkeywords: {}\ntime: {}\n{RECORD_SEPARATOR}\n",
            outcome
                .original_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            outcome.new_path.display(),
            outcome.keywords.join(", "),
            outcome.timestamp.format("%Y-%m-%d %H:%M:%S"),
        );

        let guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(record.as_bytes())?;
        drop(guard);
        Ok(())
    }
}

/// Move `original` into `<parent>/<suggested folder>` and append an audit
/// record.
///
/// Directory creation is idempotent. The move is atomic: on any error the
/// file is still at its original path. A failed log append is reported via
/// [`OrganizeOutcome::log_error`] rather than an `Err`, since the move has
/// already completed.
pub fn organize(
    original: &Path,
    result: &StructuredResult,
    log: &AuditLog,
) -> Result<OrganizeOutcome, OrganizeError> {
    let parent = original
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| OrganizeError::NoParent(original.to_path_buf()))?;

    let folder_name = folder_component(&result.suggested_folder);
    let target_dir = parent.join(&folder_name);
    std::fs::create_dir_all(&target_dir).map_err(|source| OrganizeError::CreateDir {
        dir: target_dir.clone(),
        source,
    })?;

    let file_name = original
        .file_name()
        .ok_or_else(|| OrganizeError::NoParent(original.to_path_buf()))?;
    let new_path = target_dir.join(file_name);
    if new_path.exists() {
        return Err(OrganizeError::DestinationExists(new_path));
    }

    std::fs::rename(original, &new_path).map_err(|source| OrganizeError::Move {
        from: original.to_path_buf(),
        to: new_path.clone(),
        source,
    })?;

    let mut outcome = OrganizeOutcome {
        original_path: original.to_path_buf(),
        new_path,
        folder_name,
        keywords: result.keywords.clone(),
        timestamp: Local::now(),
        log_error: None,
    };

    if let Err(e) = log.append(&outcome) {
        tracing::warn!(path = %log.path().display(), error = %e, "audit log append failed");
        outcome.log_error = Some(e.to_string());
    }

    Ok(outcome)
}

/// Reduce a model-suggested folder name to a single safe path component. The
/// suggestion comes from an untrusted reply; separators and traversal tokens
/// must not let it escape the parent directory.
fn folder_component(suggested: &str) -> String {
    let cleaned: String = suggested
        .chars()
        .map(|c| if c == '/' || c == '\\' || c == '\0' { ' ' } else { c })
        .collect();
    let cleaned = cleaned
        .split_whitespace()
        .filter(|part| !part.chars().all(|c| c == '.'))
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        FALLBACK_FOLDER.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn result(folder: &str) -> StructuredResult {
        StructuredResult {
            summary: "a summary".into(),
            suggested_folder: folder.into(),
            keywords: vec!["alpha".into(), "beta".into()],
        }
    }

    fn touch(path: &Path) {
        std::fs::write(path, b"contents").unwrap();
    }

    #[test]
    fn moves_file_and_appends_record() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("report.txt");
        touch(&original);
        let log = AuditLog::new(dir.path().join(AUDIT_LOG_FILENAME));

        let outcome = organize(&original, &result("Finance"), &log).unwrap();

        assert!(!original.exists());
        assert_eq!(outcome.new_path, dir.path().join("Finance").join("report.txt"));
        assert!(outcome.new_path.exists());
        assert!(outcome.log_error.is_none());

        let log_text = std::fs::read_to_string(log.path()).unwrap();
        assert!(log_text.contains("file: report.txt"));
        assert!(log_text.contains("keywords: alpha, beta"));
        assert!(log_text.contains(RECORD_SEPARATOR));
    }

    #[test]
    fn preexisting_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Finance")).unwrap();
        let original = dir.path().join("report.txt");
        touch(&original);
        let log = AuditLog::new(dir.path().join(AUDIT_LOG_FILENAME));

        let outcome = organize(&original, &result("Finance"), &log).unwrap();
        assert!(outcome.new_path.exists());
    }

    #[test]
    fn existing_destination_leaves_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Finance")).unwrap();
        touch(&dir.path().join("Finance").join("report.txt"));
        let original = dir.path().join("report.txt");
        touch(&original);
        let log = AuditLog::new(dir.path().join(AUDIT_LOG_FILENAME));

        let err = organize(&original, &result("Finance"), &log).unwrap_err();
        assert!(matches!(err, OrganizeError::DestinationExists(_)));
        // No partial state: the original is untouched, nothing was logged.
        assert!(original.exists());
        assert!(!log.path().exists());
    }

    #[test]
    fn log_failure_does_not_undo_move() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("report.txt");
        touch(&original);
        // A log path whose parent doesn't exist forces the append to fail.
        let log = AuditLog::new(dir.path().join("missing").join("log.txt"));

        let outcome = organize(&original, &result("Finance"), &log).unwrap();
        assert!(outcome.new_path.exists());
        assert!(!original.exists());
        assert!(outcome.log_error.is_some());
    }

    #[test]
    fn folder_suggestions_cannot_escape_parent() {
        assert_eq!(folder_component("../../etc"), "etc");
        assert_eq!(folder_component("a/b\\c"), "a b c");
        assert_eq!(folder_component("  "), FALLBACK_FOLDER);
        assert_eq!(folder_component(".."), FALLBACK_FOLDER);
        assert_eq!(folder_component("Invoices"), "Invoices");
    }

    #[test]
    fn concurrent_organizes_write_one_record_each() {
        const N: usize = 8;
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(AuditLog::new(dir.path().join(AUDIT_LOG_FILENAME)));

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let log = Arc::clone(&log);
                let original = dir.path().join(format!("doc_{i}.txt"));
                touch(&original);
                std::thread::spawn(move || {
                    organize(&original, &result("Stress"), &log).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let log_text = std::fs::read_to_string(log.path()).unwrap();
        let records: Vec<&str> = log_text
            .split(RECORD_SEPARATOR)
            .filter(|chunk| !chunk.trim().is_empty())
            .collect();
        assert_eq!(records.len(), N);
        for record in records {
            // Each record is intact: no interleaved lines.
            assert!(record.contains("file: doc_"));
            assert!(record.contains("moved_to: "));
            assert!(record.contains("keywords: alpha, beta"));
            assert!(record.contains("time: "));
        }
    }
}
