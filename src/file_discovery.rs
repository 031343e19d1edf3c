use chrono::{DateTime, Utc};
use glob::{glob, Pattern};
use std::fs::metadata;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Suffix of session journal files.
pub const JOURNAL_SUFFIX: &str = ".jsonl";

/// Handles discovery of session journals under the projects directory
///
/// The layout is fixed at two levels: `<root>/<project>/<session>.jsonl`. Files directly
/// under the root and anything nested deeper than one project directory are ignored.
pub struct FileDiscovery;

impl FileDiscovery {
    /// Find all journals last modified at or after `since`.
    /// Scanning is best-effort: an absent or unreadable root yields no files.
    pub fn scan(root: &Path, since: DateTime<Utc>) -> Vec<PathBuf> {
        let pattern = Path::new(&Pattern::escape(&root.to_string_lossy()))
            .join("*")
            .join(format!("*{}", JOURNAL_SUFFIX));

        let paths = match glob(&pattern.to_string_lossy()) {
            Ok(paths) => paths,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "Invalid journal glob pattern");
                return Vec::new();
            }
        };

        let files: Vec<PathBuf> = paths
            .flatten()
            .filter(|path| Self::should_include_file(path, since))
            .collect();

        debug!(root = %root.display(), files = files.len(), since = %since, "Scanned journals");
        files
    }

    /// A journal qualifies when it is a regular file whose modification time is not
    /// strictly before `since`.
    pub fn should_include_file(file_path: &Path, since: DateTime<Utc>) -> bool {
        let Ok(metadata) = metadata(file_path) else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }

        match metadata.modified() {
            Ok(modified) => DateTime::<Utc>::from(modified) >= since,
            Err(e) => {
                trace!(path = %file_path.display(), error = %e, "No modification time");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}\n").unwrap();
    }

    #[test]
    fn test_scan_two_levels_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("project-a").join("session1.jsonl"));
        touch(&root.join("project-b").join("session2.jsonl"));
        touch(&root.join("top-level.jsonl"));
        touch(&root.join("project-a").join("nested").join("deep.jsonl"));
        touch(&root.join("project-a").join("notes.txt"));

        let since = Utc::now() - Duration::days(7);
        let mut files = FileDiscovery::scan(root, since);
        files.sort();

        assert_eq!(
            files,
            vec![
                root.join("project-a").join("session1.jsonl"),
                root.join("project-b").join("session2.jsonl"),
            ]
        );
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = FileDiscovery::scan(&temp_dir.path().join("missing"), Utc::now());
        assert!(files.is_empty());
    }

    #[test]
    fn test_directory_with_journal_suffix_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("project").join("odd.jsonl")).unwrap();

        let files = FileDiscovery::scan(root, Utc::now() - Duration::days(1));
        assert!(files.is_empty());
    }

    #[test]
    fn test_future_floor_excludes_fresh_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("project").join("s.jsonl"));

        let files = FileDiscovery::scan(root, Utc::now() + Duration::hours(1));
        assert!(files.is_empty());
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("weird [dir]");
        touch(&root.join("project").join("s.jsonl"));

        let files = FileDiscovery::scan(&root, Utc::now() - Duration::days(1));
        assert_eq!(files.len(), 1);
    }
}
