use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

const MAX_SCAN_FILE_BYTES: u64 = 200 * 1024 * 1024;

/// List the regular `.txt` files directly under `dir`, smallest first.
///
/// Files over 200 MiB are excluded up front. Size ties are broken by path so
/// the resulting document order is identical across platforms. A missing or
/// non-directory path yields an empty list with a warning.
pub fn scan_txt_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "data directory missing or not a directory");
        return Vec::new();
    }
    let mut files: Vec<(u64, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|s| s.to_str()) != Some("txt") {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.len() > MAX_SCAN_FILE_BYTES {
            continue;
        }
        files.push((meta.len(), entry.into_path()));
    }
    files.sort();
    files.into_iter().map(|(_, path)| path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_directory_yields_empty() {
        assert!(scan_txt_files(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn lists_only_txt_files_sorted_by_size() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("big.txt"), "aaaaaaaaaa").unwrap();
        fs::write(dir.path().join("small.txt"), "aa").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::write(dir.path().join("upper.TXT"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let files = scan_txt_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["small.txt", "big.txt"]);
    }

    #[test]
    fn subdirectories_are_not_descended() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/inner.txt"), "hidden").unwrap();
        fs::write(dir.path().join("top.txt"), "seen").unwrap();
        let files = scan_txt_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.txt"));
    }
}
