use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to {action} '{}': {source}", .path.display())]
pub struct ArchiveError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Replaces the file at `path` with `digest`, UTF-8 encoded.
///
/// Writes to a sibling temp file, syncs it, then renames it over the
/// target, so readers see either the previous digest or the new one and
/// never a partial write. Missing parent directories are created.
pub fn write_digest(path: &Path, digest: &str) -> Result<(), ArchiveError> {
    let err = |action: &'static str, path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ArchiveError {
            action,
            path,
            source,
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(err("create directory", parent))?;
    }

    // Time-based suffix; `create_new` below refuses any file already there.
    use std::time::{SystemTime, UNIX_EPOCH};
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", suffix));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(err("create temporary file", &temp_path))?;

    let written = temp_file
        .write_all(digest.as_bytes())
        .map_err(err("write temporary file", &temp_path))
        .and_then(|()| {
            temp_file
                .sync_all()
                .map_err(err("sync temporary file", &temp_path))
        });
    drop(temp_file);

    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(err("remove previous digest", path)(e));
        }
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(err("replace", path)(e));
    }

    tracing::debug!(path = %path.display(), bytes = digest.len(), "Digest archived");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("newsdigest_archive_test_{name}"));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_creates_file() {
        let dir = test_dir("create");
        let path = dir.join("last_digest.md");

        write_digest(&path, "# Digest\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Digest\n");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_overwrites_not_appends() {
        let dir = test_dir("overwrite");
        let path = dir.join("last_digest.md");

        write_digest(&path, "first run, a much longer digest body\n").unwrap();
        write_digest(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let dir = test_dir("no_temp");
        let path = dir.join("last_digest.md");

        write_digest(&path, "x").unwrap();
        let names: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("last_digest.md")]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_creates_missing_parent() {
        let dir = test_dir("parent");
        let path = dir.join("nested").join("out").join("digest.md");

        write_digest(&path, "Мир за минуту 🌍").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Мир за минуту 🌍");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_into_file_as_directory_fails() {
        let dir = test_dir("blocked");
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();

        let err = write_digest(&blocker.join("digest.md"), "x").unwrap_err();
        assert!(err.to_string().contains("blocker"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
