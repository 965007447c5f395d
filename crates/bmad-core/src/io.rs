use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting installed files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// Remove a directory tree if present. Returns true if something was removed.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path)?;
    Ok(true)
}

/// Read and parse a JSON file. A missing file yields `Ok(None)`; any other
/// read or parse failure is an error.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&data)?))
}

/// Serialize `value` as tab-indented JSON.
pub fn to_tabbed_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `value` to `path` as tab-indented JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = to_tabbed_json(value)?;
    atomic_write(path, data.as_bytes())
}

/// Recursively copy `source` into `destination`, overwriting existing files.
///
/// Entries whose file name matches any of `exclude_patterns` (regexes) are
/// skipped; an excluded directory is skipped with everything beneath it.
pub fn copy_directory(source: &Path, destination: &Path, exclude_patterns: &[&str]) -> Result<()> {
    let excludes = exclude_patterns
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    ensure_dir(destination)?;

    let walker = WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !excludes.iter().any(|re| re.is_match(&name))
        });

    for entry in walker {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .unwrap_or_else(|_| entry.path());
        let target = destination.join(rel);
        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Add `entry` to `root/.gitignore` if it isn't already present.
///
/// The entry is trimmed; an empty entry is a no-op. A line equal to `entry`
/// or `entry/` counts as present. Appends with a leading newline separator
/// if the file doesn't already end with one. Returns true if the file changed.
pub fn ensure_ignored(root: &Path, entry: &str) -> Result<bool> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Ok(false);
    }

    let gitignore = root.join(".gitignore");
    let existing = match std::fs::read_to_string(&gitignore) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let with_slash = format!("{entry}/");
    if existing
        .lines()
        .map(str::trim)
        .any(|l| l == entry || l == with_slash)
    {
        return Ok(false);
    }

    let sep = if existing.is_empty() || existing.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&gitignore)?;
    writeln!(f, "{sep}{entry}")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/config.json");
        atomic_write(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn write_json_uses_tabs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        write_json(&path, &serde_json::json!({"baseDir": "bmad", "docs": {"dir": "docs"}})).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\n\t\"baseDir\": \"bmad\",\n\t\"docs\": {\n\t\t\"dir\": \"docs\"\n\t}\n}"
        );
    }

    #[test]
    fn read_json_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let value: Option<serde_json::Value> = read_json(&dir.path().join("nope.json")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn read_json_malformed_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(read_json::<serde_json::Value>(&path).is_err());
    }

    #[test]
    fn copy_directory_recurses_and_excludes() {
        let src = TempDir::new().unwrap();
        std::fs::create_dir_all(src.path().join("agents")).unwrap();
        std::fs::create_dir_all(src.path().join(".git/objects")).unwrap();
        std::fs::write(src.path().join("agents/dev.md"), "dev").unwrap();
        std::fs::write(src.path().join(".git/HEAD"), "ref").unwrap();
        std::fs::write(src.path().join("README.md"), "readme").unwrap();

        let dst = TempDir::new().unwrap();
        let target = dst.path().join("copy");
        copy_directory(src.path(), &target, &[r"^\.git$"]).unwrap();

        assert_eq!(std::fs::read_to_string(target.join("agents/dev.md")).unwrap(), "dev");
        assert!(target.join("README.md").exists());
        assert!(!target.join(".git").exists());
    }

    #[test]
    fn copy_directory_overwrites() {
        let src = TempDir::new().unwrap();
        std::fs::write(src.path().join("a.md"), "new").unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::write(dst.path().join("a.md"), "old").unwrap();
        copy_directory(src.path(), dst.path(), &[]).unwrap();
        assert_eq!(std::fs::read_to_string(dst.path().join("a.md")).unwrap(), "new");
    }

    #[test]
    fn ensure_ignored_adds_when_missing() {
        let dir = TempDir::new().unwrap();
        assert!(ensure_ignored(dir.path(), "bmad-minimal").unwrap());
        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content, "bmad-minimal\n");
    }

    #[test]
    fn ensure_ignored_idempotent_and_accepts_slash_form() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "node_modules\nbmad/\n").unwrap();
        assert!(!ensure_ignored(dir.path(), "bmad").unwrap());
        assert!(ensure_ignored(dir.path(), "other").unwrap());
        assert!(!ensure_ignored(dir.path(), "other").unwrap());
        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content.lines().filter(|l| *l == "other").count(), 1);
    }

    #[test]
    fn ensure_ignored_inserts_separator() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "target").unwrap();
        assert!(ensure_ignored(dir.path(), " bmad ").unwrap());
        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content, "target\nbmad\n");
    }

    #[test]
    fn ensure_ignored_empty_entry_is_noop() {
        let dir = TempDir::new().unwrap();
        assert!(!ensure_ignored(dir.path(), "   ").unwrap());
        assert!(!dir.path().join(".gitignore").exists());
    }

    #[test]
    fn write_if_missing_skips_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.md");
        std::fs::write(&path, b"original").unwrap();
        assert!(!write_if_missing(&path, b"new").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }
}
