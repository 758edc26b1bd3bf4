use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Read-only workspace access.
///
/// Everything the domain knows about the disk comes through this trait so it can be
/// exercised against [`MemoryTree`] in tests. Listings are sorted for deterministic walks.
pub trait SourceTree {
    fn is_file(&self, path: &Utf8Path) -> bool;

    fn is_dir(&self, path: &Utf8Path) -> bool;

    /// Immediate child directories of `dir`, sorted.
    fn child_dirs(&self, dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>>;

    /// Every regular file below `dir` at any depth, sorted.
    fn files_under(&self, dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>>;

    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String>;
}

/// File-system backed `SourceTree`.
#[derive(Debug, Clone, Default)]
pub struct FsSourceTree;

/// Paths that are not UTF-8 cannot be named in an import; they are skipped with a warning.
fn utf8_or_skip(path: std::path::PathBuf) -> Option<Utf8PathBuf> {
    match Utf8PathBuf::from_path_buf(path) {
        Ok(path) => Some(path),
        Err(path) => {
            warn!(path = %path.display(), "skipping non UTF-8 path");
            None
        }
    }
}

impl SourceTree for FsSourceTree {
    fn is_file(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }

    fn child_dirs(&self, dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir))? {
            let entry = entry.with_context(|| format!("read entry in {}", dir))?;
            let path = entry.path();
            if path.is_dir() {
                out.extend(utf8_or_skip(path));
            }
        }
        out.sort();
        Ok(out)
    }

    fn files_under(&self, dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let pattern = format!("{}/**/*", glob::Pattern::escape(dir.as_str()));
        let mut out = Vec::new();
        for entry in glob::glob(&pattern).with_context(|| format!("glob {}", pattern))? {
            let path = entry.map_err(|e| anyhow::anyhow!("glob error: {e}"))?;
            if path.is_file() {
                out.extend(utf8_or_skip(path));
            }
        }
        out.sort();
        Ok(out)
    }

    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        fs::read_to_string(path).with_context(|| format!("read {}", path))
    }
}

/// In-memory `SourceTree` for embedding and testing.
///
/// Directories are implied by file paths; empty directories can be added explicitly.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: BTreeMap<Utf8PathBuf, String>,
    dirs: BTreeSet<Utf8PathBuf>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        self.insert_file(path, contents);
        self
    }

    pub fn with_dir(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.insert_dir(path);
        self
    }

    pub fn insert_file(&mut self, path: impl Into<Utf8PathBuf>, contents: impl Into<String>) {
        let path = path.into();
        let mut parent = path.parent();
        while let Some(p) = parent {
            if p.as_str().is_empty() {
                break;
            }
            self.dirs.insert(p.to_path_buf());
            parent = p.parent();
        }
        self.files.insert(path, contents.into());
    }

    pub fn insert_dir(&mut self, path: impl Into<Utf8PathBuf>) {
        let path = path.into();
        let mut current = Some(path.as_path());
        while let Some(p) = current {
            if p.as_str().is_empty() {
                break;
            }
            self.dirs.insert(p.to_path_buf());
            current = p.parent();
        }
    }

    pub fn contents(&self, path: &Utf8Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

impl SourceTree for MemoryTree {
    fn is_file(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        self.dirs.contains(path)
    }

    fn child_dirs(&self, dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
        if !self.is_dir(dir) {
            anyhow::bail!("read dir {}: not a directory", dir);
        }
        Ok(self
            .dirs
            .iter()
            .filter(|d| d.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn files_under(&self, dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
        if !self.is_dir(dir) {
            anyhow::bail!("list {}: not a directory", dir);
        }
        Ok(self
            .files
            .keys()
            .filter(|f| f.starts_with(dir) && f.as_path() != dir)
            .cloned()
            .collect())
    }

    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("read {}: no such file", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> MemoryTree {
        MemoryTree::new()
            .with_file("/ws/Pods/Beta/Bar.h", "")
            .with_file("/ws/Pods/Alpha/Sub/Foo.h", "")
            .with_file("/ws/Pods/Alpha/Foo.m", "#import \"Foo.h\"\n")
            .with_dir("/ws/Pods/Empty")
    }

    #[test]
    fn memory_tree_implies_parent_dirs() {
        let tree = sample();
        assert!(tree.is_dir(Utf8Path::new("/ws")));
        assert!(tree.is_dir(Utf8Path::new("/ws/Pods/Alpha/Sub")));
        assert!(tree.is_dir(Utf8Path::new("/ws/Pods/Empty")));
        assert!(!tree.is_dir(Utf8Path::new("/ws/Pods/Alpha/Foo.m")));
        assert!(tree.is_file(Utf8Path::new("/ws/Pods/Alpha/Foo.m")));
    }

    #[test]
    fn memory_tree_child_dirs_sorted() {
        let tree = sample();
        let dirs = tree.child_dirs(Utf8Path::new("/ws/Pods")).expect("list");
        assert_eq!(
            dirs,
            vec![
                Utf8PathBuf::from("/ws/Pods/Alpha"),
                Utf8PathBuf::from("/ws/Pods/Beta"),
                Utf8PathBuf::from("/ws/Pods/Empty"),
            ]
        );
    }

    #[test]
    fn memory_tree_files_under_is_recursive_and_component_wise() {
        let tree = sample().with_file("/ws/Pods/AlphaExtra/X.h", "");
        let files = tree.files_under(Utf8Path::new("/ws/Pods/Alpha")).expect("list");
        assert_eq!(
            files,
            vec![
                Utf8PathBuf::from("/ws/Pods/Alpha/Foo.m"),
                Utf8PathBuf::from("/ws/Pods/Alpha/Sub/Foo.h"),
            ]
        );
    }

    #[test]
    fn memory_tree_missing_dir_is_error() {
        let tree = sample();
        assert!(tree.files_under(Utf8Path::new("/nope")).is_err());
        assert!(tree.child_dirs(Utf8Path::new("/nope")).is_err());
        assert!(tree.read_to_string(Utf8Path::new("/nope.h")).is_err());
    }

    #[test]
    fn fs_source_tree_lists_sorted() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        std::fs::create_dir_all(root.join("Pods/Beta/Nested")).expect("mkdir");
        std::fs::create_dir_all(root.join("Pods/Alpha")).expect("mkdir");
        std::fs::write(root.join("Pods/Beta/Nested/Bar.h"), "").expect("write");
        std::fs::write(root.join("Pods/Beta/Bar.m"), "x").expect("write");
        std::fs::write(root.join("Pods/Podfile.lock"), "").expect("write");

        let tree = FsSourceTree;
        let dirs = tree.child_dirs(&root.join("Pods")).expect("dirs");
        assert_eq!(dirs, vec![root.join("Pods/Alpha"), root.join("Pods/Beta")]);

        let files = tree.files_under(&root.join("Pods/Beta")).expect("files");
        assert_eq!(
            files,
            vec![root.join("Pods/Beta/Bar.m"), root.join("Pods/Beta/Nested/Bar.h")]
        );
        assert_eq!(
            tree.read_to_string(&root.join("Pods/Beta/Bar.m")).expect("read"),
            "x"
        );
    }

    #[test]
    fn fs_source_tree_escapes_glob_metacharacters_in_root() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let odd = root.join("Pods/Kit[v2]");
        std::fs::create_dir_all(&odd).expect("mkdir");
        std::fs::write(odd.join("Kit.h"), "").expect("write");

        let files = FsSourceTree.files_under(&odd).expect("files");
        assert_eq!(files, vec![odd.join("Kit.h")]);
    }

    #[cfg(unix)]
    #[test]
    fn fs_source_tree_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let pods = root.join("Pods");
        std::fs::create_dir_all(pods.join("Alpha")).expect("mkdir");
        std::fs::write(pods.join("Alpha/Foo.h"), "").expect("write");
        let bad = OsStr::from_bytes(b"Bad\xff.h");
        std::fs::write(pods.as_std_path().join("Alpha").join(bad), "").expect("write");
        std::fs::create_dir_all(pods.as_std_path().join(OsStr::from_bytes(b"Gamma\xfe")))
            .expect("mkdir");

        let files = FsSourceTree.files_under(&pods.join("Alpha")).expect("files");
        assert_eq!(files, vec![pods.join("Alpha/Foo.h")]);

        let dirs = FsSourceTree.child_dirs(&pods).expect("dirs");
        assert_eq!(dirs, vec![pods.join("Alpha")]);
    }
}
