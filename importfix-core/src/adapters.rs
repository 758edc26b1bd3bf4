//! Default write port implementations.

use crate::ports::WritePort;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

/// In-memory write port for embedding and testing.
///
/// Records every write. Paths registered with [`failing_on`](Self::failing_on) reject
/// writes, which lets callers exercise per-file failure handling.
#[derive(Debug, Default)]
pub struct InMemoryWritePort {
    files: RefCell<BTreeMap<Utf8PathBuf, Vec<u8>>>,
    dirs: RefCell<BTreeSet<Utf8PathBuf>>,
    failing: BTreeSet<Utf8PathBuf>,
}

impl InMemoryWritePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Snapshot of all written files.
    pub fn written(&self) -> BTreeMap<Utf8PathBuf, Vec<u8>> {
        self.files.borrow().clone()
    }

    pub fn contents(&self, path: &Utf8Path) -> Option<String> {
        self.files
            .borrow()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn has_dir(&self, path: &Utf8Path) -> bool {
        self.dirs.borrow().contains(path)
    }
}

impl WritePort for InMemoryWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if self.failing.contains(path) {
            anyhow::bail!("write {}: permission denied", path);
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        self.dirs.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fs_write_port_writes_and_creates_dirs() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let target = root.join("nested").join("file.m");

        let port = FsWritePort;
        port.write_file(&target, b"#import <A/B.h>\n").expect("write");

        let contents = std::fs::read_to_string(&target).expect("read");
        assert_eq!(contents, "#import <A/B.h>\n");

        let extra_dir = root.join("extra");
        port.create_dir_all(&extra_dir).expect("mkdir");
        assert!(extra_dir.exists());
    }

    #[test]
    fn in_memory_records_writes() {
        let port = InMemoryWritePort::new();
        port.write_file(Utf8Path::new("/p/a.m"), b"one").expect("write");
        port.write_file(Utf8Path::new("/p/a.m"), b"two").expect("write");
        port.create_dir_all(Utf8Path::new("/p/out")).expect("mkdir");

        assert_eq!(port.contents(Utf8Path::new("/p/a.m")).as_deref(), Some("two"));
        assert_eq!(port.written().len(), 1);
        assert!(port.has_dir(Utf8Path::new("/p/out")));
    }

    #[test]
    fn in_memory_failing_paths_reject_writes() {
        let port = InMemoryWritePort::new().failing_on("/p/locked.m");
        let err = port
            .write_file(Utf8Path::new("/p/locked.m"), b"x")
            .expect_err("locked");
        assert!(err.to_string().contains("permission denied"));
        assert!(port.written().is_empty());
    }
}
