use camino::Utf8Path;
use std::collections::BTreeSet;

pub const DEFAULT_HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp"];
pub const DEFAULT_IMPLEMENTATION_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "m", "mm"];

/// Extension sets deciding which files are headers and which are project sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileKinds {
    header: BTreeSet<String>,
    implementation: BTreeSet<String>,
}

impl Default for FileKinds {
    fn default() -> Self {
        Self::new(
            DEFAULT_HEADER_EXTENSIONS.iter().copied(),
            DEFAULT_IMPLEMENTATION_EXTENSIONS.iter().copied(),
        )
    }
}

impl FileKinds {
    pub fn new<H, I>(header: H, implementation: I) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            implementation: implementation.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_header(&self, path: &Utf8Path) -> bool {
        path.extension().is_some_and(|ext| self.header.contains(ext))
    }

    /// Headers and implementation files both count as project sources.
    pub fn is_source(&self, path: &Utf8Path) -> bool {
        self.is_header(path)
            || path
                .extension()
                .is_some_and(|ext| self.implementation.contains(ext))
    }
}
