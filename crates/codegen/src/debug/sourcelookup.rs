//! Locating contract source files for debug symbols.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Where to look for a class's source. Locators are tried in order and the
/// first match wins.
#[derive(Debug, Clone)]
pub enum SourceLocator {
    /// A single file, matching any class whose simple name equals the
    /// file stem.
    File(PathBuf),
    /// A directory searched recursively for a path ending in
    /// `<package-path>/<TypeName>.<ext>`.
    Dir { root: PathBuf, ext: String },
}

impl SourceLocator {
    pub fn file(path: impl Into<PathBuf>) -> SourceLocator {
        SourceLocator::File(path.into())
    }

    pub fn dir(root: impl Into<PathBuf>, ext: impl Into<String>) -> SourceLocator {
        SourceLocator::Dir { root: root.into(), ext: ext.into() }
    }

    fn locate(&self, class_name: &str) -> Option<PathBuf> {
        match self {
            SourceLocator::File(path) => {
                let simple = class_name.rsplit('.').next().unwrap_or(class_name);
                let stem = path.file_stem()?.to_str()?;
                (stem == simple && path.is_file()).then(|| path.clone())
            }
            SourceLocator::Dir { root, ext } => {
                let suffix =
                    PathBuf::from(class_name.replace('.', "/")).with_extension(ext);
                find_suffix(root, &suffix)
            }
        }
    }
}

fn find_suffix(root: &Path, suffix: &Path) -> Option<PathBuf> {
    for entry in WalkDir::new(root).sort_by_file_name().into_iter().flatten() {
        if entry.file_type().is_file() && entry.path().ends_with(suffix) {
            return Some(entry.path().to_path_buf());
        }
    }
    None
}

/// First match across all locators, in order.
pub fn locate(locators: &[SourceLocator], class_name: &str) -> Option<PathBuf> {
    locators.iter().find_map(|l| l.locate(class_name))
}
