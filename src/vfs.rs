use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DalError;
use crate::store::TemplateSource;

/// Virtual file store backed by a directory tree read eagerly into memory.
///
/// Every regular file under the root is loaded once at construction and
/// keyed by its `/`-separated path relative to the root, so lookups never
/// touch the filesystem again:
/// ```rust,no_run
/// use sql_dal::Vfs;
///
/// let vfs = Vfs::load_files("sqls")?;
/// # Ok::<(), sql_dal::DalError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Vfs {
    files: HashMap<String, Vec<u8>>,
}

impl Vfs {
    /// Load every file under `root` into memory.
    ///
    /// # Errors
    ///
    /// Returns `DalError::ReadError` when the root or any file under it
    /// cannot be read.
    pub fn load_files(root: impl AsRef<Path>) -> Result<Vfs, DalError> {
        let root = root.as_ref();
        let mut files = HashMap::new();
        read_dir_into(root, root, &mut files)?;
        Ok(Vfs { files })
    }

    /// Number of files loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl TemplateSource for Vfs {
    fn read(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }
}

fn read_dir_into(
    root: &Path,
    dir: &Path,
    files: &mut HashMap<String, Vec<u8>>,
) -> Result<(), DalError> {
    let entries =
        fs::read_dir(dir).map_err(|e| DalError::ReadError(format!("{}: {e}", dir.display())))?;
    for entry in entries {
        let entry = entry.map_err(|e| DalError::ReadError(format!("{}: {e}", dir.display())))?;
        let path = entry.path();
        if path.is_dir() {
            read_dir_into(root, &path, files)?;
        } else {
            let content = fs::read(&path)
                .map_err(|e| DalError::ReadError(format!("{}: {e}", path.display())))?;
            files.insert(relative_key(root, &path), content);
        }
    }
    Ok(())
}

fn relative_key(root: &Path, path: &Path) -> String {
    let rel: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_files_keyed_relative_to_root() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "select_all.sql", "select * from customer");
        write(tmp.path(), "customer/insert.sql", "insert into customer ...");

        let vfs = Vfs::load_files(tmp.path()).unwrap();
        assert_eq!(vfs.len(), 2);
        assert_eq!(
            vfs.read("select_all.sql"),
            Some(b"select * from customer".as_slice())
        );
        assert!(vfs.read("customer/insert.sql").is_some());
        assert!(vfs.read("missing.sql").is_none());
    }

    #[test]
    fn missing_root_is_a_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("no_such_dir");
        assert!(matches!(
            Vfs::load_files(&gone),
            Err(DalError::ReadError(_))
        ));
    }
}
