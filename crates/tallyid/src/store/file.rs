use std::{
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::Builder;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, Result, Store};

/// A [`Store`] backed by a plain-text file holding the counter in decimal.
///
/// The file content is the decimal value and nothing else (no trailing
/// newline). A missing file means a fresh counter.
///
/// Saves never rewrite the record in place: the new value goes to a temporary
/// file in the same directory, which is flushed to disk and then atomically
/// renamed over the record. A crash at any point leaves either the old or the
/// new value behind.
///
/// # Example
///
/// ```
/// use tallyid::{FileStore, Store};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = FileStore::new(dir.path().join("max_value.txt"));
///
/// assert_eq!(store.load().unwrap(), 0);
/// store.save(1_000).unwrap();
/// assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "1000");
/// assert_eq!(store.load().unwrap(), 1_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store for the record at `path`. Nothing is touched until the
    /// first [`Store::load`] or [`Store::save`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the advisory lock file used to share this record between
    /// processes: the record path with `.lock` appended.
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    fn record_permissions(&self) -> io::Result<Option<fs::Permissions>> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(Some(metadata.permissions())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<u64> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    path = %self.path.display(),
                    "no counter record found, starting from 0"
                );
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        };

        content
            .trim()
            .parse()
            .map_err(|_| Error::CorruptRecord {
                path: self.path.clone(),
                content,
            })
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn save(&self, value: u64) -> Result<()> {
        let dir = self.dir();
        let mut builder = Builder::new();
        builder.prefix(".tallyid-");
        // Temporary files are private by default; a new record gets the
        // same umask-filtered mode as any newly created file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir)?;
        if let Some(permissions) = self.record_permissions()? {
            tmp.as_file().set_permissions(permissions)?;
        }
        write!(tmp, "{value}")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        sync_dir(dir)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %self.path.display(), value, "counter record saved");
        Ok(())
    }
}

// Makes the rename itself durable
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
