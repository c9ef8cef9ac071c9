//! Name cache
//!
//! Listing entries for fzf or rofi should not require a passphrase prompt
//! every time. The list of names is cached in a file named after the SHA-256
//! of the *encrypted* store, so any edit to the store selects a new cache
//! file without decrypting anything to detect staleness.

use crate::error::StoreError;
use crate::store::SecretStore;
use sha2::{Digest, Sha256};
use nix::unistd::getuid;
use std::fs;
use std::io;
use std::os::unix::fs::{DirBuilderExt, MetadataExt};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Length of a hex SHA-256 digest, which is also the cache file name length
const IDENTITY_LEN: usize = 64;

/// Compute the cache identity of raw store bytes
pub fn identity(raw: &[u8]) -> String {
    hex::encode(Sha256::digest(raw))
}

fn is_cache_file_name(name: &str) -> bool {
    name.len() == IDENTITY_LEN && name.bytes().all(|b| b.is_ascii_hexdigit())
}

fn cache_error(message: String) -> StoreError {
    StoreError::Cache { message }
}

/// Cache of entry names keyed by store content hash
#[derive(Debug, Clone)]
pub struct NameCache {
    dir: PathBuf,
    limit: usize,
}

impl NameCache {
    /// `limit` is the maximum number of cache files kept in `dir`
    pub fn new(dir: PathBuf, limit: usize) -> Self {
        Self {
            dir,
            limit: limit.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file path for an identity
    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.dir.join(identity)
    }

    /// Entry names of `store`, from the cache when possible
    ///
    /// On a miss the store is decrypted once and the names are written to the
    /// cache, unless the list is empty.
    pub fn names(&self, store: &SecretStore) -> Result<Vec<String>, StoreError> {
        let raw = store.read_raw()?;
        let path = self.path_for(&identity(&raw));

        if path.is_file() {
            debug!("Name cache hit: {}", path.display());
            let names = read_names(&path)?;
            touch(&path);
            return Ok(names);
        }

        debug!("Name cache miss: {}", path.display());
        let names = store.open_raw(&raw)?.names();
        if names.is_empty() {
            debug!("Store has no entries, not caching");
            return Ok(names);
        }

        self.write(&path, &names)?;
        self.evict(&path);
        Ok(names)
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        ensure_private_dir(&self.dir).map_err(|e| {
            cache_error(format!("cache directory {}: {}", self.dir.display(), e))
        })
    }

    /// Write names one per line via a temp file and rename, so concurrent
    /// writers of the same identity never expose a partial file
    fn write(&self, path: &Path, names: &[String]) -> Result<(), StoreError> {
        self.ensure_dir()?;

        let mut contents = names.join("\n");
        contents.push('\n');

        let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
        fs::write(&tmp, contents)
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                cache_error(format!("failed to write {}: {}", path.display(), e))
            })?;

        info!("Cached {} entry name(s) in {}", names.len(), path.display());
        Ok(())
    }

    /// Cache files currently in the directory with their modification times
    fn cache_files(&self) -> Vec<(PathBuf, SystemTime)> {
        let Ok(read_dir) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        read_dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_str().is_some_and(is_cache_file_name))
            .filter_map(|entry| {
                let modified = entry.metadata().and_then(|m| m.modified()).ok()?;
                Some((entry.path(), modified))
            })
            .collect()
    }

    /// Remove the least recently used cache files beyond the limit
    ///
    /// `keep` is never removed.
    fn evict(&self, keep: &Path) {
        let mut files: Vec<_> = self
            .cache_files()
            .into_iter()
            .filter(|(path, _)| path != keep)
            .collect();

        let allowed = self.limit.saturating_sub(1);
        if files.len() <= allowed {
            return;
        }

        files.sort_by(|a, b| b.1.cmp(&a.1));
        for (path, _) in files.into_iter().skip(allowed) {
            match fs::remove_file(&path) {
                Ok(()) => debug!("Evicted stale name cache {}", path.display()),
                Err(e) => warn!("Failed to evict {}: {}", path.display(), e),
            }
        }
    }

    /// Remove every cache file, returning how many were removed
    pub fn clear(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for (path, _) in self.cache_files() {
            fs::remove_file(&path).map_err(|e| {
                cache_error(format!("failed to remove {}: {}", path.display(), e))
            })?;
            removed += 1;
        }
        info!("Removed {} name cache file(s)", removed);
        Ok(removed)
    }
}

/// Create `dir` with mode 0700 unless it exists, then make sure it is a
/// real directory owned by the current user and closed to everyone else
///
/// The default location lives in the shared temp dir, where another user
/// could have created it first.
pub fn ensure_private_dir(dir: &Path) -> io::Result<()> {
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;

    let metadata = fs::symlink_metadata(dir)?;
    let refuse = |reason: &str| {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            reason.to_string(),
        ))
    };

    if !metadata.file_type().is_dir() {
        return refuse("not a directory");
    }
    if metadata.uid() != getuid().as_raw() {
        return refuse("owned by another user");
    }
    if metadata.mode() & 0o077 != 0 {
        return refuse("accessible by other users");
    }
    Ok(())
}

fn read_names(path: &Path) -> Result<Vec<String>, StoreError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| cache_error(format!("failed to read {}: {}", path.display(), e)))?;
    Ok(contents
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Bump the modification time so eviction sees this file as recently used
fn touch(path: &Path) {
    let result = fs::File::options()
        .append(true)
        .open(path)
        .and_then(|file| file.set_modified(SystemTime::now()));
    if let Err(e) = result {
        debug!("Could not refresh {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_hex_sha256() {
        let id = identity(b"");
        assert_eq!(
            id,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(is_cache_file_name(&id));
    }

    #[test]
    fn test_identity_is_deterministic() {
        assert_eq!(identity(b"store v1"), identity(b"store v1"));
        assert_ne!(identity(b"store v1"), identity(b"store v2"));
    }

    #[test]
    fn test_private_dir_created_with_owner_only_access() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("cache");
        ensure_private_dir(&dir).unwrap();
        assert_eq!(fs::metadata(&dir).unwrap().mode() & 0o777, 0o700);

        // An existing private directory is accepted as is
        ensure_private_dir(&dir).unwrap();
    }

    #[test]
    fn test_private_dir_refuses_shared_directory() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("cache");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o777)).unwrap();

        let err = ensure_private_dir(&dir).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_private_dir_refuses_symlink() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("elsewhere");
        fs::create_dir(&target).unwrap();
        let link = root.path().join("cache");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(ensure_private_dir(&link).is_err());
    }

    #[test]
    fn test_cache_file_name_filter() {
        assert!(!is_cache_file_name("launcher.log"));
        assert!(!is_cache_file_name(&"g".repeat(IDENTITY_LEN)));
        assert!(is_cache_file_name(&"a".repeat(IDENTITY_LEN)));
    }
}
