use crate::models::error::SError;
use camino::{Utf8Path, Utf8PathBuf};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use tracing::debug;

/// Process-wide exclusive lock: an OS advisory lock on an open handle to the
/// lock file. The OS releases it when the handle closes, including on abort.
#[derive(Debug)]
pub struct InstanceLock {
    path: Utf8PathBuf,
    file: File,
}

fn is_contended(e: &std::io::Error) -> bool {
    e.kind() == ErrorKind::WouldBlock || e.raw_os_error() == fs4::lock_contended_error().raw_os_error()
}

impl InstanceLock {
    /// `Ok(None)` when another handle already holds the lock.
    pub fn acquire(path: &Utf8Path) -> Result<Option<Self>, SError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // never truncate before the lock is ours
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if is_contended(&e) => {
                debug!("Instance lock {path} is held elsewhere");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        // pid is informational only
        file.set_len(0)?;
        write!(file, "{}", std::process::id())?;
        debug!("Instance lock acquired at {path}");

        Ok(Some(Self {
            path: path.to_owned(),
            file,
        }))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_path(tmp: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().join("run/app.lock")).unwrap()
    }

    #[test]
    fn second_acquire_is_contended_until_release() {
        let tmp = tempfile::tempdir().unwrap();
        let path = lock_path(&tmp);

        let first = InstanceLock::acquire(&path).unwrap();
        assert!(first.is_some());
        assert!(InstanceLock::acquire(&path).unwrap().is_none());

        drop(first);
        assert!(InstanceLock::acquire(&path).unwrap().is_some());
    }

    #[test]
    fn empty_file_held_by_another_handle_is_contended() {
        let tmp = tempfile::tempdir().unwrap();
        let path = lock_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        // another instance that has locked but not yet written anything
        let holder = File::create(&path).unwrap();
        holder.try_lock_exclusive().unwrap();

        assert!(InstanceLock::acquire(&path).unwrap().is_none());

        FileExt::unlock(&holder).unwrap();
        drop(holder);
        assert!(InstanceLock::acquire(&path).unwrap().is_some());
    }

    #[test]
    fn leftover_file_without_holder_is_reused() {
        let tmp = tempfile::tempdir().unwrap();
        let path = lock_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "4242").unwrap();

        let lock = InstanceLock::acquire(&path).unwrap().expect("leftover file reused");
        drop(lock);
        let pid = std::fs::read_to_string(&path).unwrap();
        assert_eq!(pid, std::process::id().to_string());
    }
}
