//! Session store persisted as a small JSON file.
//!
//! The file holds the token/role/username triple. A missing file or a
//! missing parent directory reads as a logged-out session.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::atomic_io::{remove_if_present, write_atomic};
use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionIdentity, StoredSession};

#[derive(Default, Serialize, Deserialize)]
struct SessionFileDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl From<SessionFileDto> for StoredSession {
    fn from(dto: SessionFileDto) -> Self {
        Self {
            token: dto.token,
            role: dto.role,
            username: dto.username,
        }
    }
}

/// Session store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    parent: Utf8PathBuf,
    file_name: String,
}

impl FileSessionStore {
    /// Store the session at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Write`] when `path` does not name a file.
    pub fn new(path: impl AsRef<Utf8Path>) -> Result<Self, SessionStoreError> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| {
            SessionStoreError::write(format!("session path '{path}' must name a file"))
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        Ok(Self {
            parent,
            file_name: file_name.to_owned(),
        })
    }

    /// Full path of the session file.
    pub fn path(&self) -> Utf8PathBuf {
        self.parent.join(&self.file_name)
    }

    fn open_parent(&self) -> io::Result<Dir> {
        Dir::open_ambient_dir(&self.parent, ambient_authority())
    }

    fn read_error(&self, err: impl std::fmt::Display) -> SessionStoreError {
        SessionStoreError::read(format!("{}: {err}", self.path()))
    }

    fn write_error(&self, err: impl std::fmt::Display) -> SessionStoreError {
        SessionStoreError::write(format!("{}: {err}", self.path()))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<StoredSession, SessionStoreError> {
        let dir = match self.open_parent() {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(StoredSession::empty()),
            Err(err) => return Err(self.read_error(err)),
        };
        let contents = match dir.read_to_string(&self.file_name) {
            Ok(contents) => Zeroizing::new(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(StoredSession::empty()),
            Err(err) => return Err(self.read_error(err)),
        };
        let dto: SessionFileDto =
            serde_json::from_str(&contents).map_err(|err| self.read_error(err))?;
        Ok(dto.into())
    }

    fn save(&self, identity: &SessionIdentity) -> Result<(), SessionStoreError> {
        std::fs::create_dir_all(&self.parent).map_err(|err| self.write_error(err))?;
        let dir = self.open_parent().map_err(|err| self.write_error(err))?;
        let dto = SessionFileDto {
            token: Some(identity.token().to_owned()),
            role: Some(identity.role().to_owned()),
            username: Some(identity.username().to_owned()),
        };
        let contents =
            Zeroizing::new(serde_json::to_vec(&dto).map_err(|err| self.write_error(err))?);
        write_atomic(&dir, &self.file_name, &contents).map_err(|err| self.write_error(err))
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let dir = match self.open_parent() {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(self.write_error(err)),
        };
        remove_if_present(&dir, &self.file_name).map_err(|err| self.write_error(err))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    struct Workspace {
        _tmp: tempfile::TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn workspace() -> Workspace {
        let tmp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 temp path");
        Workspace { _tmp: tmp, root }
    }

    fn identity() -> SessionIdentity {
        SessionIdentity::try_new("jwt", "ROLE_CUSTOMER", "ada").expect("identity")
    }

    #[rstest]
    fn missing_file_reads_as_logged_out(workspace: Workspace) {
        let store = FileSessionStore::new(workspace.root.join("nested/dir/session.json"))
            .expect("store");
        assert_eq!(store.load().expect("load"), StoredSession::empty());
        store.clear().expect("clearing nothing succeeds");
    }

    #[rstest]
    fn save_creates_parents_and_persists_triple(workspace: Workspace) {
        let path = workspace.root.join(".loanflow/session.json");
        let store = FileSessionStore::new(&path).expect("store");
        store.save(&identity()).expect("save");

        let reopened = FileSessionStore::new(&path).expect("store");
        let loaded = reopened.load().expect("load");
        assert_eq!(loaded.token(), Some("jwt"));
        assert_eq!(loaded.normalized_role(), "CUSTOMER");
        assert_eq!(loaded.username.as_deref(), Some("ada"));
    }

    #[cfg(unix)]
    #[rstest]
    fn saved_session_is_readable_by_owner_only(workspace: Workspace) {
        use std::os::unix::fs::PermissionsExt;

        let path = workspace.root.join("session.json");
        let store = FileSessionStore::new(&path).expect("store");
        store.save(&identity()).expect("first save");
        store.save(&identity()).expect("replacing save");

        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[rstest]
    fn clear_removes_every_entry(workspace: Workspace) {
        let path = workspace.root.join("session.json");
        let store = FileSessionStore::new(&path).expect("store");
        store.save(&identity()).expect("save");
        store.clear().expect("clear");
        assert!(!path.exists());
        assert_eq!(store.load().expect("load"), StoredSession::empty());
    }

    #[rstest]
    fn corrupt_file_is_a_read_error(workspace: Workspace) {
        let path = workspace.root.join("session.json");
        std::fs::write(&path, "{ not json").expect("seed corrupt file");
        let err = FileSessionStore::new(&path)
            .expect("store")
            .load()
            .expect_err("corrupt file");
        assert!(matches!(err, SessionStoreError::Read { .. }));
    }

    #[rstest]
    fn partial_file_keeps_missing_entries_absent(workspace: Workspace) {
        let path = workspace.root.join("session.json");
        std::fs::write(&path, r#"{"role":"ADMIN"}"#).expect("seed partial file");
        let loaded = FileSessionStore::new(&path)
            .expect("store")
            .load()
            .expect("load");
        assert!(!loaded.is_logged_in());
        assert_eq!(loaded.role(), Some("ADMIN"));
    }

    #[test]
    fn bare_file_names_live_in_the_working_directory() {
        let store = FileSessionStore::new("session.json").expect("store");
        assert_eq!(store.path(), Utf8PathBuf::from("./session.json"));
    }

    #[test]
    fn directory_paths_are_rejected() {
        assert!(FileSessionStore::new("..").is_err());
    }
}
