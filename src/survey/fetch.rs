// Refreshing the local snapshot of the workbook.

use std::path::PathBuf;

use crate::survey::*;

#[derive(Clone, Default)]
pub struct Credentials {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Retrieves the content of a file stored in a document library.
pub trait SnapshotFetcher {
    fn fetch(&self, remote_path: &str, credentials: &Credentials) -> SurveyResult<Vec<u8>>;
}

/// Reads the files of a document library that is synchronised on the local disk
/// by the sharing client (or mounted as a network share).
///
/// The credentials are handled by the client, they are only used for reporting.
#[derive(Debug, Clone)]
pub struct MirrorFetcher {
    pub root: PathBuf,
}

impl SnapshotFetcher for MirrorFetcher {
    fn fetch(&self, remote_path: &str, credentials: &Credentials) -> SurveyResult<Vec<u8>> {
        let p = self.root.join(remote_path.trim_start_matches('/'));
        info!(
            "fetch: {:?} from {:?} (user: {:?})",
            remote_path, self.root, credentials.user
        );
        fs::read(&p).context(FetchFailedSnafu { remote_path })
    }
}

fn partial_path(snapshot_path: &str) -> String {
    format!("{}.part", snapshot_path)
}

/// Replaces the snapshot with the current content of the remote file.
/// Returns the number of bytes written.
///
/// The content goes to a sibling file first, then replaces the snapshot in
/// one rename: a failed write leaves the previous snapshot untouched.
pub fn refresh_snapshot(
    fetcher: &dyn SnapshotFetcher,
    remote_path: &str,
    credentials: &Credentials,
    snapshot_path: &str,
) -> SurveyResult<usize> {
    let content = fetcher.fetch(remote_path, credentials)?;
    let part = partial_path(snapshot_path);
    fs::write(&part, &content).context(WritingSnapshotSnafu { path: part.clone() })?;
    fs::rename(&part, snapshot_path).context(WritingSnapshotSnafu {
        path: snapshot_path,
    })?;
    info!(
        "refresh_snapshot: {} bytes written to {:?}",
        content.len(),
        snapshot_path
    );
    Ok(content.len())
}
