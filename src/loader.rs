//! Loading the corpus from the local filesystem or from the Super Check Partial website.
//!
//! The local copy of `MASTER.SCP` lives in `~/.config/hamradio`. [`update`] only downloads
//! a new copy if the local one is missing or outdated, and [`download`] never replaces the
//! local copy with something that cannot be read as a corpus.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::LAST_MODIFIED;
use thiserror::Error;
use tracing::{debug, info};

use crate::database::store::{Database, DatabaseError};
use crate::matching::engine::MatchingConfig;
use crate::parsing::call_history::CallHistoryParser;
use crate::parsing::scp::ScpParser;

/// Where the Super Check Partial database is published
pub const DEFAULT_URL: &str = "http://www.supercheckpartial.com/MASTER.SCP";

/// Path of the local copy, relative to the home directory
pub const DEFAULT_LOCAL_FILENAME: &str = ".config/hamradio/MASTER.SCP";

/// A local copy older than this is refreshed if the server does not tell when the
/// remote file was last modified
pub const MAX_LOCAL_AGE_HOURS: i64 = 24;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid corpus: {0}")]
    Database(#[from] DatabaseError),

    #[error("Downloaded corpus contains no callsigns")]
    EmptyCorpus,

    #[error("Cannot determine the home directory")]
    NoHomeDirectory,
}

/// Layout of a corpus file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorpusFormat {
    /// One callsign per line, `#` starts a comment
    #[default]
    Scp,
    /// Comma separated call history with `!!Order!!` directives
    CallHistory,
}

/// Absolute path of the default local copy in the current user's home directory
///
/// # Errors
///
/// Returns `LoadError::NoHomeDirectory` if the home directory cannot be determined.
pub fn local_filename() -> Result<PathBuf, LoadError> {
    let home = dirs::home_dir().ok_or(LoadError::NoHomeDirectory)?;
    Ok(home.join(DEFAULT_LOCAL_FILENAME))
}

/// Load a database from a file in the local filesystem
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn load_local(path: &Path, format: CorpusFormat) -> Result<Database, LoadError> {
    load_local_with_config(path, format, MatchingConfig::default())
}

/// Load a database from a local file with a custom matching configuration
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn load_local_with_config(
    path: &Path,
    format: CorpusFormat,
    config: MatchingConfig,
) -> Result<Database, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let database = match format {
        CorpusFormat::Scp => Database::read_with_config(reader, ScpParser::new(), config)?,
        CorpusFormat::CallHistory => {
            Database::read_with_config(reader, CallHistoryParser::new(), config)?
        }
    };
    debug!(path = %path.display(), entries = database.entry_count(), "Loaded local corpus");
    Ok(database)
}

/// Load a Super Check Partial database directly from a remote URL
///
/// # Errors
///
/// Returns an error if the request fails or the response cannot be read.
pub async fn load_remote(url: &str) -> Result<Database, LoadError> {
    let body = fetch(url).await?;
    Ok(Database::read_scp(body.as_slice())?)
}

/// Download the corpus and store it at the given path.
///
/// The response is parsed before anything is written; the file is replaced atomically, so
/// a failed download leaves the previous local copy intact.
///
/// # Errors
///
/// Returns an error if the request fails, the response contains no callsigns, or the
/// file cannot be written.
pub async fn download(url: &str, path: &Path) -> Result<(), LoadError> {
    let body = fetch(url).await?;
    let database = Database::read_scp(body.as_slice())?;
    if database.is_empty() {
        return Err(LoadError::EmptyCorpus);
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(&body)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;

    info!(
        url,
        path = %path.display(),
        entries = database.entry_count(),
        "Downloaded corpus"
    );
    Ok(())
}

/// Update the local copy from the given URL, but only if it is missing or outdated.
///
/// Returns `true` if a new copy was downloaded.
///
/// # Errors
///
/// Returns an error if checking the remote file or downloading it fails.
pub async fn update(url: &str, path: &Path) -> Result<bool, LoadError> {
    let local = local_modified(path);
    let remote = match local {
        Some(_) => remote_modified(url).await?,
        None => None,
    };

    if !is_outdated(local, remote, Utc::now()) {
        debug!(path = %path.display(), "Local corpus is up to date");
        return Ok(false);
    }

    download(url, path).await?;
    Ok(true)
}

/// Decide whether the local copy must be refreshed.
///
/// A missing copy is always outdated. If the remote modification time is known, the copy
/// is outdated when it is older; otherwise when it is older than [`MAX_LOCAL_AGE_HOURS`].
#[must_use]
pub fn is_outdated(
    local: Option<DateTime<Utc>>,
    remote: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    match (local, remote) {
        (None, _) => true,
        (Some(local), Some(remote)) => local < remote,
        (Some(local), None) => now - local > TimeDelta::hours(MAX_LOCAL_AGE_HOURS),
    }
}

fn local_modified(path: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Utc>::from(modified))
}

async fn remote_modified(url: &str) -> Result<Option<DateTime<Utc>>, LoadError> {
    let response = reqwest::Client::new()
        .head(url)
        .send()
        .await?
        .error_for_status()?;

    let modified = response
        .headers()
        .get(LAST_MODIFIED)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
        .map(|value| value.with_timezone(&Utc));
    Ok(modified)
}

async fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const CORPUS: &str = "# Test corpus\nDL1ABC\nDK1AB\n";

    /// Serve every request with the given body until the test ends
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buffer = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buffer).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buffer[..n]),
                    }
                }
                let head = request.starts_with(b"HEAD");
                let mut response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                if !head {
                    response.push_str(body);
                }
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{address}/MASTER.SCP")
    }

    #[test]
    fn test_local_filename_is_in_home() {
        if let Ok(path) = local_filename() {
            assert!(path.ends_with(".config/hamradio/MASTER.SCP"));
        }
    }

    #[test]
    fn test_is_outdated() {
        let now = Utc::now();
        let hour = TimeDelta::hours(1);

        assert!(is_outdated(None, None, now));
        assert!(is_outdated(None, Some(now), now));

        assert!(is_outdated(Some(now - hour), Some(now), now));
        assert!(!is_outdated(Some(now), Some(now - hour), now));
        assert!(!is_outdated(Some(now), Some(now), now));

        assert!(!is_outdated(Some(now - hour), None, now));
        assert!(is_outdated(Some(now - TimeDelta::days(2)), None, now));
    }

    #[test]
    fn test_load_local_formats() {
        let dir = tempfile::tempdir().unwrap();

        let scp = dir.path().join("MASTER.SCP");
        std::fs::write(&scp, CORPUS).unwrap();
        let database = load_local(&scp, CorpusFormat::Scp).unwrap();
        assert_eq!(database.entry_count(), 2);
        assert!(database.field_set().is_none());

        let history = dir.path().join("test.txt");
        std::fs::write(&history, "!!Order!!,Call,Name\nDL1ABC,Klaus\n").unwrap();
        let database = load_local(&history, CorpusFormat::CallHistory).unwrap();
        assert_eq!(database.entry_count(), 1);
        assert!(database.field_set().is_some());
    }

    #[test]
    fn test_load_local_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_local(&dir.path().join("missing.scp"), CorpusFormat::Scp);
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_remote() {
        let url = serve("200 OK", CORPUS).await;
        let database = load_remote(&url).await.unwrap();
        assert_eq!(database.find_strings("DL1AB").unwrap(), vec!["DL1ABC", "DK1AB"]);
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let url = serve("200 OK", CORPUS).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hamradio").join("MASTER.SCP");

        download(&url, &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CORPUS);
    }

    #[tokio::test]
    async fn test_failed_download_keeps_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MASTER.SCP");
        std::fs::write(&path, CORPUS).unwrap();

        let url = serve("404 Not Found", "").await;
        assert!(matches!(
            download(&url, &path).await,
            Err(LoadError::Http(_))
        ));

        let url = serve("200 OK", "# only comments\n").await;
        assert!(matches!(
            download(&url, &path).await,
            Err(LoadError::EmptyCorpus)
        ));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), CORPUS);
    }

    #[tokio::test]
    async fn test_update_downloads_missing_copy() {
        let url = serve("200 OK", CORPUS).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MASTER.SCP");

        assert!(update(&url, &path).await.unwrap());
        assert!(path.exists());

        // fresh copy, no Last-Modified header
        assert!(!update(&url, &path).await.unwrap());
    }
}
