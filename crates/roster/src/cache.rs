use crate::Result;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::fs;

/// Staleness bound for the cached snapshot
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Local copy of the most recent raw roster snapshot.
///
/// Freshness is judged from the file's modification time, so the cache file
/// holds the raw export bytes and nothing else.
#[derive(Clone, Debug)]
pub struct SnapshotCache {
    path: PathBuf,
    max_age: Duration,
}

impl SnapshotCache {
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    /// Age of the cache file, `None` if it does not exist.
    ///
    /// A modification time in the future counts as age zero.
    pub async fn age(&self) -> Result<Option<Duration>> {
        let meta = match fs::metadata(&self.path).await {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let modified = meta.modified()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        Ok(Some(age))
    }

    /// Cached bytes if the file exists and is younger than `max_age`
    pub async fn load_fresh(&self) -> Result<Option<Vec<u8>>> {
        let Some(age) = self.age().await? else {
            log::debug!("Roster cache miss: {} does not exist", self.path.display());
            return Ok(None);
        };
        if age >= self.max_age {
            log::debug!(
                "Roster cache stale: {} is {}s old (max {}s)",
                self.path.display(),
                age.as_secs(),
                self.max_age.as_secs()
            );
            return Ok(None);
        }

        match fs::read(&self.path).await {
            Ok(bytes) => {
                log::debug!(
                    "Roster cache hit: {} ({} bytes, {}s old)",
                    self.path.display(),
                    bytes.len(),
                    age.as_secs()
                );
                Ok(Some(bytes))
            }
            // Replaced or removed between stat and read.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the cached snapshot. Readers never observe a partial file:
    /// bytes go to a sibling temp file which is then renamed into place.
    pub async fn store(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, bytes).await?;
        if let Err(err) = fs::rename(&tmp, &self.path).await {
            fs::remove_file(&tmp).await.ok();
            return Err(err.into());
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "roster".into());
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}
