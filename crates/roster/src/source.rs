use crate::cache::SnapshotCache;
use crate::snapshot::parse_snapshot;
use crate::{ReviewerRecord, Result, RosterError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// CSV export of the public reviewer sign-up sheet
pub const DEFAULT_ROSTER_URL: &str =
    "https://docs.google.com/spreadsheets/d/1PAPRJ63yq9aPC1COLjaQp8mHmEq3rZUzwUYxTulyu78/export?format=csv";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can produce a raw roster export
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// Fetches the roster export with a single GET
pub struct HttpSnapshotFetcher {
    client: Client,
    url: String,
}

impl HttpSnapshotFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("reviewer-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| RosterError::upstream(format!("cannot build HTTP client: {err}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SnapshotFetcher for HttpSnapshotFetcher {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| RosterError::upstream(format!("GET {}: {err}", self.url)))?
            .error_for_status()
            .map_err(|err| RosterError::upstream(format!("GET {}: {err}", self.url)))?;

        let body = response
            .bytes()
            .await
            .map_err(|err| RosterError::upstream(format!("GET {}: {err}", self.url)))?;
        Ok(body.to_vec())
    }
}

/// Supplies the current roster, refetching only when the cache is stale
pub struct RosterSource<F> {
    fetcher: F,
    cache: SnapshotCache,
}

impl<F: SnapshotFetcher> RosterSource<F> {
    pub const fn new(fetcher: F, cache: SnapshotCache) -> Self {
        Self { fetcher, cache }
    }

    /// Load the roster. `refresh` bypasses the cache.
    ///
    /// A failed fetch is an error even if a stale cache file exists.
    pub async fn load(&self, refresh: bool) -> Result<Vec<ReviewerRecord>> {
        if !refresh {
            if let Some(bytes) = self.cache.load_fresh().await? {
                return parse_snapshot(&bytes);
            }
        }

        let bytes = self.fetcher.fetch().await?;
        log::info!("Fetched roster snapshot ({} bytes)", bytes.len());

        // Parse before caching so a malformed export never replaces a good one.
        let records = parse_snapshot(&bytes)?;
        self.cache.store(&bytes).await?;
        Ok(records)
    }
}
