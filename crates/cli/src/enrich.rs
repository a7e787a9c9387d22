//! Optional GitHub profile lookup shown under each ranked reviewer.
//!
//! Nothing here can fail a run: every error is logged and becomes "no
//! profile".

use crate::config::EnrichmentConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const SHOWCASE_QUERY: &str = r#"
query($login: String!) {
    user(login: $login) {
        name
        bio
        itemShowcase {
            items(first: 3) {
                edges {
                    node {
                        ... on Repository {
                            name
                            description
                            primaryLanguage { name }
                        }
                    }
                }
            }
        }
    }
}
"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Profile {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub repositories: Vec<ShowcaseRepo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowcaseRepo {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
}

#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn lookup(&self, username: &str) -> Option<Profile>;
}

pub struct GithubProfiles {
    client: Client,
    endpoint: String,
    token: String,
}

impl GithubProfiles {
    /// `None` when the token variable is unset or the client cannot be built
    pub fn from_config(cfg: &EnrichmentConfig) -> Option<Self> {
        let Some(token) = std::env::var(&cfg.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
        else {
            log::debug!("{} not set; skipping GitHub profiles", cfg.token_env);
            return None;
        };

        Self::new(&cfg.endpoint, token, cfg.timeout())
    }

    /// `None` when the HTTP client cannot be built
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Option<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("reviewer-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| log::warn!("Cannot build GitHub client: {err}"))
            .ok()?;

        Some(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    async fn fetch(&self, username: &str) -> Result<Option<Profile>> {
        let body = json!({
            "query": SHOWCASE_QUERY,
            "variables": { "login": username },
        });
        let response: GraphqlResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("POST {}", self.endpoint))?
            .json()
            .await
            .context("Malformed GraphQL response")?;

        Ok(profile_from_response(response))
    }
}

#[async_trait]
impl ProfileLookup for GithubProfiles {
    async fn lookup(&self, username: &str) -> Option<Profile> {
        match self.fetch(username).await {
            Ok(profile) => profile,
            Err(err) => {
                log::warn!("GitHub profile lookup for {username} failed: {err:#}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    user: Option<GithubUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GithubUser {
    name: Option<String>,
    bio: Option<String>,
    item_showcase: Option<ItemShowcase>,
}

#[derive(Debug, Deserialize)]
struct ItemShowcase {
    items: Option<ShowcaseItems>,
}

#[derive(Debug, Deserialize)]
struct ShowcaseItems {
    #[serde(default)]
    edges: Vec<ShowcaseEdge>,
}

#[derive(Debug, Deserialize)]
struct ShowcaseEdge {
    node: Option<ShowcaseNode>,
}

// Non-repository showcase items come back as empty objects.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShowcaseNode {
    name: Option<String>,
    description: Option<String>,
    primary_language: Option<NamedLanguage>,
}

#[derive(Debug, Deserialize)]
struct NamedLanguage {
    name: Option<String>,
}

fn profile_from_response(response: GraphqlResponse) -> Option<Profile> {
    for err in &response.errors {
        log::warn!("GitHub GraphQL error: {}", err.message);
    }
    let user = response.data?.user?;

    let repositories = user
        .item_showcase
        .and_then(|s| s.items)
        .map(|items| items.edges)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|edge| {
            let node = edge.node?;
            Some(ShowcaseRepo {
                name: node.name?,
                description: node.description,
                language: node.primary_language.and_then(|l| l.name),
            })
        })
        .collect();

    Some(Profile {
        name: user.name,
        bio: user.bio,
        repositories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn parse(raw: &str) -> Option<Profile> {
        profile_from_response(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn reads_bio_and_showcase_repositories() {
        let profile = parse(
            r#"{"data":{"user":{
                "name":"Ada",
                "bio":"compilers\r\nand parsers",
                "itemShowcase":{"items":{"edges":[
                    {"node":{"name":"lexer","description":"A lexer","primaryLanguage":{"name":"Rust"}}},
                    {"node":{}},
                    {"node":{"name":"notes","description":null,"primaryLanguage":null}}
                ]}}
            }}}"#,
        )
        .unwrap();

        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert_eq!(profile.bio.as_deref(), Some("compilers\r\nand parsers"));
        assert_eq!(
            profile.repositories,
            vec![
                ShowcaseRepo {
                    name: "lexer".into(),
                    description: Some("A lexer".into()),
                    language: Some("Rust".into()),
                },
                ShowcaseRepo {
                    name: "notes".into(),
                    description: None,
                    language: None,
                },
            ]
        );
    }

    #[test]
    fn unknown_user_has_no_profile() {
        assert_eq!(
            parse(r#"{"data":{"user":null},"errors":[{"message":"Could not resolve to a User"}]}"#),
            None
        );
        assert_eq!(parse(r#"{"errors":[{"message":"Bad credentials"}]}"#), None);
    }

    #[test]
    fn missing_showcase_is_empty() {
        let profile = parse(r#"{"data":{"user":{"name":null,"bio":null,"itemShowcase":null}}}"#)
            .unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn missing_token_disables_lookup() {
        let cfg = EnrichmentConfig {
            token_env: "REVIEWER_FINDER_TEST_TOKEN_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(GithubProfiles::from_config(&cfg).is_none());
    }

    /// Read one full request (headers and content-length body), then answer
    /// with a bare 500. Returns the endpoint URL.
    async fn failing_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            let body_start = loop {
                let n = stream.read(&mut buf).await.unwrap();
                assert!(n > 0, "client hung up before sending headers");
                request.extend_from_slice(&buf[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break end + 4;
                }
            };
            let headers = String::from_utf8_lossy(&request[..body_start]).to_lowercase();
            let length: usize = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map_or(0, |v| v.trim().parse().unwrap());
            while request.len() < body_start + length {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                )
                .await
                .unwrap();
            stream.shutdown().await.ok();
        });
        format!("http://{addr}/graphql")
    }

    #[tokio::test]
    async fn server_error_means_no_profile() {
        let endpoint = failing_endpoint().await;
        let profiles = GithubProfiles::new(endpoint, "token", Duration::from_secs(5)).unwrap();

        assert_eq!(profiles.lookup("ada").await, None);
    }

    #[tokio::test]
    async fn unreachable_endpoint_means_no_profile() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let profiles =
            GithubProfiles::new(format!("http://{addr}/graphql"), "token", Duration::from_secs(5))
                .unwrap();

        assert_eq!(profiles.lookup("ada").await, None);
    }
}
