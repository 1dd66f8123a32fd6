//! GitHub REST API release host.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::{
    CreatedRelease, HostError, HostResult, LatestRelease, NewRelease, ReleaseHost, RepoSlug,
};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    id: u64,
    tag_name: String,
    #[serde(default)]
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// GitHub releases for one repository.
pub struct GitHubHost {
    client: reqwest::Client,
    runtime: Runtime,
    api_url: String,
    slug: RepoSlug,
    token: String,
}

impl GitHubHost {
    /// Creates a host for `slug`, authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the async runtime cannot be built.
    pub fn new(slug: RepoSlug, token: impl Into<String>) -> HostResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = reqwest::Client::builder()
            .user_agent(concat!("shipmate/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| HostError::Client(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HostError::Client(e.to_string()))?;

        Ok(Self {
            client,
            runtime,
            api_url: DEFAULT_API_URL.to_string(),
            slug,
            token: token.into(),
        })
    }

    /// Uses another API endpoint, e.g. a GitHub Enterprise server.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the repository this host targets.
    #[must_use]
    pub fn slug(&self) -> &RepoSlug {
        &self.slug
    }

    fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url, self.slug.owner, self.slug.repo
        )
    }

    async fn fetch_latest(&self) -> HostResult<LatestRelease> {
        let url = format!("{}/latest", self.releases_url());
        debug!(%url, "fetching latest release");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| HostError::Request {
                url: url.clone(),
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(LatestRelease::NotFound);
        }

        let response = ensure_success(response).await?;
        let release: ReleaseResponse =
            response
                .json()
                .await
                .map_err(|source| HostError::Request {
                    url: url.clone(),
                    source,
                })?;

        Ok(LatestRelease::Found {
            tag_name: release.tag_name,
        })
    }

    async fn post_release(&self, release: &NewRelease) -> HostResult<CreatedRelease> {
        let url = self.releases_url();
        debug!(%url, tag = %release.tag_name, "creating release");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(release)
            .send()
            .await
            .map_err(|source| HostError::Request {
                url: url.clone(),
                source,
            })?;

        let response = ensure_success(response).await?;
        let created: ReleaseResponse =
            response
                .json()
                .await
                .map_err(|source| HostError::Request {
                    url: url.clone(),
                    source,
                })?;

        Ok(CreatedRelease {
            id: created.id,
            html_url: created.html_url,
        })
    }
}

/// Turns a failure status into [`HostError::Api`], keeping GitHub's message.
async fn ensure_success(response: reqwest::Response) -> HostResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);

    Err(HostError::Api {
        status: status.as_u16(),
        message,
    })
}

impl ReleaseHost for GitHubHost {
    fn latest_release(&self) -> HostResult<LatestRelease> {
        self.runtime.block_on(self.fetch_latest())
    }

    fn create_release(&self, release: &NewRelease) -> HostResult<CreatedRelease> {
        self.runtime.block_on(self.post_release(release))
    }
}
