use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use super::types::{CommitEntry, Comparison, ContentEntry};
use super::{RepoCoordinates, RevisionSource};
use crate::revision::Revision;
use crate::{AppError, AppResult};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("post-history/", env!("CARGO_PKG_VERSION"));

/// Padding-indifferent standard alphabet, mirroring what browsers accept in `atob`.
const FORGIVING_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Thin wrapper over `reqwest` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: Url,
}

impl GitHubClient {
    #[tracing::instrument(name = "Building API client", level = "debug", skip(token))]
    pub fn new(api_base: &str, user_agent: &str, token: Option<&str>) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AppError::Config(format!("token is not a valid header: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            api_base: Url::parse(api_base)?,
        })
    }

    /// `{api_base}/repos/{owner}/{repo}/{segments…}`, each segment percent-encoded.
    fn endpoint<'s>(
        &self,
        coords: &RepoCoordinates,
        segments: impl IntoIterator<Item = &'s str>,
    ) -> AppResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Other(format!("{} cannot be used as a base URL", self.api_base)))?
            .pop_if_empty()
            .extend(["repos", coords.owner.as_str(), coords.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    #[tracing::instrument(name = "Requesting", level = "debug", skip(self, url), fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = resp.bytes().await?;
        trace!("Received {} bytes from {}", body.len(), url);
        let de = &mut serde_json::Deserializer::from_slice(&body);
        Ok(serde_path_to_error::deserialize(de)?)
    }
}

/// Decode the `content` field of a contents response.
pub fn decode_content(entry: &ContentEntry) -> AppResult<String> {
    if !entry.encoding.eq_ignore_ascii_case("base64") {
        return Err(AppError::Encoding(entry.encoding.clone()));
    }
    // The API wraps the payload every 60 characters.
    let compact: Vec<u8> = entry
        .content
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let bytes = FORGIVING_BASE64.decode(compact)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl RevisionSource for GitHubClient {
    #[tracing::instrument(name = "Fetching revisions", level = "info", skip(self))]
    async fn list_revisions(&self, coords: &RepoCoordinates) -> AppResult<Vec<Revision>> {
        let mut url = self.endpoint(coords, ["commits"])?;
        url.query_pairs_mut().append_pair("path", &coords.path);
        let commits: Vec<CommitEntry> = self.get_json(url).await?;
        debug!("Fetched {} revisions for {}", commits.len(), coords.path);
        Ok(commits.into_iter().map(Revision::from).collect())
    }

    #[tracing::instrument(name = "Fetching version content", level = "info", skip(self))]
    async fn file_at(&self, coords: &RepoCoordinates, sha: &str) -> AppResult<String> {
        let mut url = self.endpoint(
            coords,
            std::iter::once("contents").chain(coords.path.split('/').filter(|s| !s.is_empty())),
        )?;
        url.query_pairs_mut().append_pair("ref", sha);
        let entry: ContentEntry = self.get_json(url).await?;
        decode_content(&entry)
    }

    #[tracing::instrument(name = "Fetching diff", level = "info", skip(self))]
    async fn patch_between(
        &self,
        coords: &RepoCoordinates,
        base: &str,
        head: &str,
    ) -> AppResult<String> {
        let range = format!("{base}...{head}");
        let url = self.endpoint(coords, ["compare", range.as_str()])?;
        let comparison: Comparison = self.get_json(url).await?;
        debug!(
            "Comparison covers {} files; selecting {}",
            comparison.files.len(),
            coords.path
        );
        comparison
            .patch_for(&coords.path)
            .map(str::to_owned)
            .ok_or_else(|| AppError::MissingPatch(coords.path.clone()))
    }
}
