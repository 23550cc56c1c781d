//! GitHub contents API backend.
//!
//! Photos are committed to a repository as regular files. Reads decode the
//! base64 payload the API returns inline, falling back to the raw download URL
//! for files too large to be inlined. Writes look up the current blob sha so
//! an existing photo is replaced rather than rejected.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ds_config::GitHubConfig;
use ds_core::EntryKind;
use serde::Deserialize;

use crate::http::check_response;
use crate::{Entry, ImageStore, StorageError};

const USER_AGENT: &str = concat!("diffshame/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Storage backed by a GitHub repository.
#[derive(Clone)]
pub struct GitHubStore {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    branch: Option<String>,
    token: String,
}

impl std::fmt::Debug for GitHubStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubStore")
            .field("api_url", &self.api_url)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .finish_non_exhaustive()
    }
}

// Contents API payloads. A path resolves to either a single object or, for a
// directory, an array of objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentObject>),
    Single(ContentObject),
}

#[derive(Debug, Deserialize)]
struct ContentObject {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

impl ContentObject {
    fn entry(self) -> Option<Entry> {
        let kind = match self.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => return None,
        };
        Some(Entry {
            name: self.name,
            kind,
        })
    }
}

impl GitHubStore {
    /// Create a store from the `[github]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingCredential`] if the token, owner or repo
    /// is empty. No request is made in that case.
    pub fn new(config: &GitHubConfig) -> Result<Self, StorageError> {
        if config.token.is_empty() {
            return Err(StorageError::MissingCredential("github.token"));
        }
        if config.owner.is_empty() {
            return Err(StorageError::MissingCredential("github.owner"));
        }
        if config.repo.is_empty() {
            return Err(StorageError::MissingCredential("github.repo"));
        }

        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch().map(String::from),
            token: config.token.clone(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        let mut url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            encode_path(path),
        );
        if let Some(branch) = &self.branch {
            url.push_str("?ref=");
            url.push_str(&urlencoding::encode(branch));
        }
        url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn fetch_contents(&self, path: &str) -> Result<ContentsResponse, StorageError> {
        let url = self.contents_url(path);
        tracing::debug!(path, "github: fetching contents");
        let resp = self.authorized(self.http.get(&url)).send().await?;
        let resp = check_response(resp, path).await?;
        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| StorageError::Decode(e.to_string()))
    }

    async fn download(&self, url: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        tracing::debug!(path, "github: downloading raw content");
        let resp = self.authorized(self.http.get(url)).send().await?;
        let resp = check_response(resp, path).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

impl ImageStore for GitHubStore {
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        match file_source(self.fetch_contents(path).await?, path)? {
            FileSource::Inline(bytes) => Ok(bytes),
            FileSource::Download(url) => self.download(&url, path).await,
        }
    }

    async fn write(&self, path: &str, bytes: &[u8], message: &str) -> Result<(), StorageError> {
        let sha = existing_sha(self.fetch_contents(path).await, path)?;
        let body = put_body(message, bytes, sha, self.branch.as_deref());

        tracing::debug!(path, size = bytes.len(), "github: committing file");
        let resp = self
            .authorized(self.http.put(self.contents_url(path)))
            .json(&body)
            .send()
            .await?;
        check_response(resp, path).await?;
        tracing::info!(path, message, "github: file committed");
        Ok(())
    }

    async fn list_children(&self, path: &str) -> Result<Vec<Entry>, StorageError> {
        let entries = match self.fetch_contents(path).await? {
            ContentsResponse::Listing(objects) => {
                objects.into_iter().filter_map(ContentObject::entry).collect()
            }
            // The API answers a file path with the file itself.
            ContentsResponse::Single(object) => object.entry().into_iter().collect(),
        };
        Ok(entries)
    }
}

/// Where a file's bytes come from.
#[derive(Debug, PartialEq, Eq)]
enum FileSource {
    Inline(Vec<u8>),
    /// Files over the inline limit come back with empty `content`.
    Download(String),
}

fn file_source(contents: ContentsResponse, path: &str) -> Result<FileSource, StorageError> {
    let object = match contents {
        ContentsResponse::Single(object) if object.kind == "file" => object,
        _ => {
            return Err(StorageError::NotAFile {
                path: path.to_string(),
            });
        }
    };

    match (object.content.as_deref(), object.encoding.as_deref()) {
        (Some(content), Some("base64")) if !content.trim().is_empty() => {
            decode_inline(content).map(FileSource::Inline)
        }
        _ => object.download_url.map(FileSource::Download).ok_or_else(|| {
            StorageError::Decode(format!("no inline content or download URL for {path}"))
        }),
    }
}

/// The blob sha to replace, or `None` when the file does not exist yet.
fn existing_sha(
    lookup: Result<ContentsResponse, StorageError>,
    path: &str,
) -> Result<Option<String>, StorageError> {
    match lookup {
        Ok(ContentsResponse::Single(object)) if object.kind == "file" => Ok(Some(object.sha)),
        Ok(_) => Err(StorageError::NotAFile {
            path: path.to_string(),
        }),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn put_body(
    message: &str,
    bytes: &[u8],
    sha: Option<String>,
    branch: Option<&str>,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "message": message,
        "content": STANDARD.encode(bytes),
    });
    if let Some(sha) = sha {
        body["sha"] = serde_json::Value::String(sha);
    }
    if let Some(branch) = branch {
        body["branch"] = serde_json::Value::String(branch.to_string());
    }
    body
}

/// Percent-encode each path segment, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// The API wraps inline base64 at 60 columns.
fn decode_inline(content: &str) -> Result<Vec<u8>, StorageError> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| StorageError::Decode(e.to_string()))
}
