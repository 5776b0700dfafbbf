use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config_manager::artifact::{ArtifactFormat, Configuration};
use crate::error::ConfigError;

pub const GCS_ENDPOINT: &str = "https://storage.googleapis.com";

/// Where the configuration artifact is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    /// Cloud Storage object.
    Gcs { bucket: String, object: String },
    /// Plain HTTP(S) URL.
    Http(String),
    File(PathBuf),
}

impl ArtifactLocation {
    /// Accepted forms: `gs://bucket/object`, a bare bucket name (combined with
    /// `default_object`), `http(s)://...`, `file://path`, or a filesystem path.
    pub fn parse(raw: &str, default_object: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::unavailable("storage location is empty"));
        }

        if let Some(rest) = raw.strip_prefix("gs://") {
            let (bucket, object) = match rest.split_once('/') {
                Some((bucket, object)) if !object.is_empty() => (bucket, object),
                Some((bucket, _)) => (bucket, default_object),
                None => (rest, default_object),
            };
            if bucket.is_empty() {
                return Err(ConfigError::unavailable(format!("no bucket in {raw}")));
            }
            return Ok(Self::Gcs {
                bucket: bucket.to_string(),
                object: object.to_string(),
            });
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::Http(raw.to_string()));
        }

        if let Some(path) = raw.strip_prefix("file://") {
            return Ok(Self::File(PathBuf::from(path)));
        }

        if raw.contains('/') || raw.contains('\\') {
            return Ok(Self::File(PathBuf::from(raw)));
        }

        Ok(Self::Gcs {
            bucket: raw.to_string(),
            object: default_object.to_string(),
        })
    }

    /// Name used to pick the artifact format.
    pub fn object_name(&self) -> String {
        match self {
            Self::Gcs { object, .. } => object.clone(),
            Self::Http(url) => Url::parse(url)
                .map(|u| u.path().to_string())
                .unwrap_or_else(|_| url.clone()),
            Self::File(path) => path.to_string_lossy().into_owned(),
        }
    }

    pub fn format(&self) -> ArtifactFormat {
        ArtifactFormat::from_name(&self.object_name())
    }
}

/// Retrieves the configuration artifact from its storage location.
pub struct ArtifactFetcher {
    http: Client,
    gcs_endpoint: String,
    gcs_token: Option<String>,
}

impl ArtifactFetcher {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            gcs_endpoint: GCS_ENDPOINT.to_string(),
            gcs_token: None,
        }
    }

    pub fn with_gcs_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.gcs_endpoint = endpoint.into();
        self
    }

    pub fn with_gcs_token(mut self, token: Option<String>) -> Self {
        self.gcs_token = token;
        self
    }

    /// Fetch and parse the artifact. Any failure here is fatal for startup.
    pub async fn load(&self, location: &ArtifactLocation) -> Result<Configuration, ConfigError> {
        let content = self.fetch(location).await?;
        let config = Configuration::parse(&content, location.format())?;
        info!(
            "Loaded configuration artifact from {:?}: model={}",
            location,
            config.model_name()
        );
        Ok(config)
    }

    pub async fn fetch(&self, location: &ArtifactLocation) -> Result<String, ConfigError> {
        match location {
            ArtifactLocation::Gcs { bucket, object } => {
                let url = self.gcs_media_url(bucket, object)?;
                self.get_text(url, self.gcs_token.as_deref()).await
            }
            ArtifactLocation::Http(url) => {
                let url = Url::parse(url)
                    .map_err(|e| ConfigError::unavailable(format!("invalid artifact URL {url}: {e}")))?;
                self.get_text(url, None).await
            }
            ArtifactLocation::File(path) => read_local(path).await,
        }
    }

    fn gcs_media_url(&self, bucket: &str, object: &str) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.gcs_endpoint).map_err(|e| {
            ConfigError::unavailable(format!("invalid storage endpoint {}: {e}", self.gcs_endpoint))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ConfigError::unavailable(format!("invalid storage endpoint {}", self.gcs_endpoint))
            })?
            .pop_if_empty()
            .extend(["storage", "v1", "b", bucket, "o", object]);
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url)
    }

    async fn get_text(&self, url: Url, bearer: Option<&str>) -> Result<String, ConfigError> {
        debug!("Fetching configuration artifact from {}", url);
        let mut request = self.http.get(url.clone());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConfigError::unavailable(format!("failed to fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConfigError::unavailable(format!(
                "failed to fetch {url}: status {status}: {body}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ConfigError::unavailable(format!("failed to read {url}: {e}")))
    }
}

async fn read_local(path: &Path) -> Result<String, ConfigError> {
    debug!("Reading configuration artifact from {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::unavailable(format!("failed to read {}: {e}", path.display())))
}
