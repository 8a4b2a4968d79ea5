use log::{debug, info};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::download::{self, DEFAULT_CHUNK_SIZE, utils};
use crate::synapse::config::SynapseConfig;
use crate::synapse::error::SynapseError;
use crate::synapse::model::{ErrorResponse, Submission, UserProfile};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client shared by API calls and file transfers.
///
/// Only connecting is bounded; a transfer may take as long as the file needs.
pub(crate) fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(None::<Duration>)
        .build()
}

/// An authenticated connection to the Synapse repository service.
pub struct Session {
    http: Client,
    repo_endpoint: Url,
    auth_token: String,
    profile: UserProfile,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("repo_endpoint", &self.repo_endpoint.as_str())
            .field("user_name", &self.profile.user_name)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Authenticate with the token from `config` and fetch the caller's profile.
    pub fn login(config: &SynapseConfig) -> Result<Self, SynapseError> {
        let auth_token = config
            .auth_token
            .clone()
            .ok_or_else(|| SynapseError::MissingCredentials(config.source.clone()))?;

        let http = http_client()?;
        let url = endpoint_url(&config.repo_endpoint, &["userProfile"])?;
        debug!(
            "Logging in to {} as {}",
            config.repo_endpoint,
            config.username.as_deref().unwrap_or("<token owner>")
        );
        let response = http.get(url).bearer_auth(&auth_token).send()?;
        let profile: UserProfile = error_for_status(response)?.json()?;
        info!("Logged in as {} ({})", profile.user_name, profile.owner_id);

        Ok(Session {
            http,
            repo_endpoint: config.repo_endpoint.clone(),
            auth_token,
            profile,
        })
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn get_submission(&self, submission_id: &str) -> Result<Submission, SynapseError> {
        let url = endpoint_url(
            &self.repo_endpoint,
            &["evaluation", "submission", submission_id],
        )?;
        Ok(self.get(url)?.json()?)
    }

    /// Resolve the pre-signed URL of a file attached to a submission.
    pub fn submission_file_url(
        &self,
        submission_id: &str,
        file_handle_id: &str,
    ) -> Result<Url, SynapseError> {
        let mut url = endpoint_url(
            &self.repo_endpoint,
            &["evaluation", "submission", submission_id, "file", file_handle_id],
        )?;
        url.query_pairs_mut().append_pair("redirect", "false");
        let body = self.get(url)?.text()?;
        Url::parse(body.trim())
            .map_err(|e| SynapseError::MalformedResponse(format!("file URL {body:?}: {e}")))
    }

    /// Download the file attached to `submission_id` under `location`.
    ///
    /// `location` is an existing file to overwrite, or a directory (created if
    /// missing) that receives the file under its original name.
    pub fn download_submission_file(
        &self,
        submission_id: &str,
        location: &Path,
    ) -> Result<PathBuf, SynapseError> {
        let submission = self.get_submission(submission_id)?;
        let bundle = submission
            .entity_bundle()
            .map_err(|e| SynapseError::MalformedResponse(format!("entity bundle: {e}")))?;

        let no_file = |entity_type: Option<String>| SynapseError::NoDownloadableFile {
            submission_id: submission.id.clone(),
            entity_type,
        };
        let bundle = bundle.ok_or_else(|| no_file(None))?;
        let file_handle_id = bundle
            .entity
            .data_file_handle_id
            .as_deref()
            .ok_or_else(|| no_file(bundle.entity.concrete_type.clone()))?;

        let url = self.submission_file_url(&submission.id, file_handle_id)?;
        let file_name = match bundle.file_handle(file_handle_id) {
            Some(handle) => utils::sanitize_file_name(&handle.file_name),
            None => utils::file_name_from_url(&url),
        };
        let destination = utils::resolve_destination(location, &file_name);
        debug!(
            "Downloading file handle {} of submission {} ({}) to {}",
            file_handle_id,
            submission.id,
            submission.entity_id.as_deref().unwrap_or("unknown entity"),
            destination.display()
        );

        download::download_file_blocking(&self.http, url, &destination, DEFAULT_CHUNK_SIZE)?;
        Ok(destination)
    }

    fn get(&self, url: Url) -> Result<Response, SynapseError> {
        debug!("GET {url}");
        let response = self.http.get(url).bearer_auth(&self.auth_token).send()?;
        error_for_status(response)
    }
}

/// Append `segments` to `base`, percent-encoding each one.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, SynapseError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SynapseError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map a non-success response onto the error taxonomy, using the service's
/// `reason` when the body carries one.
pub(crate) fn error_for_status(response: Response) -> Result<Response, SynapseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let fallback = status.canonical_reason().unwrap_or("unknown error").to_string();
    let reason = response
        .json::<ErrorResponse>()
        .map(|body| body.reason)
        .unwrap_or(fallback);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SynapseError::Unauthorized(reason),
        StatusCode::NOT_FOUND => SynapseError::NotFound(reason),
        _ => SynapseError::Server {
            status: status.as_u16(),
            reason,
        },
    })
}
