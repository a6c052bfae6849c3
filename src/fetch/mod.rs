//! Resilient image fetching.
//!
//! Each call to [`Fetcher::fetch`] runs a small state machine:
//!
//! - **Attempting**: one streaming `GET`. The timeout bounds connecting,
//!   waiting for the response head, and each body read, not the whole
//!   transfer.
//!   4xx and a disallowed content type end the call at once; 5xx and
//!   transport failures move to *RetryWait*.
//! - **RetryWait**: sleep the fixed delay, then attempt again until the
//!   attempt budget is spent.
//! - **Terminal**: a [`FetchOutcome`].
//!
//! A destination that already exists short-circuits before any request
//! unless re-download is forced. Bodies are streamed into a temporary file
//! next to the destination and renamed into place, so only a successful
//! fetch ever touches the destination path.

mod mime;
mod retry;

pub use mime::MimePolicy;

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{RescueError, Result};
use crate::media::extension_or_default;
use crate::model::outcome::FetchOutcome;

use self::retry::AttemptError;

/// Per-call fetch settings.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Content types that may be written to disk.
    pub allowed: MimePolicy,
    /// Attempts before giving up on 5xx and transport failures.
    pub max_attempts: u32,
    /// Fixed wait between attempts.
    pub retry_delay: Duration,
    /// Re-download even if the destination exists.
    pub force: bool,
}

/// HTTP client wrapper that downloads single images.
///
/// Cheap to share by reference across concurrent fetches.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    read_timeout: Duration,
    cancel: CancellationToken,
}

impl Fetcher {
    /// Build a fetcher sending `user_agent`. `timeout` applies to
    /// connecting and to every single read, so slow but steady bodies
    /// still complete.
    ///
    /// Cancelling `cancel` aborts in-flight requests and retry waits.
    pub fn new(user_agent: &str, timeout: Duration, cancel: CancellationToken) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            read_timeout: timeout,
            cancel,
        })
    }

    /// `true` once the run has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Download `url` to `destination`.
    ///
    /// The destination's extension is replaced by the URL's image
    /// extension (`jpg` if it has none). Only filesystem failures on the
    /// destination side are returned as `Err`.
    pub async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        policy: &FetchPolicy,
    ) -> Result<FetchOutcome> {
        let target = corrected_path(url, destination);

        if !policy.force && target.exists() {
            debug!(path = %target.display(), "File already exists, skipping");
            return Ok(FetchOutcome::SkippedExisting(target));
        }

        let max_attempts = policy.max_attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            if self.is_cancelled() {
                return Ok(FetchOutcome::Cancelled);
            }
            attempt += 1;

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(FetchOutcome::Cancelled),
                result = self.attempt(url, &target, &policy.allowed) => result,
            };

            let err = match result {
                Ok(bytes) => {
                    info!(path = %target.display(), bytes, "Downloaded");
                    return Ok(FetchOutcome::Downloaded {
                        path: target,
                        bytes,
                    });
                }
                Err(AttemptError::ClientError(status)) => {
                    warn!(url, status, "Client error, will not retry");
                    return Ok(FetchOutcome::SkippedClientError(status));
                }
                Err(AttemptError::WrongMime(content_type)) => {
                    warn!(url, content_type = %content_type, "Content type not allowed, skipping");
                    return Ok(FetchOutcome::SkippedWrongMime(content_type));
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(
                    err @ (AttemptError::ServerError(_)
                    | AttemptError::Transport(_)
                    | AttemptError::Timeout(_)),
                ) => err,
            };

            if attempt >= max_attempts {
                error!(url, attempts = attempt, error = %err, "Failed after all attempts");
                return Ok(FetchOutcome::FailedExhausted { attempts: attempt });
            }

            warn!(
                url,
                attempt,
                max_attempts,
                delay_ms = policy.retry_delay.as_millis() as u64,
                error = %err,
                "Attempt failed, retrying"
            );

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(FetchOutcome::Cancelled),
                _ = tokio::time::sleep(policy.retry_delay) => {}
            }
        }
    }

    /// One request: status and content-type checks, then stream to disk.
    async fn attempt(
        &self,
        url: &str,
        target: &Path,
        allowed: &MimePolicy,
    ) -> std::result::Result<u64, AttemptError> {
        let response = tokio::time::timeout(self.read_timeout, self.client.get(url).send())
            .await
            .map_err(|_| AttemptError::Timeout(self.read_timeout))??;

        let status = response.status();
        if status.is_client_error() {
            return Err(AttemptError::ClientError(status.as_u16()));
        }
        if status.is_server_error() {
            return Err(AttemptError::ServerError(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !allowed.allows(&content_type) {
            return Err(AttemptError::WrongMime(content_type));
        }

        stream_to_file(response, target, self.read_timeout).await
    }
}

/// Stream a response body into `target` via a temporary sibling file.
///
/// Each chunk must arrive within `read_timeout`. The temporary file is
/// removed if the body fails midway or the future is dropped.
async fn stream_to_file(
    response: reqwest::Response,
    target: &Path,
    read_timeout: Duration,
) -> std::result::Result<u64, AttemptError> {
    let dir = target.parent().unwrap_or(Path::new("."));
    let temp = tempfile::Builder::new()
        .prefix(".vkrescue-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| AttemptError::Fatal(RescueError::io(dir, e)))?;
    let (file, temp_path) = temp.into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut written: u64 = 0;
    let mut body = response.bytes_stream();
    loop {
        let next = tokio::time::timeout(read_timeout, body.next())
            .await
            .map_err(|_| AttemptError::Timeout(read_timeout))?;
        let Some(chunk) = next else { break };
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| AttemptError::Fatal(RescueError::io(&*temp_path, e)))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| AttemptError::Fatal(RescueError::io(&*temp_path, e)))?;
    drop(file);

    temp_path
        .persist(target)
        .map_err(|e| AttemptError::Fatal(RescueError::io(target, e.error)))?;
    Ok(written)
}

/// Replace the destination's extension with the URL's image extension.
pub fn corrected_path(url: &str, destination: &Path) -> PathBuf {
    destination.with_extension(extension_or_default(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrected_path_uses_url_extension() {
        let dest = Path::new("/out/Anna/2021-03-15 22_30_00.jpg");
        assert_eq!(
            corrected_path("https://x/a.png?size=large", dest),
            Path::new("/out/Anna/2021-03-15 22_30_00.png")
        );
        assert_eq!(
            corrected_path("https://x/a", dest),
            Path::new("/out/Anna/2021-03-15 22_30_00.jpg")
        );
    }

    #[test]
    fn test_corrected_path_adds_missing_extension() {
        assert_eq!(
            corrected_path("https://x/a.gif", Path::new("/out/beach")),
            Path::new("/out/beach.gif")
        );
    }
}
