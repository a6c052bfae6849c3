//! Drive extraction and fetching over a whole archive.
//!
//! A *unit* is one album page or one conversation folder. Units run
//! concurrently up to `concurrent_units`; inside a unit up to
//! `concurrent_fetches` destinations are in flight. Jobs sharing a
//! destination run one after another in page order. A unit is finished
//! only when every one of its fetches has reached a terminal outcome.

pub mod discover;
pub mod summary;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::export::layout;
use crate::fetch::{FetchPolicy, Fetcher};
use crate::model::attachment::Attachment;
use crate::model::outcome::FetchOutcome;
use crate::parser::{encoding, page};

use self::discover::FIRST_MESSAGE_PAGE;
use self::summary::RunSummary;

/// Concurrency limits for a run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub concurrent_units: usize,
    pub concurrent_fetches: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrent_units: 4,
            concurrent_fetches: 4,
        }
    }
}

/// Progress callback: `(units finished, units total)`.
pub type ProgressFn = Box<dyn Fn(usize, usize) + Send + Sync>;

/// How one unit ended.
enum UnitResult {
    Done(Vec<FetchOutcome>),
    Skipped,
}

/// One planned download.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    url: String,
    destination: PathBuf,
}

/// Orchestrates album and conversation recovery.
pub struct Pipeline {
    fetcher: Fetcher,
    options: PipelineOptions,
    progress: Option<ProgressFn>,
}

impl Pipeline {
    pub fn new(fetcher: Fetcher, options: PipelineOptions) -> Self {
        Self {
            fetcher,
            options,
            progress: None,
        }
    }

    /// Report progress after every finished unit.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Recover every album page directly under `root` into `download_dir`.
    pub async fn run_albums(
        &self,
        root: &Path,
        download_dir: &Path,
        policy: &FetchPolicy,
    ) -> Result<RunSummary> {
        discover::check_root(root)?;
        layout::ensure_dir(download_dir)?;
        let pages = discover::album_pages(root)?;
        info!(root = %root.display(), pages = pages.len(), "Processing albums");

        self.run_units(pages, |page| async move {
            self.process_album(&page, download_dir, policy).await
        })
        .await
    }

    /// Recover every conversation folder under `root` into `download_dir`.
    pub async fn run_chats(
        &self,
        root: &Path,
        download_dir: &Path,
        policy: &FetchPolicy,
    ) -> Result<RunSummary> {
        discover::check_root(root)?;
        layout::ensure_dir(download_dir)?;
        let dirs = discover::chat_dirs(root)?;
        info!(root = %root.display(), chats = dirs.len(), "Processing chats");

        self.run_units(dirs, |dir| async move {
            self.process_chat(&dir, download_dir, policy).await
        })
        .await
    }

    async fn run_units<F, Fut>(&self, units: Vec<PathBuf>, process: F) -> Result<RunSummary>
    where
        F: Fn(PathBuf) -> Fut,
        Fut: std::future::Future<Output = Result<UnitResult>>,
    {
        let total = units.len();
        let finished = AtomicUsize::new(0);
        let process = &process;
        let finished = &finished;

        let results: Vec<UnitResult> = stream::iter(units)
            .map(|unit| async move {
                let result = process(unit).await;
                let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(progress) = &self.progress {
                    progress(done, total);
                }
                result
            })
            .buffer_unordered(self.options.concurrent_units.max(1))
            .try_collect()
            .await?;

        let mut summary = RunSummary::default();
        for result in results {
            match result {
                UnitResult::Done(outcomes) => summary.record_outcomes(&outcomes),
                UnitResult::Skipped => summary.record_skipped(),
            }
        }
        Ok(summary)
    }

    async fn process_album(
        &self,
        page_path: &Path,
        download_dir: &Path,
        policy: &FetchPolicy,
    ) -> Result<UnitResult> {
        if self.fetcher.is_cancelled() {
            return Ok(UnitResult::Skipped);
        }
        info!(page = %page_path.display(), "Processing album");

        let Some(text) = read_page(page_path).await else {
            return Ok(UnitResult::Skipped);
        };
        let album = page::extract_album(&text);

        let album_dir = layout::album_dir(download_dir, &album);
        layout::ensure_dir(&album_dir)?;

        let jobs = album
            .images
            .iter()
            .map(|image| Job {
                url: image.url.clone(),
                destination: album_dir.join(layout::image_file_name(image)),
            })
            .collect();

        let outcomes = self.fetch_all(jobs, policy).await?;
        Ok(UnitResult::Done(outcomes))
    }

    async fn process_chat(
        &self,
        chat_dir: &Path,
        download_dir: &Path,
        policy: &FetchPolicy,
    ) -> Result<UnitResult> {
        if self.fetcher.is_cancelled() {
            return Ok(UnitResult::Skipped);
        }

        let first_page = chat_dir.join(FIRST_MESSAGE_PAGE);
        if !first_page.is_file() {
            warn!(
                dir = %chat_dir.display(),
                page = FIRST_MESSAGE_PAGE,
                "First message page missing, skipping chat"
            );
            return Ok(UnitResult::Skipped);
        }
        info!(dir = %chat_dir.display(), "Processing chat");

        let Some(first_text) = read_page(&first_page).await else {
            return Ok(UnitResult::Skipped);
        };
        let folder_id = chat_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contact = page::extract_contact(&first_text, &folder_id);

        let pages = match discover::message_pages(chat_dir) {
            Ok(pages) => pages,
            Err(e) => {
                warn!(dir = %chat_dir.display(), error = %e, "Cannot list message pages, skipping chat");
                return Ok(UnitResult::Skipped);
            }
        };

        let contact_dir = layout::contact_dir(download_dir, &contact);
        layout::ensure_dir(&contact_dir)?;

        let mut seen: HashSet<Attachment> = HashSet::new();
        let mut jobs = Vec::new();
        for page_path in &pages {
            let text = if *page_path == first_page {
                first_text.clone()
            } else {
                match read_page(page_path).await {
                    Some(text) => text,
                    None => continue,
                }
            };
            for attachment in page::extract_attachments(&text) {
                if !seen.insert(attachment.clone()) {
                    continue;
                }
                jobs.push(Job {
                    destination: contact_dir.join(layout::attachment_file_name(&attachment)),
                    url: attachment.url,
                });
            }
        }
        debug!(contact = %contact.name, attachments = jobs.len(), "Collected attachments");

        let outcomes = self.fetch_all(jobs, policy).await?;
        Ok(UnitResult::Done(outcomes))
    }

    async fn fetch_all(&self, jobs: Vec<Job>, policy: &FetchPolicy) -> Result<Vec<FetchOutcome>> {
        let groups: Vec<Vec<FetchOutcome>> = stream::iter(group_by_destination(jobs))
            .map(|group| self.fetch_group(group, policy))
            .buffer_unordered(self.options.concurrent_fetches.max(1))
            .try_collect()
            .await?;
        Ok(groups.into_iter().flatten().collect())
    }

    /// Run jobs for one destination in order. A later failure leaves an
    /// earlier success in place.
    async fn fetch_group(&self, group: Vec<Job>, policy: &FetchPolicy) -> Result<Vec<FetchOutcome>> {
        let mut outcomes = Vec::with_capacity(group.len());
        for job in group {
            outcomes.push(self.fetcher.fetch(&job.url, &job.destination, policy).await?);
        }
        Ok(outcomes)
    }
}

/// Read and decode one page. Unreadable pages are logged and skipped.
async fn read_page(path: &Path) -> Option<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let decoded = encoding::resolve(&bytes);
            debug!(
                page = %path.display(),
                encoding = ?decoded.encoding,
                declared = ?decoded.declared.map(|e| e.name()),
                "Decoded page"
            );
            Some(decoded.text)
        }
        Err(e) => {
            warn!(page = %path.display(), error = %e, "Failed to read page, skipping");
            None
        }
    }
}

/// Bucket jobs by destination, keeping page order inside each bucket and
/// ordering buckets by first appearance.
fn group_by_destination(jobs: Vec<Job>) -> Vec<Vec<Job>> {
    let mut slots: HashMap<PathBuf, usize> = HashMap::new();
    let mut groups: Vec<Vec<Job>> = Vec::new();
    for job in jobs {
        match slots.get(&job.destination) {
            Some(&slot) => {
                debug!(url = %job.url, path = %job.destination.display(), "Destination shared with an earlier image");
                groups[slot].push(job);
            }
            None => {
                slots.insert(job.destination.clone(), groups.len());
                groups.push(vec![job]);
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(url: &str, dest: &str) -> Job {
        Job {
            url: url.to_string(),
            destination: PathBuf::from(dest),
        }
    }

    #[test]
    fn test_group_by_destination_keeps_every_job_in_order() {
        let jobs = vec![
            job("https://x/1.jpg", "/out/a.jpg"),
            job("https://x/2.jpg", "/out/b.jpg"),
            job("https://x/3.jpg", "/out/a.jpg"),
        ];
        assert_eq!(
            group_by_destination(jobs),
            vec![
                vec![
                    job("https://x/1.jpg", "/out/a.jpg"),
                    job("https://x/3.jpg", "/out/a.jpg"),
                ],
                vec![job("https://x/2.jpg", "/out/b.jpg")],
            ]
        );
    }
}
