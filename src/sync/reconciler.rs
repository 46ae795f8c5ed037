use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use super::{SyncAction, SyncEvent, SyncOptions, SyncReport};
use crate::discord::EmojiApi;
use crate::emoji_cache::EmojiCache;
use crate::errors::{AppResult, RemoteError};
use crate::fingerprint::PreparedImage;
use crate::models::{CacheEntry, LocalImage, RemoteEmoji};
use crate::progress::ProgressObserver;
use crate::scanner::ImageScanner;

/// Outcome of a single create call
enum Upload {
    Created(RemoteEmoji),
    Rejected(RemoteError),
}

/// Makes the remote emoji collection mirror the image directory.
///
/// Operations run strictly one after another. Failures concerning a single
/// image are logged and recorded in the [`SyncReport`]; only cache
/// persistence failures, an unreadable image directory and (when
/// configured) a failed remote listing abort the run.
pub struct Reconciler<A> {
    api: A,
    cache: EmojiCache,
    scanner: ImageScanner,
    options: SyncOptions,
}

impl<A: EmojiApi> Reconciler<A> {
    pub fn new(api: A, cache: EmojiCache, image_directory: impl Into<PathBuf>) -> Self {
        Self {
            api,
            cache,
            scanner: ImageScanner::new(image_directory),
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cache(&self) -> &EmojiCache {
        &self.cache
    }

    /// Run one full reconciliation pass
    pub async fn run(&mut self, progress: &dyn ProgressObserver) -> AppResult<SyncReport> {
        info!(
            "Starting emoji sync from directory {:?}",
            self.scanner.directory()
        );

        let remote = self.fetch_remote().await?;
        let scan = self.scanner.scan().await?;

        let mut report = SyncReport::default();

        for duplicate in &scan.duplicates {
            let reason = format!("duplicate name, {:?} ignored", duplicate.path);
            Self::record(
                &mut report,
                progress,
                SyncEvent::new(&duplicate.name, SyncAction::Skipped { reason }),
            );
        }

        self.delete_missing(&scan.names(), &mut report, progress).await?;

        progress.started(self.scanner.directory(), scan.images.len());
        for image in &scan.images {
            let action = self.sync_image(image, &remote).await?;
            Self::record(&mut report, progress, SyncEvent::new(&image.name, action));
        }

        info!(
            "Emoji sync finished: {} created, {} replaced, {} unchanged, {} deleted, {} skipped, {} failed",
            report.created(),
            report.replaced(),
            report.unchanged(),
            report.deleted(),
            report.skipped(),
            report.failed()
        );
        progress.finished(&report);
        Ok(report)
    }

    fn record(report: &mut SyncReport, progress: &dyn ProgressObserver, event: SyncEvent) {
        progress.event(&event);
        report.events.push(event);
    }

    async fn fetch_remote(&self) -> AppResult<Vec<RemoteEmoji>> {
        match self.api.list_emojis().await {
            Ok(emojis) => {
                debug!("Remote lists {} emojis", emojis.len());
                Ok(emojis)
            }
            Err(e) if self.options.abort_on_list_failure => {
                error!("{}", e);
                Err(e.into())
            }
            Err(e) => {
                error!("{}; continuing as if no remote emojis exist", e);
                Ok(Vec::new())
            }
        }
    }

    /// Delete every cached emoji whose image is gone, then save the cache once
    async fn delete_missing(
        &mut self,
        local_names: &HashSet<&str>,
        report: &mut SyncReport,
        progress: &dyn ProgressObserver,
    ) -> AppResult<()> {
        let stale: Vec<(String, String)> = self
            .cache
            .iter()
            .filter(|(name, _)| !local_names.contains(name))
            .map(|(name, entry)| (name.to_string(), entry.remote_id.clone()))
            .collect();

        for (name, id) in stale {
            info!("Emoji {} is no longer in the directory, deleting {}", name, id);

            let action = match self.api.delete_emoji(&id).await {
                Ok(()) => {
                    self.cache.remove(&name);
                    SyncAction::Deleted { id }
                }
                Err(e) if e.is_unknown_emoji() => {
                    warn!("Emoji {} ({}) was already gone remotely", name, id);
                    self.cache.remove(&name);
                    SyncAction::Deleted { id }
                }
                Err(e) => {
                    // Keep the entry so the next run retries the delete.
                    error!("{}", e);
                    SyncAction::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            Self::record(report, progress, SyncEvent::new(name, action));
        }

        self.cache.save().await?;
        Ok(())
    }

    async fn sync_image(
        &mut self,
        image: &LocalImage,
        remote: &[RemoteEmoji],
    ) -> AppResult<SyncAction> {
        let prepared = match PreparedImage::load(&image.path, image.kind).await {
            Ok(prepared) => prepared,
            Err(e) => {
                error!("{}", e);
                return Ok(SyncAction::Failed {
                    reason: e.to_string(),
                });
            }
        };

        let Some(existing) = remote.iter().find(|emoji| emoji.name == image.name) else {
            return Ok(match self.upload(image, &prepared).await? {
                Upload::Created(emoji) => SyncAction::Created { id: emoji.id },
                Upload::Rejected(e) => SyncAction::Failed {
                    reason: e.to_string(),
                },
            });
        };

        let cached = self.cache.get(&image.name).map(|entry| &entry.fingerprint);
        if cached == Some(&prepared.fingerprint) {
            debug!("Emoji {} already exists and is up to date", image.name);
            return Ok(SyncAction::Unchanged);
        }

        info!("Emoji {} differs from the remote copy, replacing", image.name);

        match self.api.delete_emoji(&existing.id).await {
            Ok(()) => {}
            Err(e) if e.is_unknown_emoji() => {
                warn!("Emoji {} ({}) was already gone remotely", image.name, existing.id);
            }
            Err(e) => {
                error!("{}", e);
                return Ok(SyncAction::Failed {
                    reason: e.to_string(),
                });
            }
        }
        self.cache.remove(&image.name);

        match self.upload(image, &prepared).await? {
            Upload::Created(emoji) => Ok(SyncAction::Replaced {
                old_id: existing.id.clone(),
                new_id: emoji.id,
            }),
            Upload::Rejected(e) => {
                // The old emoji is gone; forget it so the next run recreates it.
                self.cache.save().await?;
                Ok(SyncAction::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Create the emoji and, on success, record and persist it in the cache
    async fn upload(&mut self, image: &LocalImage, prepared: &PreparedImage) -> AppResult<Upload> {
        match self.api.create_emoji(&image.name, &prepared.encode()).await {
            Ok(emoji) => {
                info!("Emoji {} created. ID: {}", image.name, emoji.id);
                self.cache.insert(
                    &image.name,
                    CacheEntry::new(emoji.id.clone(), prepared.fingerprint.clone()),
                );
                self.cache.save().await?;
                Ok(Upload::Created(emoji))
            }
            Err(e) => {
                error!("{}", e);
                Ok(Upload::Rejected(e))
            }
        }
    }
}
