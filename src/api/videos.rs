//! Video lookups and edits

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::client::{ApiResponse, BatchOptions, CatalystClientGeneric};
use crate::batch::merge_with_report;
use crate::error::ParseError;
use crate::transport::{RequestDescriptor, Transport};
use crate::types::{Envelope, VideoDetails, VideoStatus, VideoUpdate};
use crate::utils::strip_tags;
use crate::{Error, Result};

pub(crate) fn require_id(field: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        Err(Error::validation(field, "must not be empty"))
    } else {
        Ok(())
    }
}

impl<T> CatalystClientGeneric<T>
where
    T: Transport + ?Sized + 'static,
{
    /// Details of one video, including its screenshot when one exists
    pub async fn get_info(&self, video_id: &str) -> Result<VideoDetails> {
        let mut details = self.fetch_details(video_id).await?;
        details.screenshot = match self.get_screenshot(video_id).await {
            Ok(screenshot) => screenshot,
            Err(e) => {
                warn!("Screenshot lookup for video {} failed: {}", video_id, e);
                None
            }
        };
        Ok(details)
    }

    /// `getStatus` without the screenshot probe
    pub(crate) async fn fetch_details(&self, video_id: &str) -> Result<VideoDetails> {
        require_id("video_id", video_id)?;

        let envelope = self
            .call_api(&[("method", "getStatus"), ("id", video_id)])
            .await?;
        envelope.ensure_ok()?;

        let mut details = VideoDetails::from_result(envelope.require_result()?);
        if details.video_id.is_none() {
            details.video_id = Some(video_id.to_string());
        }
        Ok(details)
    }

    /// Details of many videos fetched concurrently, keyed by video id
    pub async fn get_info_multi<S: AsRef<str>>(
        &self,
        video_ids: &[S],
    ) -> Result<HashMap<String, VideoDetails>> {
        self.get_info_multi_with(video_ids, &BatchOptions::default())
            .await
    }

    /// [`get_info_multi`](Self::get_info_multi) with explicit batch options
    ///
    /// Videos whose request failed, whose response could not be parsed or that
    /// the API reported an error for are absent from the map.
    pub async fn get_info_multi_with<S: AsRef<str>>(
        &self,
        video_ids: &[S],
        options: &BatchOptions,
    ) -> Result<HashMap<String, VideoDetails>> {
        if video_ids.is_empty() {
            return Err(Error::validation("video_ids", "at least one id is required"));
        }

        let requests = video_ids
            .iter()
            .map(|id| {
                require_id("video_id", id.as_ref())?;
                self.api_request(&[("method", "getStatus"), ("id", id.as_ref())])
            })
            .collect::<Result<Vec<_>>>()?;

        let results = self.dispatch(requests, options).await;
        let report = merge_with_report(
            &results,
            Envelope::parse,
            |envelope: &Envelope| envelope.field("video_id").map(str::to_owned),
            options.diagnostics,
        );

        let dropped = report.dropped().count();
        if dropped > 0 {
            debug!("{} of {} video lookups dropped", dropped, video_ids.len());
        }

        let mut videos: HashMap<String, VideoDetails> = report
            .entries
            .into_iter()
            .filter_map(|(key, envelope)| {
                envelope
                    .result()
                    .map(|result| (key, VideoDetails::from_result(result)))
            })
            .collect();

        self.attach_screenshots(&mut videos, options).await;
        Ok(videos)
    }

    async fn attach_screenshots(
        &self,
        videos: &mut HashMap<String, VideoDetails>,
        options: &BatchOptions,
    ) {
        let ids: Vec<String> = videos.keys().cloned().collect();
        let mut probes = Vec::with_capacity(ids.len());
        let mut probed_ids = Vec::with_capacity(ids.len());
        for id in ids {
            match RequestDescriptor::get(&self.screenshot_url(&id), self.settings().network.timeouts())
            {
                Ok(descriptor) => {
                    probes.push(descriptor);
                    probed_ids.push(id);
                }
                Err(e) => warn!("Cannot probe screenshot for video {}: {}", id, e),
            }
        }

        let results = self.dispatch(probes, options).await;
        for (id, result) in probed_ids.iter().zip(results) {
            let exists = result
                .response()
                .map(|r| r.is_png() && r.status == 200)
                .unwrap_or(false);
            if exists {
                if let Some(details) = videos.get_mut(id) {
                    details.screenshot = Some(self.screenshot_url(id));
                }
            }
        }
    }

    /// Decoded transcoding state of a video
    pub async fn get_video_status(&self, video_id: &str) -> Result<VideoStatus> {
        let details = self.fetch_details(video_id).await?;
        details.video_status_code().ok_or_else(|| match details.video_status {
            Some(raw) => Error::from(ParseError::InvalidField {
                field: "video_status".to_string(),
                value: raw,
            }),
            None => Error::from(ParseError::missing("video_status")),
        })
    }

    /// CDN location of a video's screenshot
    pub fn screenshot_url(&self, video_id: &str) -> String {
        let cdn = &self.settings().cdn;
        format!("{}{}{}.png", cdn.base_url, cdn.screenshot_path, video_id)
    }

    /// Screenshot URL if the CDN has the image
    pub async fn get_screenshot(&self, video_id: &str) -> Result<Option<String>> {
        require_id("video_id", video_id)?;

        let url = self.screenshot_url(video_id);
        let request = RequestDescriptor::get(&url, self.settings().network.timeouts())?;
        let response = self.execute(&request).await?;

        match ApiResponse::classify(&response, &url) {
            Ok(ApiResponse::Image { exists: true }) => Ok(Some(url)),
            Ok(_) => Ok(None),
            Err(Error::HttpStatus { status, .. }) => {
                debug!("No screenshot for video {} (HTTP {})", video_id, status);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Change title, description or flags of a video
    pub async fn update_info(&self, video_id: &str, update: &VideoUpdate) -> Result<()> {
        require_id("video_id", video_id)?;
        if update.is_empty() {
            return Err(Error::validation("update", "nothing to change"));
        }

        let title = update.title.as_deref().map(strip_tags);
        let description = update.description.as_deref().map(strip_tags);

        let mut params = vec![("method", "update"), ("id", video_id)];
        if let Some(title) = title.as_deref() {
            params.push(("title", title));
        }
        if let Some(description) = description.as_deref() {
            params.push(("description", description));
        }
        if let Some(published) = update.published {
            params.push(("published", published.as_param()));
        }
        if let Some(embed) = update.embed {
            params.push(("embed", embed.as_param()));
        }
        if let Some(download) = update.download {
            params.push(("download", download.as_param()));
        }

        let envelope = self.call_api(&params).await?;
        envelope.ensure_ok()?;
        info!("Updated video {}", video_id);
        Ok(())
    }

    /// Delete a video; succeeds only when the API confirms
    pub async fn delete_video(&self, video_id: &str) -> Result<()> {
        require_id("video_id", video_id)?;

        let envelope = self
            .call_api(&[("method", "delete"), ("id", video_id)])
            .await?;
        envelope.ensure_ok()?;
        if !envelope.is_success() {
            return Err(Error::envelope(
                envelope.method,
                format!("video {} was not deleted", video_id),
            ));
        }
        info!("Deleted video {}", video_id);
        Ok(())
    }
}
