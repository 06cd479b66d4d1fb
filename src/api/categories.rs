//! Category listings and assignments

use std::collections::HashMap;

use tracing::info;

use super::client::{BatchOptions, CatalystClientGeneric};
use super::videos::require_id;
use crate::batch::Diagnostics;
use crate::transport::Transport;
use crate::types::{Category, Envelope, VideoSummary, sort_listing};
use crate::{Error, Result};

/// Values of `field` across every list entry, in document order
fn item_ids(envelope: &Envelope, field: &str) -> Vec<String> {
    envelope
        .items()
        .into_iter()
        .filter_map(|item| item.field_owned(field))
        .collect()
}

impl<T> CatalystClientGeneric<T>
where
    T: Transport + ?Sized + 'static,
{
    /// All categories, in the configured listing order
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let envelope = self.call_api(&[("method", "getCategories")]).await?;
        envelope.ensure_ok()?;

        if envelope.positive_count().is_none() || envelope.result().is_none() {
            return Err(Error::empty_result(envelope.method));
        }

        let mut categories: Vec<Category> = envelope
            .items()
            .into_iter()
            .filter_map(Category::from_item)
            .collect();
        sort_listing(&mut categories, self.settings().listing.sort);
        Ok(categories)
    }

    /// Ids listed by a method whose entries carry `field`, requiring `count > 0`
    async fn list_ids(&self, params: &[(&str, &str)], field: &str) -> Result<Vec<String>> {
        let envelope = self.call_api(params).await?;
        envelope.ensure_ok()?;

        if envelope.positive_count().is_none() {
            return Err(Error::empty_result(envelope.method));
        }
        Ok(item_ids(&envelope, field))
    }

    /// Ids of the videos in a category
    pub async fn get_category_video_ids(&self, category_id: &str) -> Result<Vec<String>> {
        require_id("category_id", category_id)?;
        self.list_ids(
            &[("method", "getCategoryVideoIds"), ("categoryId", category_id)],
            "video_id",
        )
        .await
    }

    /// Id and title of every video in a category
    ///
    /// Videos that fail to load are left out; their errors are only logged
    /// at debug level since deleted videos routinely linger in categories.
    pub async fn get_category_videos(&self, category_id: &str) -> Result<Vec<VideoSummary>> {
        let ids = self.get_category_video_ids(category_id).await?;

        let options = BatchOptions::new().with_diagnostics(Diagnostics::SuppressExpected);
        let details = self.get_info_multi_with(&ids, &options).await?;

        let mut videos: Vec<VideoSummary> = details
            .into_iter()
            .map(|(video_id, details)| VideoSummary {
                video_id,
                title: details.title.unwrap_or_default(),
            })
            .collect();
        sort_listing(&mut videos, self.settings().listing.sort);
        Ok(videos)
    }

    /// Categories a video belongs to
    pub async fn get_categories_by_video_id(&self, video_id: &str) -> Result<Vec<Category>> {
        require_id("video_id", video_id)?;

        // With no categories defined, ids are still listed with empty names
        let categories = match self.get_categories().await {
            Ok(categories) => categories,
            Err(Error::EmptyResult { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        let names: HashMap<String, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();

        let ids = self
            .list_ids(
                &[("method", "getVideoCategoryIds"), ("videoId", video_id)],
                "category_id",
            )
            .await?;

        let mut categories: Vec<Category> = ids
            .into_iter()
            .map(|id| {
                let name = names.get(&id).cloned().unwrap_or_default();
                Category { id, name }
            })
            .collect();
        sort_listing(&mut categories, self.settings().listing.sort);
        Ok(categories)
    }

    /// Add a video to a category
    pub async fn set_category(&self, video_id: &str, category_id: &str) -> Result<()> {
        self.change_category("addVideoToCategory", video_id, category_id)
            .await?;
        info!("Added video {} to category {}", video_id, category_id);
        Ok(())
    }

    /// Remove a video from a category
    pub async fn unset_category(&self, video_id: &str, category_id: &str) -> Result<()> {
        self.change_category("removeVideoFromCategory", video_id, category_id)
            .await?;
        info!("Removed video {} from category {}", video_id, category_id);
        Ok(())
    }

    async fn change_category(&self, method: &str, video_id: &str, category_id: &str) -> Result<()> {
        require_id("video_id", video_id)?;
        require_id("category_id", category_id)?;

        let envelope = self
            .call_api(&[
                ("method", method),
                ("videoId", video_id),
                ("categoryId", category_id),
            ])
            .await?;
        envelope.ensure_ok()?;

        if envelope.is_success() {
            Ok(())
        } else {
            Err(Error::envelope(
                method.to_string(),
                format!(
                    "video {} was not changed in category {}",
                    video_id, category_id
                ),
            ))
        }
    }
}
