use std::sync::Arc;

use async_trait::async_trait;
use lettervideo_domain::{BackendGateway, PublishedVideoSummary};

use crate::{ApplicationError, GalleryPage};

#[async_trait]
pub trait GalleryUseCase: Send + Sync {
    /// Published videos, most recent first, split into `columns` display columns.
    async fn gallery(&self, columns: usize) -> Result<GalleryPage, ApplicationError>;

    async fn video_detail(&self, id: &str) -> Result<PublishedVideoSummary, ApplicationError>;

    async fn preview_image(&self, id: &str) -> Result<Vec<u8>, ApplicationError>;
}

pub struct GalleryUseCaseImpl {
    gateway: Arc<dyn BackendGateway>,
}

impl GalleryUseCaseImpl {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl GalleryUseCase for GalleryUseCaseImpl {
    async fn gallery(&self, columns: usize) -> Result<GalleryPage, ApplicationError> {
        let mut videos = self.gateway.fetch_published_list().await?;
        videos.reverse();
        tracing::debug!(videos = videos.len(), columns, "loaded published videos");

        let columns = split_into_columns(&videos, columns);
        Ok(GalleryPage { videos, columns })
    }

    async fn video_detail(&self, id: &str) -> Result<PublishedVideoSummary, ApplicationError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ApplicationError::Validation("video id is empty".to_string()));
        }
        let video = self.gateway.fetch_video_detail(id).await.map_err(|err| {
            if err.is_not_found() {
                tracing::info!(video_id = %id, "published video not found");
            }
            ApplicationError::from(err)
        })?;
        Ok(video)
    }

    async fn preview_image(&self, id: &str) -> Result<Vec<u8>, ApplicationError> {
        Ok(self.gateway.fetch_preview_image(id.trim()).await?)
    }
}

/// Round-robin split: item `i` lands in column `i % columns`.
pub fn split_into_columns<T: Clone>(items: &[T], columns: usize) -> Vec<Vec<T>> {
    let columns = columns.max(1);
    let mut split = vec![Vec::new(); columns];
    for (index, item) in items.iter().enumerate() {
        split[index % columns].push(item.clone());
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_filled_round_robin() {
        let split = split_into_columns(&[1, 2, 3, 4, 5, 6, 7], 3);
        assert_eq!(split, vec![vec![1, 4, 7], vec![2, 5], vec![3, 6]]);
    }

    #[test]
    fn zero_columns_means_one() {
        let split = split_into_columns(&["a", "b"], 0);
        assert_eq!(split, vec![vec!["a", "b"]]);
    }

    #[test]
    fn more_columns_than_items_leaves_empty_columns() {
        let split = split_into_columns(&[1], 3);
        assert_eq!(split.len(), 3);
        assert!(split[1].is_empty() && split[2].is_empty());
    }
}
