use lettervideo_domain::PublishedVideoSummary;
use serde::Serialize;

/// Number of columns the gallery masonry is laid out in.
pub const DEFAULT_GALLERY_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryPage {
    /// Most recently published first.
    pub videos: Vec<PublishedVideoSummary>,
    pub columns: Vec<Vec<PublishedVideoSummary>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedVideo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
