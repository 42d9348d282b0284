/// URLs of the backend routes, all below `{base_url}/api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base_url: String,
}

impl ApiEndpoints {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generate_video(&self) -> String {
        self.api("generate_video/")
    }

    pub fn video_status(&self, job_id: &str) -> String {
        self.api(&format!("video_status/{}/", segment(job_id)))
    }

    pub fn published_videos(&self) -> String {
        self.api("publicated_videos/")
    }

    pub fn published_video_info(&self, id: &str) -> String {
        self.api(&format!("publicated_video_info/{}/", segment(id)))
    }

    /// Streamed MP4 for a finished job; also what a player widget points at.
    pub fn video(&self, id: &str) -> String {
        self.api(&format!("get_video/{}/", segment(id)))
    }

    pub fn preview_image(&self, id: &str) -> String {
        self.api(&format!("get_image/{}/", segment(id)))
    }

    pub fn publish_video(&self) -> String {
        self.api("publish_video/")
    }

    fn api(&self, route: &str) -> String {
        format!("{}/api/{}", self.base_url, route)
    }
}

/// Ids end up in the path, so anything outside the unreserved set is percent-encoded.
fn segment(id: &str) -> String {
    let mut encoded = String::with_capacity(id.len());
    for byte in id.trim().bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
