//! Public URL accessor for the object-storage bucket.

/// Builds public URLs for object-storage paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrls {
    base: String,
    bucket: String,
}

impl PublicUrls {
    pub fn new(base: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            bucket: bucket.into().trim_matches('/').to_string(),
        }
    }

    /// `{base}/{bucket}/{path}`. Absolute URLs are passed through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}/{}", self.base, self.bucket, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_bucket_and_path() {
        let urls = PublicUrls::new("https://cdn.test/storage/v1/object/public/", "images");
        assert_eq!(
            urls.url_for("/2025/fjord.jpg"),
            "https://cdn.test/storage/v1/object/public/images/2025/fjord.jpg"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let urls = PublicUrls::new("https://cdn.test", "images");
        assert_eq!(urls.url_for("https://other.test/a.jpg"), "https://other.test/a.jpg");
    }
}
