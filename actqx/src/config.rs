use anyhow::Result;
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::classifier::ClassifierPolicy;

pub type PageNumber = u16;

pub const DEFAULT_SOURCE_URL: &str =
    "https://www.act.org/content/dam/act/unsecured/documents/AIST-Math-Practice-Test.pdf";
pub const DEFAULT_ID_PREFIX: &str = "act_math";
pub const DEFAULT_IMAGE_DIR: &str = "output";
pub const DEFAULT_RESOLUTION: u32 = 200;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// `ExtractorConfig` holds everything the pipeline driver owns: where the
/// working copy of the PDF lives, where page images go and how the source
/// is fetched.
///
/// # Fields
///
/// * `pdf_path` - The file path of the working copy of the PDF document.
/// * `image_dir` - Directory receiving one rendered PNG per page with questions.
/// * `resolution` - Rendering resolution in dpi.
/// * `fetch_timeout` - Upper bound on the initial document download.
/// * `user_agent` - `User-Agent` header sent when downloading.
/// * `id_prefix` - Document-scope prefix of every `question_id`.
/// * `policy` - Phrase tables used to filter and classify questions.
/// * `pdf_info` - Metadata reported by `pdfinfo` for the working copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    pub pdf_path: String,
    pub image_dir: String,
    pub resolution: u32,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub id_prefix: String,
    pub policy: ClassifierPolicy,
    pub pdf_info: HashMap<String, String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorConfig {
    /// Creates a new `ExtractorConfig` with default values and a randomly
    /// generated working path in `/tmp`.
    pub fn new() -> ExtractorConfig {
        let mut rng = rand::rng();
        let random_value = rng.random_range(10000..99999);
        let pdf_path = format!("/tmp/actqx_{}.pdf", random_value);

        ExtractorConfig {
            pdf_path,
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
            resolution: DEFAULT_RESOLUTION,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            policy: ClassifierPolicy::default(),
            pdf_info: HashMap::new(),
        }
    }

    /// Number of pages reported by `pdfinfo`.
    ///
    /// # Errors
    ///
    /// Returns an error if `pdfinfo` has not run yet or reported no usable
    /// page count.
    pub fn page_count(&self) -> Result<PageNumber> {
        let pages = self
            .pdf_info
            .get("pages")
            .ok_or_else(|| anyhow::anyhow!("Page count not available - pdfinfo may have failed"))?
            .parse::<PageNumber>()
            .map_err(|e| anyhow::anyhow!("Invalid pages value: {}", e))?;
        if pages == 0 {
            anyhow::bail!("PDF reports zero pages");
        }
        Ok(pages)
    }

    /// Removes the working copy of the PDF. Rendered page images are output
    /// and are left in place.
    pub fn clean_files(&self) -> Result<()> {
        if Path::new(&self.pdf_path).exists() {
            std::fs::remove_file(&self.pdf_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_new_config_defaults() {
        let config = ExtractorConfig::new();
        assert!(config.pdf_path.starts_with("/tmp/actqx_"));
        assert!(config.pdf_path.ends_with(".pdf"));
        assert_eq!(config.resolution, 200);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.id_prefix, "act_math");
    }

    #[test_log::test]
    fn test_page_count() {
        let mut config = ExtractorConfig::new();
        assert!(config.page_count().is_err());

        config.pdf_info.insert("pages".to_string(), "0".to_string());
        assert!(config.page_count().is_err());

        config.pdf_info.insert("pages".to_string(), "27".to_string());
        assert_eq!(config.page_count().unwrap(), 27);
    }

    #[test_log::test]
    fn test_clean_files_removes_working_copy() {
        let mut config = ExtractorConfig::new();
        config.pdf_path = std::env::temp_dir()
            .join(format!("actqx_clean_{}.pdf", std::process::id()))
            .to_string_lossy()
            .to_string();
        std::fs::write(&config.pdf_path, b"%PDF-1.4").unwrap();
        config.clean_files().unwrap();
        assert!(!Path::new(&config.pdf_path).exists());
        // second call is a no-op
        config.clean_files().unwrap();
    }
}
