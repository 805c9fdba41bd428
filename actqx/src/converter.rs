use crate::config::{ExtractorConfig, PageNumber};
use anyhow::{Context, Error, Result};
use std::{
    fs::File,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// Source of extracted document text.
pub trait TextSource {
    fn page_count(&self) -> PageNumber;

    /// Text of the whole document, used for the answer key.
    fn full_text(&self) -> Result<String>;

    /// Text of one 1-based page. `Ok(None)` means the page has no text layer.
    fn page_text(&self, page: PageNumber) -> Result<Option<String>>;
}

/// Rasterizes a page and returns a reference (path) to the image.
pub trait PageRenderer {
    fn render_page(&self, page: PageNumber) -> Result<String>;
}

fn run_pdftotext(pdf_path: &str, page: Option<PageNumber>) -> Result<String> {
    let mut command = Command::new("pdftotext");
    if let Some(page) = page {
        let page = page.to_string();
        command.args(["-f", page.as_str(), "-l", page.as_str()]);
    }
    let output = command
        .args([pdf_path, "-"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("failed to invoke pdftotext; is poppler-utils installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::msg(format!(
            "pdftotext failed with exit code {:?}: {}",
            output.status.code(),
            stderr
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// `pdftotext` over the working copy of the PDF.
#[derive(Debug, Clone)]
pub struct PopplerText {
    pdf_path: String,
    pages: PageNumber,
}

impl PopplerText {
    pub fn new(config: &ExtractorConfig) -> Result<PopplerText> {
        Ok(PopplerText {
            pdf_path: config.pdf_path.clone(),
            pages: config.page_count()?,
        })
    }
}

impl TextSource for PopplerText {
    fn page_count(&self) -> PageNumber {
        self.pages
    }

    fn full_text(&self) -> Result<String> {
        run_pdftotext(&self.pdf_path, None)
    }

    fn page_text(&self, page: PageNumber) -> Result<Option<String>> {
        let text = run_pdftotext(&self.pdf_path, Some(page))?;
        // pdftotext terminates every page with a form feed
        let text = text.trim_end_matches(['\u{c}', '\n']);
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text.to_string()))
    }
}

/// `pdftocairo -png -singlefile` into `out_dir`, one `page_<n>.png` per page.
#[derive(Debug, Clone)]
pub struct PopplerRenderer {
    command: String,
    pdf_path: String,
    out_dir: PathBuf,
    resolution: u32,
}

impl PopplerRenderer {
    pub fn new(config: &ExtractorConfig) -> PopplerRenderer {
        PopplerRenderer {
            command: "pdftocairo".to_string(),
            pdf_path: config.pdf_path.clone(),
            out_dir: PathBuf::from(&config.image_dir),
            resolution: config.resolution,
        }
    }

    /// Runs `command` instead of the `pdftocairo` found on `PATH`.
    pub fn with_command(mut self, command: &str) -> PopplerRenderer {
        self.command = command.to_string();
        self
    }
}

impl PageRenderer for PopplerRenderer {
    fn render_page(&self, page: PageNumber) -> Result<String> {
        std::fs::create_dir_all(&self.out_dir)?;
        let prefix = self.out_dir.join(format!("page_{}", page));
        let prefix_str = prefix
            .to_str()
            .ok_or_else(|| Error::msg("non-UTF8 output path not supported"))?;

        // an image left by an earlier run must not stand in for this one
        let image = prefix.with_extension("png");
        if image.exists() {
            std::fs::remove_file(&image)?;
        }

        let resolution = self.resolution.to_string();
        let page_str = page.to_string();
        let output = Command::new(&self.command)
            .args([
                "-png",
                "-singlefile",
                "-r",
                resolution.as_str(),
                "-f",
                page_str.as_str(),
                "-l",
                page_str.as_str(),
                self.pdf_path.as_str(),
                prefix_str,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| {
                format!("failed to invoke {}; is poppler-utils installed?", self.command)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::msg(format!(
                "{} failed with exit code {:?}: {}",
                self.command,
                output.status.code(),
                stderr
            )));
        }

        if !image.exists() {
            return Err(Error::msg(format!("Rendered image for page {} not found", page)));
        }
        let path = image
            .to_str()
            .ok_or_else(|| Error::msg(format!("Invalid path encoding: {:?}", image)))?;
        Ok(path.to_string())
    }
}

pub(crate) fn get_pdf_info(config: &mut ExtractorConfig, verbose: bool) -> Result<()> {
    let output = Command::new("pdfinfo")
        .args([config.pdf_path.as_str()])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("failed to invoke pdfinfo; is poppler-utils installed?")?;
    let text = String::from_utf8(output.stdout)?;

    if text.is_empty() {
        return Err(Error::msg("Error: pdf file is broken or invalid url"));
    }

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase().replace(' ', "_");
        config.pdf_info.insert(key, value.trim().to_string());
    }

    if verbose {
        tracing::info!("PDF has {} pages", config.page_count()?);
    }
    Ok(())
}

/// Downloads `path_or_url` (or copies a local file) to `config.pdf_path` and
/// reads its metadata. Every failure here is fatal for the run.
pub async fn save_pdf(path_or_url: &str, config: &mut ExtractorConfig, verbose: bool) -> Result<()> {
    let save_path = config.pdf_path.clone();
    if path_or_url.starts_with("http") {
        if verbose {
            tracing::info!("Downloading {}", path_or_url);
        }
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        let response = client.get(path_or_url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        let mut out = File::create(&save_path)?;
        std::io::copy(&mut bytes.as_ref(), &mut out)?;
    } else {
        let path = Path::new(path_or_url);
        if !path.exists() {
            anyhow::bail!("File not found: {}", path_or_url);
        }
        std::fs::copy(path, &save_path)?;
    }

    get_pdf_info(config, verbose)?;
    Ok(())
}
