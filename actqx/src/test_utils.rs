use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, Result};

use crate::config::PageNumber;
use crate::converter::{PageRenderer, TextSource};

/// Page texts shaped like `pdftotext` output of the practice booklet.
pub const SAMPLE_PAGES: [&str; 4] = [
    "ACT Mathematics Practice Test\n\
     DIRECTIONS: Solve each problem.\n\
     Illustrative figures are NOT necessarily drawn to scale.\n\
     Do not linger over problems that take too much time.",
    "1. What is 3/4 of 12?\n\
     A. 6\n\
     B. 8\n\
     C. 9\n\
     D. 12\n\
     2. Which value of x satisfies x^2 = 49?\n\
     A. _ 7\n\
     B. 0\n\
     C. 5\n\
     D. 8\n\
     © 2024 by ACT, Inc. All rights reserved.",
    "3. Find the slope of the line through (0, 0) and (2, 4).\n\
     4. The word line indicates a straight line.\n\
     5. Solve √16 ÷ 2 × 3 =",
    "Answer Key\n1 C\n2 A\n3 B\n5 D\n",
];

/// In-memory `TextSource`. Pages listed in `unreadable` fail extraction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryText {
    pub pages: Vec<String>,
    pub unreadable: Vec<PageNumber>,
}

impl InMemoryText {
    pub fn new(pages: &[&str]) -> InMemoryText {
        InMemoryText {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            unreadable: Vec::new(),
        }
    }

    pub fn with_unreadable(mut self, page: PageNumber) -> InMemoryText {
        self.unreadable.push(page);
        self
    }
}

impl TextSource for InMemoryText {
    fn page_count(&self) -> PageNumber {
        PageNumber::try_from(self.pages.len()).unwrap_or(PageNumber::MAX)
    }

    fn full_text(&self) -> Result<String> {
        Ok(self.pages.iter().map(|p| format!("{}\n\n", p)).collect())
    }

    fn page_text(&self, page: PageNumber) -> Result<Option<String>> {
        if self.unreadable.contains(&page) {
            return Err(anyhow!("page {} is unreadable", page));
        }
        let text = self
            .pages
            .get(usize::from(page) - 1)
            .ok_or_else(|| anyhow!("page {} out of range", page))?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text.clone()))
    }
}

/// In-memory `PageRenderer` that records every call. Pages listed in
/// `failing` return an error.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub failing: Vec<PageNumber>,
    pub calls: RefCell<Vec<PageNumber>>,
}

impl RecordingRenderer {
    pub fn new() -> RecordingRenderer {
        RecordingRenderer::default()
    }

    pub fn failing_on(mut self, page: PageNumber) -> RecordingRenderer {
        self.failing.push(page);
        self
    }

    pub fn calls(&self) -> Vec<PageNumber> {
        self.calls.borrow().clone()
    }
}

impl PageRenderer for RecordingRenderer {
    fn render_page(&self, page: PageNumber) -> Result<String> {
        self.calls.borrow_mut().push(page);
        if self.failing.contains(&page) {
            return Err(anyhow!("rasterizer crashed on page {}", page));
        }
        Ok(format!("output/page_{}.png", page))
    }
}

/// Checks that every command can be spawned.
pub fn commands_available(commands: &[&str]) -> bool {
    commands.iter().all(|cmd| {
        Command::new(cmd)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    })
}

fn escape_pdf_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Writes a minimal PDF with one page per entry of `pages`; every line of
/// an entry becomes one line of Helvetica text. Only ASCII renders
/// faithfully.
pub fn write_sample_pdf(path: &Path, pages: &[&str]) -> Result<PathBuf> {
    let mut objects: Vec<String> = Vec::new();
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let kids = page_ids.iter().map(|id| format!("{} 0 R", id)).collect::<Vec<_>>().join(" ");

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());
    for (i, page) in pages.iter().enumerate() {
        let content_id = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            content_id
        ));
        let mut stream = String::from("BT /F1 12 Tf 16 TL 72 720 Td\n");
        for line in page.lines() {
            stream.push_str(&format!("({}) Tj T*\n", escape_pdf_string(line)));
        }
        stream.push_str("ET");
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
    }
    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    fs::write(path, pdf)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_page_count_saturates() {
        let source = InMemoryText::new(&["1. What is 2 + 2?", "Answer Key 1 D"]);
        assert_eq!(source.page_count(), 2);

        let many = vec![""; usize::from(PageNumber::MAX) + 10];
        assert_eq!(InMemoryText::new(&many).page_count(), PageNumber::MAX);
    }
}
