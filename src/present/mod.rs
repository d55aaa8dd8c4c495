//! Where rendered receipts go.
//!
//! The receipt code only produces a [`Document`]; showing or printing it is
//! delegated to a [`Presenter`].

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::receipt::Document;

pub trait Presenter {
    /// Display `document` for printing. `label` names the business it was
    /// issued by.
    fn show(&self, document: &Document, label: &str) -> Result<()>;
}

/// Writes receipts as HTML files, optionally opening them in the system viewer
#[derive(Debug, Clone)]
pub struct FilePresenter {
    output_dir: PathBuf,
    open: bool,
}

impl FilePresenter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            open: false,
        }
    }

    /// Open the written file with the platform viewer
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// File a document is written to
    pub fn path_for(&self, document: &Document) -> PathBuf {
        self.output_dir.join(format!("{}.html", file_stem(&document.title)))
    }
}

impl Presenter for FilePresenter {
    fn show(&self, document: &Document, label: &str) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(document);
        std::fs::write(&path, &document.html)?;
        info!(path = %path.display(), business = label, "receipt written");

        if self.open {
            // Viewer failures stay local; the receipt is already on disk
            if let Err(e) = open_path(&path) {
                warn!(error = %e, path = %path.display(), "could not open receipt");
            }
        }
        Ok(())
    }
}

/// Prints the markup to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPresenter;

impl Presenter for StdoutPresenter {
    fn show(&self, document: &Document, _label: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(document.html.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

fn file_stem(title: &str) -> String {
    let stem = title.rsplit(' ').next().unwrap_or(title);
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Open a file with the system default viewer
pub fn open_path(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()?;
    }
    Ok(())
}
