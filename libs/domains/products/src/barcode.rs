//! Barcode rendering and artifact storage.
//!
//! Each SKU is encoded as Code 128, scaled onto a fixed 300x150 canvas and
//! written to `<root>/<SKU>.png`. Re-rendering a SKU overwrites its file.

use async_trait::async_trait;
use barcoders::sym::code128::Code128;
use bytes::Bytes;
use image::{GrayImage, ImageFormat, Luma, imageops::FilterType};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CANVAS_WIDTH: u32 = 300;
pub const CANVAS_HEIGHT: u32 = 150;

/// Blank modules on each side of the symbol
const QUIET_ZONE: u32 = 10;
/// Pixel height of the unscaled symbol
const BAR_HEIGHT: u32 = 50;
/// Selects Code 128 character set B (printable ASCII)
const CHARSET_B: char = 'Ɓ';

#[derive(Debug, Error)]
pub enum BarcodeError {
    #[error("SKU '{0}' cannot be encoded")]
    Unencodable(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Barcode not found for SKU '{0}'")]
    NotFound(String),
}

/// Reference to a stored barcode image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle(PathBuf);

impl ArtifactHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Handle as stored on the product record
    pub fn as_reference(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

/// Barcode artifact lifecycle
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BarcodeRenderer: Send + Sync {
    /// Encode `sku` and persist the image, replacing any previous one
    async fn render(&self, sku: &str) -> Result<ArtifactHandle, BarcodeError>;

    /// Handle of an existing artifact
    async fn retrieve(&self, sku: &str) -> Result<ArtifactHandle, BarcodeError>;

    /// PNG bytes of an existing artifact
    async fn load(&self, sku: &str) -> Result<Bytes, BarcodeError>;

    /// Remove the artifact; absent artifacts are not an error
    async fn delete(&self, sku: &str) -> Result<(), BarcodeError>;
}

/// Filesystem-backed renderer
#[derive(Debug, Clone)]
pub struct FsBarcodeRenderer {
    root: PathBuf,
}

impl FsBarcodeRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_path(&self, sku: &str) -> Result<PathBuf, BarcodeError> {
        validate_sku(sku)?;
        Ok(self.root.join(format!("{sku}.png")))
    }
}

#[async_trait]
impl BarcodeRenderer for FsBarcodeRenderer {
    async fn render(&self, sku: &str) -> Result<ArtifactHandle, BarcodeError> {
        let path = self.artifact_path(sku)?;
        let png = render_png(sku)?;

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, png).await?;

        tracing::debug!(sku, path = %path.display(), "Rendered barcode");
        Ok(ArtifactHandle(path))
    }

    async fn retrieve(&self, sku: &str) -> Result<ArtifactHandle, BarcodeError> {
        let path = self.artifact_path(sku)?;
        if tokio::fs::try_exists(&path).await? {
            Ok(ArtifactHandle(path))
        } else {
            Err(BarcodeError::NotFound(sku.to_string()))
        }
    }

    async fn load(&self, sku: &str) -> Result<Bytes, BarcodeError> {
        let path = self.artifact_path(sku)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BarcodeError::NotFound(sku.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, sku: &str) -> Result<(), BarcodeError> {
        let path = self.artifact_path(sku)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(sku, "Deleted barcode");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Non-empty printable ASCII without path separators
fn validate_sku(sku: &str) -> Result<(), BarcodeError> {
    let valid = !sku.is_empty()
        && sku != "."
        && sku != ".."
        && sku
            .chars()
            .all(|c| c.is_ascii_graphic() && c != '/' && c != '\\');

    if valid {
        Ok(())
    } else {
        Err(BarcodeError::Unencodable(sku.to_string()))
    }
}

/// Encode `sku` as a 300x150 grayscale PNG
pub fn render_png(sku: &str) -> Result<Vec<u8>, BarcodeError> {
    validate_sku(sku)?;

    let symbol = Code128::new(format!("{CHARSET_B}{sku}"))
        .map_err(|e| BarcodeError::Encode(e.to_string()))?;
    let modules = symbol.encode();

    let width = modules.len() as u32 + QUIET_ZONE * 2;
    let bars = GrayImage::from_fn(width, BAR_HEIGHT, |x, _| {
        let black = x >= QUIET_ZONE
            && modules
                .get((x - QUIET_ZONE) as usize)
                .is_some_and(|m| *m == 1);
        if black { Luma([0]) } else { Luma([255]) }
    });

    let canvas = image::imageops::resize(&bars, CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Triangle);

    let mut png = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
