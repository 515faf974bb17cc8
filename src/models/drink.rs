use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::store::{Record, Slot};

/// A reusable recipe card for a finished beverage.
///
/// The image, when present, is a `data:` URI so the record is fully
/// self-contained and travels inside transfer tokens unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl Drink {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

impl fmt::Display for Drink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.len()))?;
        match &self.description {
            Some(description) => writeln!(f, "{}", description)?,
            None => writeln!(f, "No description provided.")?,
        }
        if self.image.is_some() {
            writeln!(f, "[image attached]")?;
        }
        Ok(())
    }
}

/// Partial update for a drink. An edit that supplies no new image keeps
/// the stored one.
#[derive(Debug, Clone, Default)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl DrinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image.is_none()
    }
}

impl Record for Drink {
    const SLOT: Slot = Slot::Drinks;
    type Patch = DrinkPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn apply(&mut self, patch: &DrinkPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(image) = &patch.image {
            self.image = Some(image.clone());
        }
    }
}

/// Reads an image file and encodes it as a `data:<mime>;base64,...` URI.
///
/// The MIME type comes from the file extension; anything outside the
/// supported set is rejected before the file is touched, so a failure
/// never produces a partial record.
pub fn load_image_data_uri(path: &Path) -> Result<String, ImageError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let mime = match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => return Err(ImageError::UnsupportedType(path.to_path_buf())),
    };

    let bytes =
        std::fs::read(path).map_err(|e| ImageError::Unreadable(path.to_path_buf(), e))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Errors reading an image for embedding.
#[derive(Debug)]
pub enum ImageError {
    /// File extension is not a supported image type.
    UnsupportedType(PathBuf),
    /// The file could not be read.
    Unreadable(PathBuf, io::Error),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedType(path) => {
                write!(
                    f,
                    "Unsupported image type '{}' (expected png, jpg, gif or webp)",
                    path.display()
                )
            }
            ImageError::Unreadable(path, e) => {
                write!(f, "Failed to read image '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::UnsupportedType(_) => None,
            ImageError::Unreadable(_, e) => Some(e),
        }
    }
}
