//! Where upload bytes come from.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// A readable image whose media type may or may not be known.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Media type, when it can be determined.
    fn mime_type(&self) -> Option<String>;

    /// Read the full content.
    async fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

/// Media type from a file extension, `None` for anything unrecognized.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

/// An image on the local filesystem (e.g. a camera capture or gallery pick).
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn mime_type(&self) -> Option<String> {
        mime_from_extension(&self.path).map(str::to_string)
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Bytes already in memory.
#[derive(Debug, Clone)]
pub struct MemoryImageSource {
    bytes: Vec<u8>,
    mime_type: Option<String>,
}

impl MemoryImageSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[async_trait]
impl ImageSource for MemoryImageSource {
    fn describe(&self) -> String {
        format!("{} bytes in memory", self.bytes.len())
    }

    fn mime_type(&self) -> Option<String> {
        self.mime_type.clone()
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
