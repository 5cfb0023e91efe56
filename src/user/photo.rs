use base64::{engine::general_purpose, Engine as _};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{Config, PhotoConfig};

/// Photo selection errors; display strings are shown to the user as-is
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoError {
    #[error("Please select an image file")]
    InvalidType,

    /// Carries the configured limit; the default limit reads "2MB"
    #[error("Image size must be less than {}", size_label(.0))]
    TooLarge(u64),

    #[error("Unable to read the selected photo: {0}")]
    Unreadable(String),
}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Short size label for messages: whole MB, then whole KB, else bytes
fn size_label(bytes: &u64) -> String {
    let bytes = *bytes;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A file picked by the user, with its declared media type and size
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    source: FileSource,
}

impl SelectedFile {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Describe a file on disk; only metadata is read here
    pub async fn from_path(path: impl AsRef<Path>, mime_type: impl Into<String>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            mime_type: mime_type.into(),
            size_bytes: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    async fn into_contents(self) -> io::Result<Vec<u8>> {
        match self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes),
        }
    }
}

/// A validated photo with its data-URL preview
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAsset {
    pub mime_type: String,
    pub size_bytes: u64,
    pub data_url: String,
}

/// Encode raw bytes as a `data:` URL
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, general_purpose::STANDARD.encode(bytes))
}

/// An accepted selection whose contents still have to be read and encoded.
///
/// Owns everything it needs, so the read can run while the form stays editable.
#[derive(Debug)]
pub struct PhotoRead {
    generation: u64,
    max_bytes: u64,
    file: SelectedFile,
}

impl PhotoRead {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Read the file and build its data-URL
    pub async fn run(self) -> PhotoReadOutcome {
        let generation = self.generation;
        let mime_type = self.file.mime_type.clone();
        let max_bytes = self.max_bytes;

        let result = match self.file.into_contents().await {
            Ok(bytes) if bytes.len() as u64 > max_bytes => Err(PhotoError::TooLarge(max_bytes)),
            Ok(bytes) => Ok(PhotoAsset {
                data_url: to_data_url(&mime_type, &bytes),
                size_bytes: bytes.len() as u64,
                mime_type,
            }),
            Err(e) => Err(PhotoError::Unreadable(e.to_string())),
        };

        PhotoReadOutcome { generation, result }
    }
}

/// Result of a finished photo read, tagged with the selection it belongs to
#[derive(Debug)]
pub struct PhotoReadOutcome {
    generation: u64,
    result: Result<PhotoAsset, PhotoError>,
}

/// What happened when a finished read was handed back to the intake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The preview is set and the photo can be submitted
    Ready,
    /// A later selection or a removal superseded this read; it was dropped
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
enum PhotoState {
    Empty,
    Reading { name: String },
    Ready(PhotoAsset),
}

/// Profile photo field: validates selections and holds the preview
#[derive(Debug, Clone)]
pub struct PhotoIntake {
    limits: PhotoConfig,
    generation: u64,
    state: PhotoState,
}

impl PhotoIntake {
    pub fn new(limits: PhotoConfig) -> Self {
        Self {
            limits,
            generation: 0,
            state: PhotoState::Empty,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.photo.clone())
    }

    /// Check type and size of a selection and start tracking it.
    ///
    /// Any earlier selection, finished or still being read, is superseded.
    /// A rejected file leaves the field unset.
    pub fn select(&mut self, file: SelectedFile) -> Result<PhotoRead, PhotoError> {
        self.generation += 1;

        if let Err(e) = self.check(&file) {
            warn!("Rejected photo {}: {}", file.name, e);
            self.state = PhotoState::Empty;
            return Err(e);
        }

        debug!("Reading photo {} ({} bytes)", file.name, file.size_bytes);
        self.state = PhotoState::Reading { name: file.name.clone() };

        Ok(PhotoRead {
            generation: self.generation,
            max_bytes: self.limits.max_bytes,
            file,
        })
    }

    /// Hand a finished read back; stale reads are discarded
    pub fn complete(&mut self, outcome: PhotoReadOutcome) -> Result<Completion, PhotoError> {
        if outcome.generation != self.generation {
            debug!(
                "Discarding stale photo read (generation {} < {})",
                outcome.generation, self.generation
            );
            return Ok(Completion::Stale);
        }

        match outcome.result {
            Ok(asset) => {
                info!("Photo ready ({} bytes, {})", asset.size_bytes, asset.mime_type);
                self.state = PhotoState::Ready(asset);
                Ok(Completion::Ready)
            }
            Err(e) => {
                warn!("Photo read failed: {}", e);
                self.state = PhotoState::Empty;
                Err(e)
            }
        }
    }

    /// Select, read and encode in one go
    pub async fn accept(&mut self, file: SelectedFile) -> Result<&PhotoAsset, PhotoError> {
        let read = self.select(file)?;
        let outcome = read.run().await;
        self.complete(outcome)?;

        match &self.state {
            PhotoState::Ready(asset) => Ok(asset),
            _ => Err(PhotoError::Unreadable("photo read was superseded".to_string())),
        }
    }

    /// Clear the photo and its preview; in-flight reads become stale
    pub fn remove(&mut self) {
        self.generation += 1;
        self.state = PhotoState::Empty;
    }

    pub fn asset(&self) -> Option<&PhotoAsset> {
        match &self.state {
            PhotoState::Ready(asset) => Some(asset),
            _ => None,
        }
    }

    /// Data-URL preview, once the read finished
    pub fn preview(&self) -> Option<&str> {
        self.asset().map(|asset| asset.data_url.as_str())
    }

    pub fn is_reading(&self) -> bool {
        matches!(self.state, PhotoState::Reading { .. })
    }

    /// Name of the file currently being read
    pub fn pending_name(&self) -> Option<&str> {
        match &self.state {
            PhotoState::Reading { name } => Some(name),
            _ => None,
        }
    }

    fn check(&self, file: &SelectedFile) -> Result<(), PhotoError> {
        if !file.mime_type.starts_with(&self.limits.accepted_prefix) {
            return Err(PhotoError::InvalidType);
        }
        if file.size_bytes > self.limits.max_bytes {
            return Err(PhotoError::TooLarge(self.limits.max_bytes));
        }
        Ok(())
    }
}

impl Default for PhotoIntake {
    fn default() -> Self {
        Self::new(PhotoConfig::default())
    }
}
