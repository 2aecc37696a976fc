//! Loaded-file model handed over by the file-loading collaborator.
//!
//! The collaborator decodes dropped/selected files into [`FileEntry`] values
//! and publishes one [`FilesLoadedData`] on the bus. The viewer core only
//! selects and matches entries; byte decoding happens upstream and binary
//! skeleton/atlas parsing happens in the rendering runtime.

use serde::{Deserialize, Serialize};

/// Classification of one loaded file, mirroring the file extensions the
/// loader accepts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Json,
    Skel,
    Atlas,
    Png,
    Jpg,
}

/// Raw payload of one loaded file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileData {
    Text(String),
    Binary(Vec<u8>),
}

impl FileData {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileData::Text(text) => Some(text),
            FileData::Binary(_) => None,
        }
    }

    /// Payload as bytes, regardless of how the loader decoded it.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            FileData::Text(text) => text.as_bytes().to_vec(),
            FileData::Binary(bytes) => bytes.clone(),
        }
    }
}

/// One loaded file: its classification, payload, display name, and the path
/// the atlas references it by.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub data: FileData,
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
}

/// Payload of the files-loaded event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesLoadedData {
    pub files: Vec<FileEntry>,
    pub canvas_background: String,
}

impl FilesLoadedData {
    /// First entry of the given kind, in load order.
    pub fn find_kind(&self, kind: FileKind) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.kind == kind)
    }

    /// Entry whose atlas-referenced path matches exactly.
    pub fn find_path(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.path.as_deref() == Some(path))
    }
}
