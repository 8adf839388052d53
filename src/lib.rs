use serde::{Deserialize, Serialize};
use std::fmt;

/// Media kind as reported by the storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

impl MediaKind {
    /// Map a filename extension to a media kind. Anything the library
    /// cannot play is rejected upstream.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = filename
            .rfind('.')
            .map(|i| filename[i + 1..].to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "mp4" | "webm" | "mov" | "avi" | "mkv" | "m4v" => Some(MediaKind::Video),
            "mp3" | "wav" | "m4a" | "aac" | "flac" | "ogg" => Some(MediaKind::Audio),
            _ => None,
        }
    }
}

/// One stored media item. Created by the storage service on upload;
/// read-only to the client. `id` is the stored filename and doubles as
/// the playback path segment (`/media/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub size: u64,
    /// Milliseconds since the Unix epoch.
    pub date: i64,
}

/// Used/total bytes of the backing storage. Recomputed on every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageQuota {
    pub used: u64,
    pub total: u64,
}

/// Upload endpoint response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub mod controller;
pub mod format;
pub mod shortcuts;

#[cfg(feature = "frontend")]
pub mod frontend;

#[cfg(feature = "frontend")]
pub use frontend::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_media_kinds() {
        assert_eq!(MediaKind::from_filename("clip.mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_filename("clip.MKV"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_filename("song.mp3"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_filename("song.flac"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_filename("notes.txt"), None);
        assert_eq!(MediaKind::from_filename("no-extension"), None);
    }

    #[test]
    fn records_use_the_wire_field_names() {
        let record = FileRecord {
            id: "abc_song.mp3".to_string(),
            name: "song.mp3".to_string(),
            kind: MediaKind::Audio,
            size: 1024,
            date: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "audio");
        assert_eq!(json["size"], 1024);

        let back: FileRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
