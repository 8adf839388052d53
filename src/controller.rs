//! Application controller: an explicit model plus an intent dispatcher.
//!
//! UI surfaces translate raw events (clicks, key presses, settled network
//! requests) into [`Intent`]s and feed them to [`AppModel::apply`], which
//! mutates the model and returns the [`Effect`]s the surface must execute.
//! Everything asynchronous lives behind an effect, so every transition here
//! is synchronous and testable without a browser.

use crate::{FileRecord, MediaKind, StorageQuota, UploadOutcome};
use std::fmt;

/// Pacing delay between a completed upload and the dialog closing.
/// UX only; nothing waits on it for correctness.
pub const DIALOG_RESET_PAUSE_MS: u32 = 2000;

/// The active top-level view. One field, one value: at most one view is
/// active by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    VideoPlayer,
    MusicPlayer,
    Library,
}

impl ViewState {
    pub const ALL: [ViewState; 3] = [
        ViewState::VideoPlayer,
        ViewState::MusicPlayer,
        ViewState::Library,
    ];

    /// Parse a navigation identifier. Unknown names yield `None`, so a bad
    /// identifier dies at the boundary instead of reaching the model.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "video-player" => Some(ViewState::VideoPlayer),
            "music-player" => Some(ViewState::MusicPlayer),
            "library" => Some(ViewState::Library),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewState::VideoPlayer => "video-player",
            ViewState::MusicPlayer => "music-player",
            ViewState::Library => "library",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewState::VideoPlayer => "Video",
            ViewState::MusicPlayer => "Music",
            ViewState::Library => "Library",
        }
    }
}

/// Outcome of the most recent upload interaction, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Ready,
    Selected(usize),
    NoFilesChosen,
    Uploading,
    Complete,
    /// Well-formed response with `success: false`; carries the service's
    /// reason string verbatim.
    ServiceError(String),
    /// Network or parse failure; carries the underlying error text.
    TransportError(String),
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Ready => write!(f, "Ready to upload"),
            UploadStatus::Selected(n) => write!(f, "{n} file(s) selected"),
            UploadStatus::NoFilesChosen => write!(f, "Please select files first"),
            UploadStatus::Uploading => write!(f, "Uploading..."),
            UploadStatus::Complete => write!(f, "Upload complete!"),
            UploadStatus::ServiceError(reason) => write!(f, "Upload failed: {reason}"),
            UploadStatus::TransportError(message) => write!(f, "Upload error: {message}"),
        }
    }
}

/// State of one upload interaction. Selection and status survive a failed
/// attempt so the user can retry; a completed upload resets everything
/// after the pacing delay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadSession {
    pub dialog_open: bool,
    pub selected: Vec<String>,
    pub status: UploadStatus,
    pub progress: u8,
}

impl UploadSession {
    fn reset(&mut self) {
        *self = UploadSession::default();
    }
}

/// The whole application model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppModel {
    pub current_view: ViewState,
    pub current_file: Option<FileRecord>,
    pub library: Vec<FileRecord>,
    pub quota: Option<StorageQuota>,
    pub upload: UploadSession,
}

/// A user or runtime event, already parsed into something typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Startup: load the library and do one quota refresh.
    Boot,
    SwitchView(ViewState),
    OpenUploadDialog,
    CloseUploadDialog,
    /// The file picker changed; carries the chosen display names.
    FilesChosen(Vec<String>),
    SubmitUpload,
    /// The upload request settled: a parsed service response, or the
    /// transport/parse error text.
    UploadSettled(Result<UploadOutcome, String>),
    /// The post-upload pacing delay ran out.
    DialogPauseElapsed,
    LibraryLoaded(Vec<FileRecord>),
    QuotaLoaded(StorageQuota),
    SelectFile(FileRecord),
    CreatePlaylist(String),
}

/// Work the surface must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchLibrary,
    FetchQuota,
    /// POST the currently selected files to the storage service.
    StartUpload,
    /// Wait [`DIALOG_RESET_PAUSE_MS`], then dispatch
    /// [`Intent::DialogPauseElapsed`].
    ScheduleDialogReset,
    /// Empty the surface's file input to match the reset session.
    ClearSelection,
    /// Hand the record to the video player collaborator.
    LoadVideo(FileRecord),
    /// Hand the record to the music player collaborator.
    LoadAudio(FileRecord),
    /// Hand the name to the playlist manager collaborator.
    CreatePlaylist(String),
}

impl AppModel {
    /// Apply one intent, returning the effects to run. The only mutation
    /// entry point for the model.
    pub fn apply(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::Boot => vec![Effect::FetchLibrary, Effect::FetchQuota],

            Intent::SwitchView(view) => {
                self.current_view = view;
                vec![]
            }

            Intent::OpenUploadDialog => {
                self.upload.dialog_open = true;
                vec![]
            }

            // Hiding the dialog neither cancels an in-flight request nor
            // discards the selection.
            Intent::CloseUploadDialog => {
                self.upload.dialog_open = false;
                vec![]
            }

            Intent::FilesChosen(names) => {
                self.upload.status = UploadStatus::Selected(names.len());
                self.upload.selected = names;
                vec![]
            }

            Intent::SubmitUpload => {
                if self.upload.selected.is_empty() {
                    // Guard, not a failure: prompt and do nothing.
                    self.upload.status = UploadStatus::NoFilesChosen;
                    return vec![];
                }
                self.upload.status = UploadStatus::Uploading;
                vec![Effect::StartUpload]
            }

            Intent::UploadSettled(result) => match result {
                Ok(outcome) if outcome.success => {
                    self.upload.status = UploadStatus::Complete;
                    self.upload.progress = 100;
                    vec![
                        Effect::FetchLibrary,
                        Effect::FetchQuota,
                        Effect::ScheduleDialogReset,
                    ]
                }
                Ok(outcome) => {
                    self.upload.status =
                        UploadStatus::ServiceError(outcome.error.unwrap_or_default());
                    vec![]
                }
                Err(message) => {
                    self.upload.status = UploadStatus::TransportError(message);
                    vec![]
                }
            },

            Intent::DialogPauseElapsed => {
                self.upload.reset();
                vec![Effect::ClearSelection]
            }

            Intent::LibraryLoaded(files) => {
                // Full replacement; the service is the order of record.
                self.library = files;
                vec![]
            }

            Intent::QuotaLoaded(quota) => {
                self.quota = Some(quota);
                vec![]
            }

            Intent::SelectFile(record) => {
                self.current_file = Some(record.clone());
                match record.kind {
                    MediaKind::Video => {
                        self.current_view = ViewState::VideoPlayer;
                        vec![Effect::LoadVideo(record)]
                    }
                    MediaKind::Audio => {
                        self.current_view = ViewState::MusicPlayer;
                        vec![Effect::LoadAudio(record)]
                    }
                }
            }

            Intent::CreatePlaylist(name) => vec![Effect::CreatePlaylist(name)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: MediaKind) -> FileRecord {
        FileRecord {
            id: "a1b2_clip.mp4".to_string(),
            name: "clip.mp4".to_string(),
            kind,
            size: 1536,
            date: 1_700_000_000_000,
        }
    }

    fn model_with_selection(names: &[&str]) -> AppModel {
        let mut model = AppModel::default();
        model.apply(Intent::OpenUploadDialog);
        model.apply(Intent::FilesChosen(
            names.iter().map(|n| n.to_string()).collect(),
        ));
        model
    }

    #[test]
    fn boot_loads_library_and_quota() {
        let mut model = AppModel::default();
        let effects = model.apply(Intent::Boot);
        assert_eq!(effects, vec![Effect::FetchLibrary, Effect::FetchQuota]);
    }

    #[test]
    fn switch_view_activates_exactly_one_view() {
        let mut model = AppModel::default();
        model.apply(Intent::SwitchView(ViewState::MusicPlayer));

        assert_eq!(model.current_view, ViewState::MusicPlayer);
        let active: Vec<_> = ViewState::ALL
            .iter()
            .filter(|v| **v == model.current_view)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name(), "music-player");
    }

    #[test]
    fn unknown_view_name_is_rejected_at_the_boundary() {
        assert_eq!(ViewState::from_name("settings"), None);
        assert_eq!(
            ViewState::from_name("video-player"),
            Some(ViewState::VideoPlayer)
        );
    }

    #[test]
    fn choosing_files_updates_the_status_count() {
        let model = model_with_selection(&["a.mp4", "b.mp3"]);
        assert_eq!(model.upload.status.to_string(), "2 file(s) selected");
        assert_eq!(model.upload.selected.len(), 2);
    }

    #[test]
    fn submit_with_no_selection_prompts_and_runs_nothing() {
        let mut model = AppModel::default();
        model.apply(Intent::OpenUploadDialog);

        let effects = model.apply(Intent::SubmitUpload);

        assert!(effects.is_empty());
        assert_eq!(
            model.upload.status.to_string(),
            "Please select files first"
        );
    }

    #[test]
    fn submit_with_selection_starts_the_upload() {
        let mut model = model_with_selection(&["a.mp4"]);
        let effects = model.apply(Intent::SubmitUpload);

        assert_eq!(effects, vec![Effect::StartUpload]);
        assert_eq!(model.upload.status, UploadStatus::Uploading);
    }

    #[test]
    fn successful_upload_completes_refreshes_and_schedules_reset() {
        let mut model = model_with_selection(&["a.mp4"]);
        model.apply(Intent::SubmitUpload);

        let effects = model.apply(Intent::UploadSettled(Ok(UploadOutcome {
            success: true,
            error: None,
        })));

        assert_eq!(model.upload.status.to_string(), "Upload complete!");
        assert_eq!(model.upload.progress, 100);
        assert!(model.upload.dialog_open);
        assert_eq!(
            effects,
            vec![
                Effect::FetchLibrary,
                Effect::FetchQuota,
                Effect::ScheduleDialogReset,
            ]
        );
    }

    #[test]
    fn pause_elapsing_closes_and_resets_the_session() {
        let mut model = model_with_selection(&["a.mp4"]);
        model.apply(Intent::SubmitUpload);
        model.apply(Intent::UploadSettled(Ok(UploadOutcome {
            success: true,
            error: None,
        })));

        let effects = model.apply(Intent::DialogPauseElapsed);

        assert_eq!(effects, vec![Effect::ClearSelection]);
        assert!(!model.upload.dialog_open);
        assert!(model.upload.selected.is_empty());
        assert_eq!(model.upload.progress, 0);
        assert_eq!(model.upload.status.to_string(), "Ready to upload");
    }

    #[test]
    fn service_failure_keeps_dialog_and_selection_and_embeds_the_reason() {
        let mut model = model_with_selection(&["a.mp4"]);
        model.apply(Intent::SubmitUpload);

        let effects = model.apply(Intent::UploadSettled(Ok(UploadOutcome {
            success: false,
            error: Some("disk full".to_string()),
        })));

        assert!(effects.is_empty());
        assert!(model.upload.dialog_open);
        assert_eq!(model.upload.selected, vec!["a.mp4".to_string()]);
        assert!(model.upload.status.to_string().contains("disk full"));
        assert_eq!(model.upload.status.to_string(), "Upload failed: disk full");
    }

    #[test]
    fn transport_failure_embeds_the_error_text() {
        let mut model = model_with_selection(&["a.mp4"]);
        model.apply(Intent::SubmitUpload);

        let effects =
            model.apply(Intent::UploadSettled(Err("connection refused".to_string())));

        assert!(effects.is_empty());
        assert!(model.upload.dialog_open);
        assert_eq!(
            model.upload.status.to_string(),
            "Upload error: connection refused"
        );
    }

    #[test]
    fn closing_the_dialog_keeps_the_selection() {
        let mut model = model_with_selection(&["a.mp4"]);
        model.apply(Intent::CloseUploadDialog);

        assert!(!model.upload.dialog_open);
        assert_eq!(model.upload.selected, vec!["a.mp4".to_string()]);
    }

    #[test]
    fn selecting_a_video_routes_to_the_video_player() {
        let mut model = AppModel::default();
        let video = record(MediaKind::Video);

        let effects = model.apply(Intent::SelectFile(video.clone()));

        assert_eq!(model.current_view, ViewState::VideoPlayer);
        assert_eq!(model.current_file.as_ref(), Some(&video));
        assert_eq!(effects, vec![Effect::LoadVideo(video)]);
    }

    #[test]
    fn selecting_audio_routes_to_the_music_player() {
        let mut model = AppModel::default();
        let track = record(MediaKind::Audio);

        let effects = model.apply(Intent::SelectFile(track.clone()));

        assert_eq!(model.current_view, ViewState::MusicPlayer);
        assert_eq!(model.current_file.as_ref(), Some(&track));
        assert_eq!(effects, vec![Effect::LoadAudio(track)]);
    }

    #[test]
    fn library_load_replaces_the_whole_list() {
        let mut model = AppModel::default();
        model.apply(Intent::LibraryLoaded(vec![record(MediaKind::Video)]));
        model.apply(Intent::LibraryLoaded(vec![
            record(MediaKind::Audio),
            record(MediaKind::Video),
        ]));

        assert_eq!(model.library.len(), 2);
    }

    #[test]
    fn create_playlist_is_handed_to_the_collaborator() {
        let mut model = AppModel::default();
        let effects = model.apply(Intent::CreatePlaylist("road trip".to_string()));
        assert_eq!(
            effects,
            vec![Effect::CreatePlaylist("road trip".to_string())]
        );
    }
}
