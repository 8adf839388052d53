//! Global keyboard shortcut table.

use crate::controller::{Intent, ViewState};

/// Map a `KeyboardEvent.key` value to an intent. Unmapped keys are ignored.
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "1" => Some(Intent::SwitchView(ViewState::VideoPlayer)),
        "2" => Some(Intent::SwitchView(ViewState::MusicPlayer)),
        "3" => Some(Intent::SwitchView(ViewState::Library)),
        "u" | "U" => Some(Intent::OpenUploadDialog),
        "Escape" => Some(Intent::CloseUploadDialog),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_switch_views() {
        assert_eq!(
            intent_for_key("1"),
            Some(Intent::SwitchView(ViewState::VideoPlayer))
        );
        assert_eq!(
            intent_for_key("2"),
            Some(Intent::SwitchView(ViewState::MusicPlayer))
        );
        assert_eq!(
            intent_for_key("3"),
            Some(Intent::SwitchView(ViewState::Library))
        );
    }

    #[test]
    fn upload_dialog_keys() {
        assert_eq!(intent_for_key("u"), Some(Intent::OpenUploadDialog));
        assert_eq!(intent_for_key("U"), Some(Intent::OpenUploadDialog));
        assert_eq!(intent_for_key("Escape"), Some(Intent::CloseUploadDialog));
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        assert_eq!(intent_for_key("x"), None);
        assert_eq!(intent_for_key("Enter"), None);
        assert_eq!(intent_for_key(""), None);
    }
}
