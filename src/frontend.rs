use leptos::*;
use wasm_bindgen::prelude::*;
use gloo_net::http::Request;
use gloo_file::{FileList, File};
use gloo_timers::future::TimeoutFuture;
use web_sys::{Event, FormData};

use crate::controller::{
    AppModel, Effect, Intent, ViewState, DIALOG_RESET_PAUSE_MS,
};
use crate::{format, shortcuts, FileRecord, MediaKind, StorageQuota, UploadOutcome};

const LIBRARY_ENDPOINT: &str = "/api/library";

/// Every signal the surface owns, bundled so `dispatch` and the effect
/// runner can be free functions. All fields are `Copy`.
#[derive(Clone, Copy)]
struct Surface {
    model: RwSignal<AppModel>,
    /// File handles from the picker. The model only tracks names; the
    /// handles stay here until the upload effect consumes them.
    selected_files: RwSignal<Vec<File>>,
    file_input: NodeRef<html::Input>,
    /// Video player collaborator: the record it was last handed.
    video_player: RwSignal<Option<FileRecord>>,
    /// Music player collaborator.
    music_player: RwSignal<Option<FileRecord>>,
    /// Playlist manager collaborator.
    playlists: RwSignal<Vec<String>>,
}

/// Route one intent through the model and run whatever effects fall out.
fn dispatch(surface: Surface, intent: Intent) {
    let effects = surface
        .model
        .try_update(|model| model.apply(intent))
        .unwrap_or_default();
    for effect in effects {
        run_effect(surface, effect);
    }
}

fn run_effect(surface: Surface, effect: Effect) {
    match effect {
        Effect::FetchLibrary => {
            spawn_local(async move {
                match fetch_library().await {
                    Ok(files) => dispatch(surface, Intent::LibraryLoaded(files)),
                    // Read-path failures are operator-visible only; the
                    // previous rendering stays up.
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Error loading library: {e}").into(),
                        );
                    }
                }
            });
        }
        Effect::FetchQuota => {
            spawn_local(async move {
                match fetch_quota().await {
                    Ok(quota) => dispatch(surface, Intent::QuotaLoaded(quota)),
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Error updating storage info: {e}").into(),
                        );
                    }
                }
            });
        }
        Effect::StartUpload => {
            let files = surface.selected_files.get_untracked();
            spawn_local(async move {
                let result = post_upload(files).await;
                if let Err(e) = &result {
                    log::error!("Upload failed: {e}");
                }
                dispatch(surface, Intent::UploadSettled(result));
            });
        }
        Effect::ScheduleDialogReset => {
            spawn_local(async move {
                TimeoutFuture::new(DIALOG_RESET_PAUSE_MS).await;
                dispatch(surface, Intent::DialogPauseElapsed);
            });
        }
        Effect::ClearSelection => {
            surface.selected_files.set(Vec::new());
            if let Some(input) = surface.file_input.get_untracked() {
                input.set_value("");
            }
        }
        Effect::LoadVideo(record) => surface.video_player.set(Some(record)),
        Effect::LoadAudio(record) => surface.music_player.set(Some(record)),
        Effect::CreatePlaylist(name) => {
            surface.playlists.update(|playlists| playlists.push(name));
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let surface = Surface {
        model: create_rw_signal(AppModel::default()),
        selected_files: create_rw_signal(Vec::new()),
        file_input: create_node_ref::<html::Input>(),
        video_player: create_rw_signal(None),
        music_player: create_rw_signal(None),
        playlists: create_rw_signal(Vec::new()),
    };

    // Initial wiring: load the library once and do one quota refresh.
    create_effect(move |_| {
        dispatch(surface, Intent::Boot);
    });

    window_event_listener(ev::keydown, move |event| {
        if let Some(intent) = shortcuts::intent_for_key(&event.key()) {
            dispatch(surface, intent);
        }
    });

    view! {
        <div class="app">
            <StyleProvider />
            <NavBar surface=surface />
            <main>
                <VideoPlayerView surface=surface />
                <MusicPlayerView surface=surface />
                <LibraryView surface=surface />
            </main>
            <UploadModal surface=surface />
        </div>
    }
}

#[component]
fn NavBar(surface: Surface) -> impl IntoView {
    view! {
        <nav class="top-nav">
            <div class="brand">"playr"</div>
            <div class="nav-buttons">
                {ViewState::ALL
                    .iter()
                    .map(|target| {
                        let target = *target;
                        view! {
                            <button
                                class=move || {
                                    if surface.model.with(|m| m.current_view == target) {
                                        "nav-btn active"
                                    } else {
                                        "nav-btn"
                                    }
                                }
                                on:click=move |_| dispatch(surface, Intent::SwitchView(target))
                            >
                                {target.title()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </nav>
    }
}

#[component]
fn VideoPlayerView(surface: Surface) -> impl IntoView {
    view! {
        <section class=move || {
            view_class(surface, ViewState::VideoPlayer)
        }>
            <Show
                when=move || surface.video_player.with(|f| f.is_some())
                fallback=|| view! {
                    <div class="player-placeholder">
                        "pick a video from the library"
                    </div>
                }
            >
                {move || {
                    surface.video_player.get().map(|file| {
                        view! {
                            <div class="now-playing">
                                <video
                                    controls
                                    autoplay
                                    src=format!("/media/{}", file.id)
                                ></video>
                                <div class="track-title">{file.name}</div>
                            </div>
                        }
                    })
                }}
            </Show>
        </section>
    }
}

#[component]
fn MusicPlayerView(surface: Surface) -> impl IntoView {
    view! {
        <section class=move || {
            view_class(surface, ViewState::MusicPlayer)
        }>
            <Show
                when=move || surface.music_player.with(|f| f.is_some())
                fallback=|| view! {
                    <div class="player-placeholder">
                        "pick a track from the library"
                    </div>
                }
            >
                {move || {
                    surface.music_player.get().map(|file| {
                        view! {
                            <div class="now-playing">
                                <div class="track-art audio">"♪"</div>
                                <div class="track-title">{file.name}</div>
                                <audio
                                    controls
                                    autoplay
                                    src=format!("/media/{}", file.id)
                                ></audio>
                            </div>
                        }
                    })
                }}
            </Show>
            <div class="playlists">
                <h3>"Playlists"</h3>
                <Show
                    when=move || surface.playlists.with(|p| !p.is_empty())
                    fallback=|| view! { <div class="hint">"no playlists yet"</div> }
                >
                    <ul>
                        <For
                            each=move || surface.playlists.get()
                            key=|name| name.clone()
                            let:name
                        >
                            <li>{name}</li>
                        </For>
                    </ul>
                </Show>
            </div>
        </section>
    }
}

#[component]
fn LibraryView(surface: Surface) -> impl IntoView {
    view! {
        <section class=move || {
            view_class(surface, ViewState::Library)
        }>
            <header class="library-header">
                <h2>"Library"</h2>
                <div class="library-actions">
                    <button
                        class="ghost-btn"
                        on:click=move |_| dispatch(surface, Intent::OpenUploadDialog)
                    >
                        "add files"
                    </button>
                    <button
                        class="ghost-btn"
                        on:click=move |_| {
                            if let Some(name) = prompt_playlist_name() {
                                dispatch(surface, Intent::CreatePlaylist(name));
                            }
                        }
                    >
                        "create playlist"
                    </button>
                </div>
            </header>
            <StorageBar surface=surface />
            <Show
                when=move || surface.model.with(|m| !m.library.is_empty())
                fallback=|| view! {
                    <div class="empty-library">
                        <div class="empty-mark">"[ ]"</div>
                        <div>"no media yet"</div>
                        <div class="hint">"add audio or video files to get started"</div>
                    </div>
                }
            >
                <div class="files-container">
                    <For
                        each=move || surface.model.with(|m| m.library.clone())
                        key=|file| file.id.clone()
                        let:file
                    >
                        <FileCard surface=surface file=file />
                    </For>
                </div>
            </Show>
        </section>
    }
}

#[component]
fn FileCard(surface: Surface, file: FileRecord) -> impl IntoView {
    let record = file.clone();
    let icon = match file.kind {
        MediaKind::Audio => "♪",
        MediaKind::Video => "▶",
    };

    view! {
        <div
            class="file-card"
            on:click=move |_| dispatch(surface, Intent::SelectFile(record.clone()))
        >
            <div class=format!("file-icon {}", file.kind)>{icon}</div>
            <h4>{file.name.clone()}</h4>
            <p class="file-size">{format::format_size(file.size)}</p>
            <p class="file-date">{format_date(file.date)}</p>
        </div>
    }
}

#[component]
fn StorageBar(surface: Surface) -> impl IntoView {
    view! {
        <Show when=move || surface.model.with(|m| m.quota.is_some())>
            <div class="storage-info">
                <span class="storage-used">
                    {move || {
                        surface
                            .model
                            .with(|m| m.quota.map(|q| format::quota_label(&q)))
                            .unwrap_or_default()
                    }}
                </span>
                <div class="progress-bar">
                    <div
                        class="progress-fill"
                        style=move || {
                            let percentage = surface
                                .model
                                .with(|m| m.quota.map(|q| format::quota_percentage(&q)))
                                .unwrap_or(0.0);
                            format!("width: {percentage:.2}%")
                        }
                    ></div>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn UploadModal(surface: Surface) -> impl IntoView {
    let file_input = surface.file_input;

    let on_file_change = move |_ev: Event| {
        if let Some(input) = surface.file_input.get_untracked() {
            if let Some(files) = input.files() {
                let chosen: Vec<File> = FileList::from(files).iter().cloned().collect();
                let names = chosen.iter().map(|file| file.name()).collect();
                surface.selected_files.set(chosen);
                dispatch(surface, Intent::FilesChosen(names));
            }
        }
    };

    view! {
        <div class=move || {
            if surface.model.with(|m| m.upload.dialog_open) {
                "modal-overlay active"
            } else {
                "modal-overlay"
            }
        }>
            <div class="modal">
                <div class="modal-header">
                    <h3>"Add files"</h3>
                    <button
                        class="close-modal"
                        on:click=move |_| dispatch(surface, Intent::CloseUploadDialog)
                    >
                        "×"
                    </button>
                </div>
                <input
                    type="file"
                    class="file-input"
                    multiple
                    accept="video/*,audio/*"
                    ref=file_input
                    on:change=on_file_change
                />
                <div class="upload-status">
                    {move || surface.model.with(|m| m.upload.status.to_string())}
                </div>
                <div class="progress-bar">
                    <div
                        class="progress-fill"
                        style=move || {
                            format!(
                                "width: {}%",
                                surface.model.with(|m| m.upload.progress)
                            )
                        }
                    ></div>
                </div>
                <button
                    class="start-upload"
                    on:click=move |_| dispatch(surface, Intent::SubmitUpload)
                >
                    "start upload"
                </button>
            </div>
        </div>
    }
}

async fn fetch_library() -> Result<Vec<FileRecord>, String> {
    let response = Request::get(&format!("{LIBRARY_ENDPOINT}?action=getFiles"))
        .send()
        .await
        .map_err(|e| format!("Library request failed: {e:?}"))?;

    if response.status() != 200 {
        return Err(format!(
            "Library request failed with status: {}",
            response.status()
        ));
    }

    response
        .json::<Vec<FileRecord>>()
        .await
        .map_err(|e| format!("Failed to parse library response: {e:?}"))
}

async fn fetch_quota() -> Result<StorageQuota, String> {
    let response = Request::get(&format!("{LIBRARY_ENDPOINT}?action=getStorage"))
        .send()
        .await
        .map_err(|e| format!("Storage request failed: {e:?}"))?;

    if response.status() != 200 {
        return Err(format!(
            "Storage request failed with status: {}",
            response.status()
        ));
    }

    response
        .json::<StorageQuota>()
        .await
        .map_err(|e| format!("Failed to parse storage response: {e:?}"))
}

async fn post_upload(files: Vec<File>) -> Result<UploadOutcome, String> {
    let form_data = FormData::new().map_err(|_| "Failed to create FormData")?;

    for file in files {
        form_data
            .append_with_blob("files[]", &file.as_ref())
            .map_err(|_| "Failed to append file to FormData")?;
    }

    let response = Request::post(LIBRARY_ENDPOINT)
        .body(form_data)
        .map_err(|e| format!("Failed to set body: {e:?}"))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {e:?}"))?;

    response
        .json::<UploadOutcome>()
        .await
        .map_err(|e| format!("Failed to parse response: {e:?}"))
}

fn view_class(surface: Surface, target: ViewState) -> String {
    let active = surface.model.with(|m| m.current_view == target);
    if active {
        format!("view {} active", target.name())
    } else {
        format!("view {}", target.name())
    }
}

/// Locale-aware short date; the browser locale decides the exact shape.
fn format_date(epoch_ms: i64) -> String {
    js_sys::Date::new(&JsValue::from_f64(epoch_ms as f64))
        .to_locale_date_string("default", &JsValue::UNDEFINED)
        .into()
}

fn prompt_playlist_name() -> Option<String> {
    web_sys::window()?
        .prompt_with_message("Enter playlist name:")
        .ok()
        .flatten()
        .filter(|name| !name.trim().is_empty())
}

#[wasm_bindgen]
pub fn run() {
    console_error_panic_hook::set_once();
    mount_to_body(|| view! { <App /> });
}

// CSS-in-Rust: dark grid layout injected once at mount.
const MAIN_STYLES: &str = r#"
* { box-sizing: border-box; }

body {
    font-family: "Segoe UI", system-ui, sans-serif;
    background-color: #14141c;
    color: #e6e6ef;
    margin: 0;
}

.app {
    max-width: 1100px;
    margin: 0 auto;
    padding: 0 20px 40px 20px;
}

.top-nav {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 18px 0;
    border-bottom: 1px solid #2a2a38;
    margin-bottom: 24px;
}

.brand {
    font-size: 1.4rem;
    font-weight: 600;
    letter-spacing: 0.04em;
    color: #9d8cff;
}

.nav-btn {
    background: none;
    border: 1px solid transparent;
    color: #a0a0b4;
    font-size: 15px;
    padding: 8px 16px;
    margin-left: 6px;
    border-radius: 6px;
    cursor: pointer;
}

.nav-btn:hover {
    color: #e6e6ef;
}

.nav-btn.active {
    color: #e6e6ef;
    border-color: #9d8cff;
    background-color: #1d1d2a;
}

.view {
    display: none;
}

.view.active {
    display: block;
}

.library-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
}

.library-header h2 {
    margin: 0;
    font-weight: 500;
}

.ghost-btn {
    background: none;
    border: 1px solid #3a3a4c;
    color: #e6e6ef;
    padding: 8px 14px;
    margin-left: 8px;
    border-radius: 6px;
    cursor: pointer;
}

.ghost-btn:hover {
    border-color: #9d8cff;
}

.storage-info {
    display: flex;
    align-items: center;
    gap: 14px;
    margin: 18px 0;
    font-size: 13px;
    color: #a0a0b4;
}

.storage-info .progress-bar {
    flex: 1;
}

.progress-bar {
    background-color: #242432;
    height: 6px;
    border-radius: 3px;
    overflow: hidden;
}

.progress-fill {
    height: 100%;
    background-color: #9d8cff;
    transition: width 0.4s ease;
}

.files-container {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(180px, 1fr));
    gap: 16px;
    margin-top: 8px;
}

.file-card {
    background-color: #1d1d2a;
    border: 1px solid #2a2a38;
    border-radius: 10px;
    padding: 18px;
    text-align: center;
    cursor: pointer;
    transition: border-color 0.15s ease-out;
}

.file-card:hover {
    border-color: #9d8cff;
}

.file-card h4 {
    margin: 10px 0 4px 0;
    font-weight: 500;
    font-size: 14px;
    word-break: break-word;
}

.file-icon {
    font-size: 28px;
    width: 56px;
    height: 56px;
    line-height: 56px;
    margin: 0 auto;
    border-radius: 50%;
}

.file-icon.video {
    background-color: #35253f;
    color: #f08fb6;
}

.file-icon.audio {
    background-color: #252f3f;
    color: #8fc7f0;
}

.file-size, .file-date {
    margin: 2px 0;
    font-size: 12px;
    color: #a0a0b4;
}

.empty-library {
    text-align: center;
    padding: 50px 20px;
    color: #a0a0b4;
}

.empty-mark {
    font-size: 30px;
    margin-bottom: 8px;
}

.hint {
    font-size: 13px;
    color: #6c6c80;
    margin-top: 4px;
}

.player-placeholder {
    text-align: center;
    padding: 70px 20px;
    color: #6c6c80;
}

.now-playing {
    text-align: center;
}

.now-playing video {
    width: 100%;
    max-height: 480px;
    background: #000;
    border-radius: 10px;
}

.now-playing audio {
    width: 100%;
    margin-top: 14px;
}

.track-title {
    margin-top: 12px;
    font-size: 15px;
}

.track-art {
    font-size: 42px;
    width: 110px;
    height: 110px;
    line-height: 110px;
    margin: 20px auto 0 auto;
    border-radius: 50%;
}

.playlists {
    margin-top: 36px;
    border-top: 1px solid #2a2a38;
    padding-top: 16px;
}

.playlists h3 {
    margin: 0 0 8px 0;
    font-weight: 500;
    font-size: 15px;
}

.playlists ul {
    list-style: none;
    margin: 0;
    padding: 0;
}

.playlists li {
    padding: 6px 0;
    border-bottom: 1px solid #1d1d2a;
    font-size: 14px;
}

.modal-overlay {
    display: none;
    position: fixed;
    inset: 0;
    background-color: rgba(10, 10, 16, 0.7);
    align-items: center;
    justify-content: center;
}

.modal-overlay.active {
    display: flex;
}

.modal {
    background-color: #1d1d2a;
    border: 1px solid #2a2a38;
    border-radius: 12px;
    padding: 22px;
    width: min(420px, 90vw);
}

.modal-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 14px;
}

.modal-header h3 {
    margin: 0;
    font-weight: 500;
}

.close-modal {
    background: none;
    border: none;
    color: #a0a0b4;
    font-size: 22px;
    cursor: pointer;
}

.close-modal:hover {
    color: #e6e6ef;
}

.file-input {
    width: 100%;
    color: #a0a0b4;
    font-size: 13px;
}

.upload-status {
    margin: 14px 0 8px 0;
    font-size: 13px;
    color: #a0a0b4;
    min-height: 18px;
}

.start-upload {
    width: 100%;
    margin-top: 14px;
    background-color: #9d8cff;
    border: none;
    color: #14141c;
    font-size: 15px;
    font-weight: 600;
    padding: 10px;
    border-radius: 8px;
    cursor: pointer;
}

.start-upload:hover {
    background-color: #b1a3ff;
}
"#;

#[component]
fn StyleProvider() -> impl IntoView {
    view! {
        <style>{MAIN_STYLES}</style>
    }
}
