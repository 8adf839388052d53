use actix_files as fs;
use actix_multipart::Multipart;
use actix_web::{
    get, middleware::Logger, post, web, App, HttpResponse, HttpServer, Result as ActixResult,
};
use clap::Parser;
use futures_util::TryStreamExt as _;
use serde::Deserialize;
use std::fs::create_dir_all;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use playr::{FileRecord, MediaKind, StorageQuota, UploadOutcome};

const MAX_FILE_SIZE: usize = 4096 * 1024 * 1024; // 4096 MB per file
const MAX_FILE_COUNT: usize = 10;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the media library
    #[arg(long, default_value = "./library")]
    library_dir: PathBuf,

    /// Storage capacity in megabytes
    #[arg(long, default_value_t = 10 * 1024)]
    capacity_mb: u64,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
}

#[derive(Clone)]
struct AppState {
    library_dir: PathBuf,
    capacity: u64,
}

#[derive(Deserialize)]
struct ActionQuery {
    action: String,
}

// Serve the SPA shell
#[get("/")]
async fn index() -> ActixResult<HttpResponse> {
    let html = include_str!("../static/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

// Read side of the library endpoint, dispatched on the `action` query
#[get("/api/library")]
async fn library_query(
    query: web::Query<ActionQuery>,
    data: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    match query.action.as_str() {
        "getFiles" => Ok(HttpResponse::Ok().json(scan_library(&data.library_dir))),
        "getStorage" => {
            Ok(HttpResponse::Ok().json(storage_quota(&data.library_dir, data.capacity)))
        }
        other => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Unknown action: {other}")
        }))),
    }
}

// Handle file uploads: repeated multipart `files[]` fields
#[post("/api/library")]
async fn upload_files(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    create_dir_all(&data.library_dir).map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!(
            "Failed to create library directory: {e}"
        ))
    })?;

    let used_before = storage_quota(&data.library_dir, data.capacity).used;
    let mut stored_bytes = 0u64;
    let mut stored_count = 0usize;

    while let Some(mut field) = payload.try_next().await? {
        let content_disposition = field.content_disposition();

        let Some(filename) = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned)
        else {
            continue;
        };

        if stored_count >= MAX_FILE_COUNT {
            return Ok(rejection(format!(
                "Maximum {MAX_FILE_COUNT} files per upload"
            )));
        }

        let sanitized_filename = sanitize_filename(&filename);
        if MediaKind::from_filename(&sanitized_filename).is_none() {
            return Ok(rejection(format!("Unsupported file type: {filename}")));
        }

        // UUID prefix keeps same-named uploads from colliding; the stored
        // name is the record id.
        let unique_filename = format!("{}_{}", Uuid::new_v4(), sanitized_filename);
        let filepath = data.library_dir.join(&unique_filename);
        let filepath_clone = filepath.clone();

        let mut f = web::block(move || std::fs::File::create(filepath))
            .await?
            .map_err(|e| {
                actix_web::error::ErrorInternalServerError(format!("Failed to create file: {e}"))
            })?;

        let mut file_size = 0usize;

        while let Some(chunk) = field.try_next().await? {
            file_size += chunk.len();
            if file_size > MAX_FILE_SIZE {
                let _ = std::fs::remove_file(&filepath_clone);
                return Ok(rejection(format!(
                    "File too large. Maximum size is {} MB",
                    MAX_FILE_SIZE / 1024 / 1024
                )));
            }
            if used_before + stored_bytes + file_size as u64 > data.capacity {
                let _ = std::fs::remove_file(&filepath_clone);
                return Ok(rejection("Storage limit exceeded".to_string()));
            }

            f = web::block(move || f.write_all(&chunk).map(|_| f))
                .await?
                .map_err(|e| {
                    actix_web::error::ErrorInternalServerError(format!(
                        "Failed to write file: {e}"
                    ))
                })?;
        }

        stored_bytes += file_size as u64;
        stored_count += 1;
    }

    if stored_count == 0 {
        Ok(rejection("No files were uploaded".to_string()))
    } else {
        Ok(HttpResponse::Ok().json(UploadOutcome {
            success: true,
            error: None,
        }))
    }
}

fn rejection(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(UploadOutcome {
        success: false,
        error: Some(message),
    })
}

/// Enumerate stored media as FileRecords, sorted by display name. Files
/// that are not playable media (whatever their provenance) are skipped.
fn scan_library(dir: &Path) -> Vec<FileRecord> {
    let mut files = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            let stored_name = entry.file_name().to_string_lossy().to_string();

            // Strip the UUID prefix for display
            let display_name = match stored_name.find('_') {
                Some(pos) => stored_name[pos + 1..].to_string(),
                None => stored_name.clone(),
            };

            let Some(kind) = MediaKind::from_filename(&display_name) else {
                continue;
            };

            files.push(FileRecord {
                id: stored_name,
                name: display_name,
                kind,
                size: metadata.len(),
                date: modified_epoch_ms(&metadata),
            });
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}

fn storage_quota(dir: &Path, capacity: u64) -> StorageQuota {
    let mut used = 0u64;

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            if let Ok(metadata) = entry.metadata() {
                if metadata.is_file() {
                    used += metadata.len();
                }
            }
        }
    }

    StorageQuota {
        used,
        total: capacity,
    }
}

fn modified_epoch_ms(metadata: &std::fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn sanitize_filename(filename: &str) -> String {
    // Remove path separators and other potentially dangerous characters
    filename
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '-' || *c == '_')
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_files).service(library_query);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    env_logger::init();

    create_dir_all(&args.library_dir)?;

    println!("Starting playr at http://{}", args.bind);
    println!("Library directory: {}", args.library_dir.display());

    let state = AppState {
        library_dir: args.library_dir.clone(),
        capacity: args.capacity_mb * 1024 * 1024,
    };

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(index)
            .configure(configure_api)
            // Serve stored media for the players
            .service(fs::Files::new("/media", state.library_dir.clone()))
            // Serve the WASM bundle and other assets
            .service(fs::Files::new("/static", "./static"))
    })
    .bind(&args.bind)?
    .run()
    .await
}
