use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use super::{request_time_headers, ApiResponse};
use crate::errors::AppError;
use crate::middleware::session::Session;
use crate::models::SpecFile;
use crate::AppState;

/// Multipart fields a spec upload must carry, one file each.
pub const SPEC_FIELDS: [&str; 4] = [
    "requirementFile",
    "interfaceDef",
    "interfaceDesign",
    "databaseDesign",
];

/// Replace anything outside `[A-Za-z0-9._-]` so client names cannot escape
/// the upload directory.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match cleaned.trim_start_matches('.') {
        "" => "file".to_string(),
        s => s.to_string(),
    }
}

async fn remove_written(files: &BTreeMap<String, SpecFile>) {
    for file in files.values() {
        if let Err(e) = tokio::fs::remove_file(&file.path).await {
            tracing::warn!(path = %file.path, "failed to remove upload: {}", e);
        }
    }
}

async fn store_field(
    dir: &Path,
    mut field: axum::extract::multipart::Field<'_>,
    max_bytes: usize,
) -> Result<(String, SpecFile), AppError> {
    let key = field.name().unwrap_or_default().to_string();
    let originalname = field.file_name().unwrap_or(&key).to_string();
    let mimetype = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    // Field name keeps same-named documents apart within one millisecond.
    let filename = format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        key,
        sanitize_file_name(&originalname)
    );
    let path: PathBuf = dir.join(&filename);

    let size = match write_field(&path, &mut field, &key, max_bytes).await {
        Ok(size) => size,
        Err(e) => {
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                tracing::debug!(path = %path.display(), "no partial upload to remove: {}", rm);
            }
            return Err(e);
        }
    };

    Ok((
        key,
        SpecFile {
            filename,
            originalname,
            path: path.to_string_lossy().into_owned(),
            size,
            mimetype,
        },
    ))
}

/// Stream one field to disk, stopping once it exceeds `max_bytes`.
async fn write_field(
    path: &Path,
    field: &mut axum::extract::multipart::Field<'_>,
    key: &str,
    max_bytes: usize,
) -> Result<u64, AppError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut size: usize = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        size += chunk.len();
        if size > max_bytes {
            tracing::warn!(field = %key, limit = max_bytes, "upload_spec: document too large");
            return Err(AppError::validation(format!(
                "{} exceeds the {} byte upload limit",
                key, max_bytes
            )));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(size as u64)
}

/// POST /api/v1/spec: upload the four specification documents
pub async fn upload_spec(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> Result<(HeaderMap, Json<ApiResponse<()>>), AppError> {
    let project_id = state
        .store
        .read(session.token(), |project| Ok(project.project_id.clone()))?;

    let dir = state
        .config
        .upload_dir
        .join(sanitize_file_name(&project_id));
    tokio::fs::create_dir_all(&dir).await?;
    let max_bytes = state.config.max_upload_bytes;

    let mut files: BTreeMap<String, SpecFile> = BTreeMap::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                remove_written(&files).await;
                return Err(AppError::validation(e.body_text()));
            }
        };
        let known = field
            .name()
            .map(|n| SPEC_FIELDS.contains(&n))
            .unwrap_or(false);
        if !known {
            tracing::debug!(field = ?field.name(), "upload_spec: ignoring field");
            continue;
        }
        match store_field(&dir, field, max_bytes).await {
            Ok((key, meta)) => {
                if let Some(replaced) = files.insert(key, meta) {
                    if let Err(e) = tokio::fs::remove_file(&replaced.path).await {
                        tracing::warn!(path = %replaced.path, "failed to remove replaced upload: {}", e);
                    }
                }
            }
            Err(e) => {
                remove_written(&files).await;
                return Err(e);
            }
        }
    }

    if files.len() != SPEC_FIELDS.len() {
        tracing::warn!(received = files.len(), "upload_spec: incomplete upload");
        remove_written(&files).await;
        return Err(AppError::missing_fields(SPEC_FIELDS.to_vec()));
    }

    let stored = files.clone();
    let result = state.store.update(session.token(), |project| {
        project.spec_files = Some(stored);
        project.last_updated = Some(Utc::now());
        Ok(())
    });
    if let Err(e) = result {
        remove_written(&files).await;
        return Err(e);
    }
    tracing::info!(project_id = %project_id, files = files.len(), "spec files uploaded");

    Ok((
        request_time_headers(),
        ApiResponse::with_message((), "Files uploaded successfully"),
    ))
}

/// POST /api/v1/spec/analyze
pub async fn analyze_spec(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<(HeaderMap, Json<ApiResponse<()>>), AppError> {
    let uploaded = state.store.read(session.token(), |project| {
        Ok(project.spec_files.as_ref().map(|f| f.len()).unwrap_or(0))
    })?;
    tracing::info!(uploaded, "spec analysis requested");

    Ok((
        request_time_headers(),
        ApiResponse::with_message((), "Files analyzed successfully"),
    ))
}
