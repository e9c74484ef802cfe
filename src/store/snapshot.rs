//! JSON snapshot of the project store.
//!
//! The file has the same shape as the demo `db.json`: `{"projects": [...]}`.
//! Writes go to a sibling temp file and are renamed into place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Project;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Read a snapshot. A missing file is an empty snapshot.
pub async fn load(path: &Path) -> Result<Snapshot> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no snapshot found, starting empty");
            return Ok(Snapshot::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("reading snapshot {}", path.display()));
        }
    };
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing snapshot {}", path.display()))
}

pub async fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("renaming snapshot into {}", path.display()))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snap = load(&dir.path().join("nope.json")).await.unwrap();
        assert!(snap.projects.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");
        let snap = Snapshot {
            projects: vec![Project::new("alpha", "tok")],
        };
        save(&path, &snap).await.unwrap();
        assert!(!tmp_path(&path).exists());

        let loaded = load(&path).await.unwrap();
        assert_eq!(loaded.projects.len(), 1);
        assert_eq!(loaded.projects[0].project_id, "alpha");
        assert_eq!(loaded.projects[0].avalon.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        assert!(load(&path).await.is_err());
    }
}
