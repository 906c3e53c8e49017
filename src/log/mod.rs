use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs_err as fs;
use serde_json::{json, to_string_pretty};
use uuid::Uuid;

use crate::errors::Result;
use crate::wire::{GenerateRequest, GenerateResponse};

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(".vibe").join("tx").join(tx.to_string())
}

/// Save one generation's artifacts under `.vibe/tx/<id>/` for inspection.
pub fn save_generation(
    root: &Path,
    tx: Uuid,
    req: &GenerateRequest,
    resp: &GenerateResponse,
    save_request: bool,
    save_response: bool,
) -> Result<SavedPaths> {
    let dir = tx_dir(root, tx);
    fs::create_dir_all(&dir)?;

    let meta = json!({
        "id": tx,
        "created_at": Utc::now(),
        "model": resp.model,
        "files": resp.files.len(),
    });
    fs::write(dir.join("meta.json"), to_string_pretty(&meta)?)?;

    let mut request_path = None;
    let mut response_path = None;

    if save_request {
        let p = dir.join("generate.request.json");
        fs::write(&p, to_string_pretty(req)?)?;
        request_path = Some(p);
    }

    if save_response {
        let p = dir.join("generate.response.json");
        fs::write(&p, to_string_pretty(resp)?)?;
        response_path = Some(p);
    }

    Ok(SavedPaths { dir, request: request_path, response: response_path })
}

pub fn print_saved_paths(saved: &SavedPaths) {
    println!("debug: artifacts directory: {}", saved.dir.display());
    if let Some(p) = &saved.request {
        println!("debug: request saved at: {}", p.display());
    }
    if let Some(p) = &saved.response {
        println!("debug: response saved at: {}", p.display());
    }
    std::io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_requested_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let tx = Uuid::new_v4();
        let req = GenerateRequest {
            prompt: "todo app".into(),
            model: None,
            context: None,
            files: None,
        };
        let resp = GenerateResponse {
            code: "code".into(),
            model: "fallback".into(),
            usage: None,
            files: vec![],
        };

        let saved = save_generation(dir.path(), tx, &req, &resp, true, true).unwrap();
        assert!(saved.dir.join("meta.json").exists());
        assert!(saved.request.unwrap().exists());
        assert!(saved.response.unwrap().exists());

        let saved = save_generation(dir.path(), Uuid::new_v4(), &req, &resp, false, true).unwrap();
        assert!(saved.request.is_none());
        assert!(saved.response.is_some());
    }
}
