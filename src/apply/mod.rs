use std::path::{Path, PathBuf};

use fs_err as fs;
use tempfile::NamedTempFile;

use crate::errors::Result;
use crate::wire::GeneratedFile;

#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ApplySummary {
    pub written: usize,
    pub bytes: u64,
    pub details: Vec<WrittenFile>,
}

/// Write a generated file set under `root`. Writes go through a temp file
/// in the target directory so a crash never leaves a half-written scaffold.
pub fn write_file_set(root: &Path, files: &[GeneratedFile], dry: bool) -> Result<ApplySummary> {
    let mut sum = ApplySummary::default();

    for file in files {
        let abs = root.join(&file.path);
        let bytes = file.content.as_bytes().len() as u64;

        if !dry {
            if let Some(parent) = abs.parent() {
                fs::create_dir_all(parent)?;
            }
            let tmp = NamedTempFile::new_in(abs.parent().unwrap_or(root))?;
            fs::write(tmp.path(), &file.content)?;
            tmp.persist(&abs).map_err(|e| e.error)?;
        }

        sum.written += 1;
        sum.bytes += bytes;
        sum.details.push(WrittenFile { path: abs, bytes });
    }

    Ok(sum)
}
