//! Document upload into a blob container

use anyhow::{Context, Result, bail};
use azsearch::storage::BlobStore;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use walkdir::WalkDir;

use crate::progress;

/// What to upload and where
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub container: String,
    pub source_dir: PathBuf,
    /// File extension without the leading dot, matched case-sensitively
    pub extension: String,
    pub jobs: usize,
    pub quiet: bool,
}

/// Outcome of one upload batch
#[derive(Debug, Default)]
pub struct UploadReport {
    pub created_container: bool,
    /// Blob names uploaded, sorted
    pub uploaded: Vec<String>,
    /// Files that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Files under `root` with the given extension, sorted.
pub fn collect_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Source directory {} does not exist", root.display());
    }

    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == extension)
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Blob name for a file: its path relative to `root` with separators
/// replaced by `_`, e.g. `reports/2024/q1.pdf` becomes `reports_2024_q1.pdf`.
pub fn blob_name(root: &Path, file: &Path) -> Result<String> {
    let relative = file
        .strip_prefix(root)
        .with_context(|| format!("{} is not under {}", file.display(), root.display()))?;

    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        bail!("{} has no file name", file.display());
    }
    Ok(parts.join("_"))
}

/// Create the container unless it exists. Returns whether it was created.
pub fn ensure_container(store: &dyn BlobStore, container: &str) -> Result<bool> {
    if store
        .container_exists(container)
        .with_context(|| format!("Failed to check container {container}"))?
    {
        return Ok(false);
    }

    log::info!("Creating container {container}");
    store
        .create_container(container)
        .with_context(|| format!("Failed to create container {container}"))?;
    Ok(true)
}

fn upload_file(store: &dyn BlobStore, container: &str, file: &Path, name: &str) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    log::debug!("Uploading {} as {name} ({} bytes)", file.display(), data.len());
    store.upload_blob(container, name, &data)?;
    Ok(())
}

/// Upload every matching file, overwriting blobs with the same name.
///
/// Individual failures are collected in the report; errors before the
/// first upload (scan, container) are returned.
pub fn upload_all(store: &dyn BlobStore, opts: &UploadOptions) -> Result<UploadReport> {
    let files = collect_files(&opts.source_dir, &opts.extension)?;
    let created_container = ensure_container(store, &opts.container)?;

    let mut targets = Vec::with_capacity(files.len());
    for file in files {
        let name = blob_name(&opts.source_dir, &file)?;
        targets.push((file, name));
    }

    let uploaded = Mutex::new(Vec::new());
    let failed = Mutex::new(Vec::new());
    let pb = progress::bar(targets.len() as u64, opts.quiet);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs.max(1))
        .build()
        .context("Failed to start upload workers")?;

    pool.install(|| {
        targets.par_iter().for_each(|(file, name)| {
            match upload_file(store, &opts.container, file, name) {
                Ok(()) => {
                    uploaded
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(name.clone());
                    pb.set_message(format!("{name} ✓"));
                }
                Err(e) => {
                    log::warn!("Upload of {} failed: {e:#}", file.display());
                    failed
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((file.clone(), format!("{e:#}")));
                    pb.set_message(format!("{name} ✗"));
                }
            }
            pb.inc(1);
        });
    });

    pb.finish_and_clear();

    let mut uploaded = uploaded.into_inner().unwrap_or_else(PoisonError::into_inner);
    let mut failed = failed.into_inner().unwrap_or_else(PoisonError::into_inner);
    uploaded.sort();
    failed.sort();

    Ok(UploadReport {
        created_container,
        uploaded,
        failed,
    })
}
