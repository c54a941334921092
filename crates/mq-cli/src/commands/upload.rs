//! Upload command implementation

use anyhow::{Context, Result};
use mq_store::StoreError;
use std::path::Path;

use crate::cli::{GlobalArgs, UploadArgs};
use crate::commands::common::open_store;

/// Execute the upload command
pub fn execute(args: &UploadArgs, global: &GlobalArgs) -> Result<()> {
    let store = open_store(global)?;
    let archive = Path::new(&args.archive);

    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mimetype = mime_guess::from_path(archive).first_or_octet_stream();
    if !store
        .config()
        .is_allowed_upload(&file_name, mimetype.essence_str())
    {
        return Err(StoreError::InvalidUpload {
            path: archive.display().to_string(),
            message: format!("{mimetype} files are not accepted"),
        }
        .into());
    }

    let session = store
        .create_session(archive, args.map.as_deref().map(Path::new))
        .with_context(|| format!("Failed to store {}", archive.display()))?;

    if global.verbose {
        eprintln!("Stored {} as session {}", archive.display(), session.id);
    }
    println!("{}", session.id);
    Ok(())
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
