use std::path::Path;

use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::AppResult;

/// Write rendered frames, one per line, to `output` or to stdout when no file is given.
#[tracing::instrument(name = "Writing output", level = "debug", skip(frames))]
pub async fn write_output(output: Option<&Path>, frames: &[String]) -> AppResult<()> {
    if frames.is_empty() {
        debug!("Nothing to write");
        return Ok(());
    }
    match output {
        Some(path) => write_file(path, frames).await,
        None => write_frames(&mut tokio::io::stdout(), frames).await,
    }
}

/// Write frames to a file, overwriting any existing content.
async fn write_file(output: &Path, frames: &[String]) -> AppResult<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(output)
        .await?;
    write_frames(&mut file, frames).await
}

pub async fn write_frames<W: AsyncWrite + Unpin>(out: &mut W, frames: &[String]) -> AppResult<()> {
    for frame in frames {
        out.write_all(frame.as_bytes()).await?;
        out.write_all(b"\n").await?;
    }
    out.flush().await?;
    Ok(())
}
