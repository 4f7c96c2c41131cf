// StreamFetcher - copies one rendition's byte stream into a local file

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::errors::TransferError;
use super::models::RenditionDescriptor;
use super::traits::{MediaStream, VideoResolver};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Download `rendition` to `dest`, replacing any existing file.
///
/// Returns the number of bytes written. Bytes are copied verbatim. The
/// destination handle is flushed and closed on every path out of this
/// function; nothing is retried.
pub async fn fetch(
    resolver: &dyn VideoResolver,
    rendition: &RenditionDescriptor,
    dest: &Path,
) -> Result<u64, TransferError> {
    let mut stream = resolver
        .open_stream(rendition)
        .await
        .map_err(|source| TransferError::StreamOpen {
            rendition: rendition.id.clone(),
            source,
        })?;

    let mut file = File::create(dest)
        .await
        .map_err(|source| TransferError::CreateFile {
            path: dest.to_path_buf(),
            source,
        })?;

    let copied = copy_stream(&mut stream, &mut file, rendition, dest).await;
    let flushed = file.flush().await;
    drop(file);

    let written = copied?;
    flushed.map_err(|source| TransferError::Write {
        path: dest.to_path_buf(),
        written,
        source,
    })?;

    tracing::info!(
        rendition = %rendition.id,
        dest = %dest.display(),
        bytes = written,
        "Stream saved"
    );
    Ok(written)
}

async fn copy_stream(
    stream: &mut MediaStream,
    file: &mut File,
    rendition: &RenditionDescriptor,
    dest: &Path,
) -> Result<u64, TransferError> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut written: u64 = 0;

    loop {
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|source| TransferError::Read {
                rendition: rendition.id.clone(),
                written,
                source,
            })?;
        if n == 0 {
            return Ok(written);
        }

        file.write_all(&buf[..n])
            .await
            .map_err(|source| TransferError::Write {
                path: dest.to_path_buf(),
                written,
                source,
            })?;
        written += n as u64;
    }
}
