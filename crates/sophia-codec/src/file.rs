use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::text;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} is not valid UTF-8 text", path.display())]
    NotText { path: PathBuf },

    #[error("{} does not contain valid base64: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: base64::DecodeError,
    },
}

/// Outcome of a successful `encode_file` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    pub bytes_read: usize,
    pub chars_written: usize,
}

/// Read `input` whole, base64-encode it and write the text to `output`,
/// replacing whatever `output` held before.
pub fn encode_file(input: &Path, output: &Path) -> Result<EncodeReport, CodecError> {
    let bytes = fs::read(input).map_err(|source| CodecError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), input.display());

    let encoded = text::encode(&bytes);

    fs::write(output, &encoded).map_err(|source| CodecError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        bytes_read = bytes.len(),
        chars_written = encoded.len(),
        "Base64 saved to {}",
        output.display()
    );

    Ok(EncodeReport {
        bytes_read: bytes.len(),
        chars_written: encoded.len(),
    })
}

/// Inverse of `encode_file`. Returns the number of bytes written.
pub fn decode_file(input: &Path, output: &Path) -> Result<usize, CodecError> {
    let raw = fs::read(input).map_err(|source| CodecError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let encoded = String::from_utf8(raw).map_err(|_| CodecError::NotText {
        path: input.to_path_buf(),
    })?;

    let bytes = text::decode(&encoded).map_err(|source| CodecError::Decode {
        path: input.to_path_buf(),
        source,
    })?;

    fs::write(output, &bytes).map_err(|source| CodecError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!("Decoded {} bytes to {}", bytes.len(), output.display());
    Ok(bytes.len())
}

/// `clips/hello1.mp3` -> `clips/hello1_base64.txt`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_base64.txt", stem))
}
