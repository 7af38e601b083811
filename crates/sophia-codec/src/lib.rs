//! Sophia Codec Library
//!
//! Base64 text encoding for binary payloads (audio clips in practice).
//! Files are read and written whole; there is no streaming mode.

pub mod file;
pub mod text;

pub use file::{CodecError, EncodeReport, decode_file, default_output_path, encode_file};
pub use text::{decode, encode};
