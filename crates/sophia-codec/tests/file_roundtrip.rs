//! Integration test: encode a file to base64 text, decode it back, and verify
//! the bytes match the original exactly.

use std::fs;
use std::path::PathBuf;

use sophia_codec::{decode_file, encode_file};

#[test]
fn roundtrip_empty_file() {
    roundtrip(0);
}

#[test]
fn roundtrip_unpadded_length() {
    roundtrip(3 * 1024); // no '=' padding
}

#[test]
fn roundtrip_padded_length() {
    roundtrip(10 * 1024 + 1);
}

#[test]
fn encoding_twice_is_identical() {
    let dir = scratch_dir();
    let input = dir.join("clip.mp3");
    fs::write(&input, pattern(4096)).unwrap();

    let first = dir.join("first.txt");
    let second = dir.join("second.txt");
    encode_file(&input, &first).unwrap();
    encode_file(&input, &second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    let _ = fs::remove_dir_all(&dir);
}

fn roundtrip(file_size: usize) {
    let dir = scratch_dir();
    let input = dir.join("clip.mp3");
    let encoded = dir.join("clip_base64.txt");
    let decoded = dir.join("clip_decoded.mp3");

    let data = pattern(file_size);
    fs::write(&input, &data).unwrap();

    let report = encode_file(&input, &encoded).unwrap();
    assert_eq!(report.bytes_read, file_size);
    assert_eq!(report.chars_written, file_size.div_ceil(3) * 4);

    let written = decode_file(&encoded, &decoded).unwrap();
    assert_eq!(written, file_size);
    assert_eq!(fs::read(&decoded).unwrap(), data);

    let _ = fs::remove_dir_all(&dir);
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sophia_codec_test_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}
