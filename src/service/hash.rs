use crate::models::error::{Result, SwapError};
use blake2::{Blake2b512, Digest};
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

/// BLAKE2b-512 digest of the whole file, hex encoded
pub fn hash_file(file: &Path) -> Result<String> {
    let hash_error = |cause| SwapError::HashError {
        path: file.to_path_buf(),
        cause,
    };
    let reader = BufReader::new(fs::File::open(file).map_err(hash_error)?);
    hasher(reader).map_err(hash_error)
}

fn hasher<R: Read>(mut reader: BufReader<R>) -> std::io::Result<String> {
    let mut hasher = Blake2b512::new();
    let mut buffer = [0; 8192];
    loop {
        let count = reader.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_hash_is_hex_of_512_bits() {
        let hash = hasher(BufReader::new(Cursor::new(b"bgm"))).unwrap();
        assert_eq!(hash.len(), 128);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_known_digest_of_empty_input() {
        let hash = hasher(BufReader::new(Cursor::new(Vec::<u8>::new()))).unwrap();
        assert!(hash.starts_with("786a02f742015903c6c6fd852552d272"));
    }

    #[test]
    fn test_hash_spans_multiple_buffers() {
        let mut data = vec![0u8; 20_000];
        let first = hasher(BufReader::new(Cursor::new(data.clone()))).unwrap();
        data[19_999] = 1;
        let second = hasher(BufReader::new(Cursor::new(data))).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_file_matches_for_equal_content() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.mp3");
        let b = temp_dir.path().join("b.mp3");
        fs::write(&a, [0xAA, 0xBB]).unwrap();
        fs::write(&b, [0xAA, 0xBB]).unwrap();

        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn test_hash_missing_file() {
        let result = hash_file(Path::new("/this/does/not/exist.mp3"));
        assert!(matches!(result, Err(SwapError::HashError { .. })));
    }
}
