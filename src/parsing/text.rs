//! Bounded reading and permissive decoding of input prefixes.
//!
//! Lab reports can be tens of megabytes, but only their first 100KB is ever
//! inspected. These helpers read at most that much, transparently
//! decompressing gzip input, and decode it without failing on bad UTF-8.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decode at most `limit` bytes of `bytes` as UTF-8.
///
/// Invalid sequences, including a multi-byte character cut by the limit,
/// become U+FFFD instead of failing.
#[must_use]
pub fn decode_prefix(bytes: &[u8], limit: usize) -> Cow<'_, str> {
    let end = bytes.len().min(limit);
    String::from_utf8_lossy(&bytes[..end])
}

/// Check for the gzip magic number
#[must_use]
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Read at most `limit` bytes from a reader, decompressing gzip input.
///
/// # Errors
///
/// Returns an I/O error if reading or decompression fails.
pub fn read_prefix<R: BufRead>(mut reader: R, limit: usize) -> io::Result<Vec<u8>> {
    let gzipped = is_gzip(reader.fill_buf()?);
    let limit = u64::try_from(limit).unwrap_or(u64::MAX);

    let mut buffer = Vec::new();
    if gzipped {
        MultiGzDecoder::new(reader)
            .take(limit)
            .read_to_end(&mut buffer)?;
    } else {
        reader.take(limit).read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}

/// Read at most `limit` bytes from a file, or from stdin when the path is `-`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn read_path_prefix(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        return read_prefix(stdin.lock(), limit);
    }

    let file = File::open(path)?;
    read_prefix(BufReader::new(file), limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_decode_prefix_truncates() {
        assert_eq!(decode_prefix(b"abcdef", 3), "abc");
        assert_eq!(decode_prefix(b"ab", 10), "ab");
        assert_eq!(decode_prefix(b"", 10), "");
    }

    #[test]
    fn test_decode_prefix_replaces_invalid_bytes() {
        let decoded = decode_prefix(b"ok\xff\xfeok", 100);
        assert_eq!(decoded, "ok\u{fffd}\u{fffd}ok");
    }

    #[test]
    fn test_decode_prefix_split_character() {
        // "é" is two bytes; cutting after the first leaves a replacement char
        let decoded = decode_prefix("aé".as_bytes(), 2);
        assert_eq!(decoded, "a\u{fffd}");
    }

    #[test]
    fn test_read_prefix_plain() {
        let data = b"0123456789";
        let read = read_prefix(&data[..], 4).unwrap();
        assert_eq!(read, b"0123");
    }

    #[test]
    fn test_read_prefix_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"[Header]\n[Data]\n").unwrap();
        let compressed = encoder.finish().unwrap();
        assert!(is_gzip(&compressed));

        let read = read_prefix(&compressed[..], 8).unwrap();
        assert_eq!(read, b"[Header]");
    }

    #[test]
    fn test_read_prefix_empty() {
        let read = read_prefix(&b""[..], 100).unwrap();
        assert!(read.is_empty());
    }
}
