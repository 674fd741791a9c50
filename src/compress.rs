//! Whole-frame compression codecs.
//!
//! The transport consumes compression as an opaque capability: compress a
//! byte buffer, decompress a byte buffer. Concrete codecs are interchangeable
//! behind [`CompressionCodec`]; the transport never depends on a specific
//! format.

use std::io;
use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// An opaque whole-buffer compression capability.
///
/// Implementations must fully finalize their compressor before returning:
/// compressors may buffer output until closed.
pub trait CompressionCodec {
    /// Short codec name, for logging.
    fn name(&self) -> &'static str;

    /// Compress `input` into a fresh buffer.
    fn compress(&self, input: &[u8]) -> io::Result<Vec<u8>>;

    /// Fully decompress `input` into a fresh buffer.
    fn decompress(&self, input: &[u8]) -> io::Result<Vec<u8>>;
}

/// Gzip codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gzip;

impl CompressionCodec for Gzip {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress(&self, input: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(input.len()), Compression::fast());
        encoder.write_all(input)?;
        encoder.finish()
    }

    fn decompress(&self, input: &[u8]) -> io::Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(input);
        let mut output = Vec::new();
        decoder.read_to_end(&mut output)?;
        Ok(output)
    }
}

/// LZ4 codec with a size-prepended block format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4;

impl CompressionCodec for Lz4 {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress(&self, input: &[u8]) -> io::Result<Vec<u8>> {
        Ok(lz4_flex::compress_prepend_size(input))
    }

    fn decompress(&self, input: &[u8]) -> io::Result<Vec<u8>> {
        lz4_flex::decompress_size_prepended(input)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gzip_roundtrip() {
        let data: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();
        let compressed = Gzip.compress(&data).unwrap();
        assert_ne!(compressed, data);
        let decompressed = Gzip.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_gzip_empty_input() {
        let compressed = Gzip.compress(&[]).unwrap();
        let decompressed = Gzip.decompress(&compressed).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn test_gzip_corrupt_input_fails() {
        assert!(Gzip.decompress(&[0xFF; 16]).is_err());
    }

    #[test]
    fn test_lz4_roundtrip() {
        let data = b"framestream framestream framestream".to_vec();
        let compressed = Lz4.compress(&data).unwrap();
        let decompressed = Lz4.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_lz4_corrupt_input_fails() {
        // valid size prefix, garbage block
        let mut bad = 64u32.to_le_bytes().to_vec();
        bad.extend_from_slice(&[0xFF; 4]);
        let err = Lz4.decompress(&bad).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_codec_names() {
        assert_eq!(Gzip.name(), "gzip");
        assert_eq!(Lz4.name(), "lz4");
    }
}
