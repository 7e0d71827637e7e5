// SPDX-License-Identifier: MIT
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{CpuInfo, Event};

pub const BENCHMARK_INFO_FILE_NAME: &str = "benchmark.info";

pub const MAGIC: [u8; 4] = *b"TXBI";
pub const FORMAT_VERSION: u8 = 1;

const MAX_INFO_LEN: usize = 16 * 1024 * 1024;

/// Identity of a benchmark, persisted next to its runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkInfo {
    pub name: String,
    pub cpu_info: CpuInfo,
    pub legend: String,
    pub events: Vec<Event>,
    pub created: SystemTime,
}

#[derive(Serialize, Deserialize, Debug)]
struct InfoFile {
    magic: [u8; 4],
    format_version: u8,
    info: BenchmarkInfo,
}

/// Writes `info` to the metadata file inside the benchmark directory `dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be created, serialized or flushed.
pub fn encode_benchmark_info(info: &BenchmarkInfo, dir: &Path) -> Result<()> {
    let path = dir.join(BENCHMARK_INFO_FILE_NAME);
    let file = File::create(&path)
        .with_context(|| format!("failed to create benchmark info: {}", path.display()))?;
    let mut encoder =
        zstd::Encoder::new(BufWriter::new(file), 3).context("failed to create zstd encoder")?;

    let record = InfoFile {
        magic: MAGIC,
        format_version: FORMAT_VERSION,
        info: info.clone(),
    };
    let serialized = postcard::to_stdvec(&record).context("failed to serialize benchmark info")?;

    #[allow(clippy::cast_possible_truncation)]
    let len = serialized.len() as u32;
    encoder
        .write_all(&len.to_le_bytes())
        .context("failed to write benchmark info length")?;
    encoder
        .write_all(&serialized)
        .context("failed to write benchmark info")?;

    let mut buf_writer = encoder.finish().context("failed to finish zstd encoder")?;
    buf_writer
        .flush()
        .context("failed to flush benchmark info")?;
    Ok(())
}

/// Reads and validates the metadata file inside the benchmark directory `dir`.
///
/// # Errors
///
/// Returns an error if the file is missing, truncated, not a benchmark info
/// file, or written by an unsupported format version.
pub fn decode_benchmark_info(dir: &Path) -> Result<BenchmarkInfo> {
    let path = dir.join(BENCHMARK_INFO_FILE_NAME);
    let file = File::open(&path)
        .with_context(|| format!("failed to open benchmark info: {}", path.display()))?;
    let mut decoder =
        zstd::Decoder::new(BufReader::new(file)).context("failed to create zstd decoder")?;

    let mut len_buf = [0u8; 4];
    decoder
        .read_exact(&mut len_buf)
        .context("failed to read benchmark info length")?;
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_INFO_LEN {
        bail!("benchmark info length {len} exceeds limit of {MAX_INFO_LEN} bytes");
    }

    let mut data = vec![0u8; len];
    decoder
        .read_exact(&mut data)
        .context("failed to read benchmark info")?;

    let record: InfoFile =
        postcard::from_bytes(&data).context("failed to deserialize benchmark info")?;
    if record.magic != MAGIC {
        bail!("invalid magic bytes in benchmark info");
    }
    if record.format_version != FORMAT_VERSION {
        bail!(
            "unsupported benchmark info version {} (expected {FORMAT_VERSION})",
            record.format_version
        );
    }

    Ok(record.info)
}

/// Like [`decode_benchmark_info`], but reports any failure as "no usable
/// metadata".
#[must_use]
pub fn load_benchmark_info(dir: &Path) -> Option<BenchmarkInfo> {
    match decode_benchmark_info(dir) {
        Ok(info) => Some(info),
        Err(e) => {
            debug!("benchmark info at {} is unusable: {e:#}", dir.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn make_info() -> BenchmarkInfo {
        BenchmarkInfo {
            name: "allocator".to_string(),
            cpu_info: CpuInfo::new("GenuineIntel-6-55-4", 2_100_000_000),
            legend: "allocator v1".to_string(),
            events: vec![
                Event::user("cycles"),
                Event {
                    name: "l1d-miss".to_string(),
                    uarch_name: "L1D.REPLACEMENT".to_string(),
                    user: true,
                    kernel: true,
                },
            ],
            created: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn identity_survives_encode_then_decode() {
        let dir = TempDir::new().unwrap();
        let info = make_info();

        encode_benchmark_info(&info, dir.path()).unwrap();
        let decoded = decode_benchmark_info(dir.path()).unwrap();

        assert_eq!(decoded.name, info.name);
        assert_eq!(decoded.cpu_info, info.cpu_info);
        assert_eq!(decoded.legend, info.legend);
        assert_eq!(decoded.events, info.events);
        assert_eq!(decoded.created, info.created);
    }

    #[test]
    fn missing_file_is_unusable() {
        let dir = TempDir::new().unwrap();
        assert!(load_benchmark_info(dir.path()).is_none());
        let err = decode_benchmark_info(dir.path()).unwrap_err();
        assert!(err.to_string().contains("failed to open benchmark info"));
    }

    #[test]
    fn garbage_file_is_unusable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(BENCHMARK_INFO_FILE_NAME), b"[benchmark]\nname=x\n").unwrap();
        assert!(load_benchmark_info(dir.path()).is_none());
    }

    #[test]
    fn truncated_file_is_unusable() {
        let dir = TempDir::new().unwrap();
        encode_benchmark_info(&make_info(), dir.path()).unwrap();
        let path = dir.path().join(BENCHMARK_INFO_FILE_NAME);
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(load_benchmark_info(dir.path()).is_none());
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = TempDir::new().unwrap();
        let record = InfoFile {
            magic: *b"NOPE",
            format_version: FORMAT_VERSION,
            info: make_info(),
        };
        write_raw_record(dir.path(), &record);

        let err = decode_benchmark_info(dir.path()).unwrap_err();
        assert!(err.to_string().contains("invalid magic"));
    }

    #[test]
    fn future_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let record = InfoFile {
            magic: MAGIC,
            format_version: FORMAT_VERSION + 1,
            info: make_info(),
        };
        write_raw_record(dir.path(), &record);

        let err = decode_benchmark_info(dir.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported benchmark info version"));
    }

    fn write_raw_record(dir: &Path, record: &InfoFile) {
        let serialized = postcard::to_stdvec(record).unwrap();
        let mut plain = (serialized.len() as u32).to_le_bytes().to_vec();
        plain.extend_from_slice(&serialized);
        let compressed = zstd::encode_all(plain.as_slice(), 3).unwrap();
        fs::write(dir.join(BENCHMARK_INFO_FILE_NAME), compressed).unwrap();
    }
}
