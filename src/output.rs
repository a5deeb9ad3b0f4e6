use crate::errors::PreparerError;
use chrono::NaiveDate;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Gzips the whole payload as a single member.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, PreparerError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// `<dir>/YYYYMMDD`, with `.gz` appended for compressed output.
pub fn log_file_path(dir: &Path, day: NaiveDate, compressed: bool) -> PathBuf {
    let mut name = day.format("%Y%m%d").to_string();
    if compressed {
        name.push_str(".gz");
    }
    dir.join(name)
}

/// Replaces the contents of `path` with `payload`.
pub fn save(path: &Path, payload: &[u8]) -> Result<(), PreparerError> {
    let write = || -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(payload)?;
        file.flush()
    };
    write().map_err(|source| PreparerError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Prints the payload to `writer`. Plain text gets a closing newline;
/// compressed bytes are written as they are.
///
/// Errors (typically a reader that went away) are ignored.
pub fn print<W: Write>(mut writer: W, payload: &[u8], compressed: bool) {
    if let Err(e) = write_payload(&mut writer, payload, compressed) {
        log::debug!("Ignoring stdout error: {}", e);
    }
}

fn write_payload<W: Write>(writer: &mut W, payload: &[u8], compressed: bool) -> io::Result<()> {
    writer.write_all(payload)?;
    if !compressed {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
