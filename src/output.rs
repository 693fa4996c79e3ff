//! # Output
//!
//! The generated files are CP1252 encoded with CRLF line endings. Both files are rendered in
//! memory before either is written, and each is written to a sibling temporary file and renamed
//! into place, so a failed run never leaves a half-written configuration behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::jsondb::read_folder;
use crate::{Catalog, ExportConfig, ExportError};

/// Extension of the device/container file.
pub const DEVICES_EXTENSION: &str = "things";
/// Extension of the variable file.
pub const VARIABLES_EXTENSION: &str = "items";

// Characters of the 0x80..=0x9F block; `None` marks the five undefined code points.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

fn cp1252_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return u8::try_from(code).ok();
    }
    CP1252_HIGH
        .iter()
        .position(|mapped| *mapped == Some(c))
        .and_then(|offset| u8::try_from(0x80 + offset).ok())
}

/// Encodes `text` as CP1252.
///
/// Characters outside the code page become `?`. Returns the bytes and the number of replaced
/// characters.
pub fn encode_cp1252(text: &str) -> (Vec<u8>, usize) {
    let mut bytes = Vec::with_capacity(text.len());
    let mut replaced = 0;
    for c in text.chars() {
        match cp1252_byte(c) {
            Some(b) => bytes.push(b),
            None => {
                bytes.push(b'?');
                replaced += 1;
            }
        }
    }
    (bytes, replaced)
}

/// Writes `bytes` to a temporary sibling of `path`, then renames it over `path`.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ExportError::Io {
            path: path.display().to_string(),
            message: "not a file path".to_string(),
        })?;
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(ExportError::io(&tmp, e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ExportError::io(path, e)
    })
}

/// What an export run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Path of the device/container file.
    pub devices_path: PathBuf,
    /// Path of the variable file.
    pub variables_path: PathBuf,
    /// Number of top-level containers written.
    pub containers: usize,
    /// Number of devices written, nested or standalone.
    pub devices: usize,
    /// Number of variables written.
    pub variables: usize,
    /// Characters replaced by `?` across both files.
    pub replaced_characters: usize,
}

/// Reads the database in `input`, builds the catalog and writes `<base>.things` and
/// `<base>.items` into `output`.
pub fn export_folder(
    input: &Path,
    output: &Path,
    base: &str,
    config: &ExportConfig,
) -> Result<ExportSummary, ExportError> {
    let records = read_folder(input)?;
    let catalog = Catalog::build(&records, config)?;

    let (devices_bytes, devices_replaced) =
        encode_cp1252(&catalog.devices.render(&config.render));
    let (variables_bytes, variables_replaced) =
        encode_cp1252(&catalog.variables.render(&config.render));
    let replaced_characters = devices_replaced + variables_replaced;
    if replaced_characters > 0 {
        warn!(
            "{} characters cannot be represented in CP1252 and were replaced by '?'",
            replaced_characters
        );
    }

    if !output.is_dir() {
        fs::create_dir_all(output).map_err(|e| ExportError::io(output, e))?;
    }
    let devices_path = output.join(format!("{}.{}", base, DEVICES_EXTENSION));
    let variables_path = output.join(format!("{}.{}", base, VARIABLES_EXTENSION));
    write_atomically(&devices_path, &devices_bytes)?;
    write_atomically(&variables_path, &variables_bytes)?;
    info!(
        "wrote {} and {}",
        devices_path.display(),
        variables_path.display()
    );

    Ok(ExportSummary {
        devices_path,
        variables_path,
        containers: catalog.devices.containers.len(),
        devices: catalog.devices.device_count(),
        variables: catalog.variables.variables.len(),
        replaced_characters,
    })
}
