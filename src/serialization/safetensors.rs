//! `SafeTensors` reader/writer for scaler and model artifacts.
//!
//! Errors are plain `String`s at this layer; the artifact store attaches the
//! file path and wraps them into [`crate::error::KaloriError`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Metadata for a single tensor in `SafeTensors` format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorMetadata {
    /// Data type of the tensor. Only "F32" is supported.
    pub dtype: String,
    /// Shape of the tensor (e.g., `[n_columns]` or `[1]`).
    pub shape: Vec<usize>,
    /// Data offsets `[start, end]` in the raw data section.
    pub data_offsets: [usize; 2],
}

/// Complete `SafeTensors` metadata structure.
/// Uses `BTreeMap` for deterministic JSON serialization (sorted keys).
pub type SafeTensorsMetadata = BTreeMap<String, TensorMetadata>;

/// Saves tensors to `SafeTensors` format.
///
/// # Arguments
///
/// * `path` - File path to write to
/// * `tensors` - Map of tensor names to (data, shape) tuples
///
/// # Errors
///
/// Returns an error if a shape doesn't match its data length, if JSON
/// serialization fails, or if the file cannot be written.
pub fn save_safetensors<P: AsRef<Path>>(
    path: P,
    tensors: &BTreeMap<String, (Vec<f32>, Vec<usize>)>,
) -> std::result::Result<(), String> {
    let mut metadata = SafeTensorsMetadata::new();
    let mut raw_data = Vec::new();
    let mut current_offset = 0;

    for (name, (data, shape)) in tensors {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(format!(
                "Tensor '{name}': shape {shape:?} expects {expected} values, got {}",
                data.len()
            ));
        }

        let start = current_offset;
        for value in data {
            raw_data.extend_from_slice(&value.to_le_bytes());
        }
        current_offset += data.len() * 4;

        metadata.insert(
            name.clone(),
            TensorMetadata {
                dtype: "F32".to_string(),
                shape: shape.clone(),
                data_offsets: [start, current_offset],
            },
        );
    }

    let header =
        serde_json::to_string(&metadata).map_err(|e| format!("Metadata serialization failed: {e}"))?;

    let mut bytes = Vec::with_capacity(8 + header.len() + raw_data.len());
    bytes.extend_from_slice(&(header.len() as u64).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(&raw_data);

    fs::write(path, bytes).map_err(|e| format!("File write failed: {e}"))
}

/// Loads a `SafeTensors` file, returning metadata and the raw data section.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the format is invalid.
pub fn load_safetensors<P: AsRef<Path>>(
    path: P,
) -> std::result::Result<(SafeTensorsMetadata, Vec<u8>), String> {
    let bytes = fs::read(path).map_err(|e| format!("File read failed: {e}"))?;
    let metadata_len = validate_and_read_header(&bytes)?;
    let metadata = parse_metadata(&bytes, metadata_len)?;
    let raw_data = bytes[8 + metadata_len..].to_vec();
    Ok((metadata, raw_data))
}

/// Extracts an F32 tensor from the raw data section.
///
/// # Errors
///
/// Returns an error if the dtype is not F32, the offsets fall outside the
/// data section, or the byte count disagrees with the declared shape.
pub fn extract_tensor(
    raw_data: &[u8],
    meta: &TensorMetadata,
) -> std::result::Result<Vec<f32>, String> {
    if meta.dtype != "F32" {
        return Err(format!("Unsupported dtype '{}', expected F32", meta.dtype));
    }

    let [start, end] = meta.data_offsets;
    if start > end || end > raw_data.len() {
        return Err(format!(
            "Tensor offsets [{start}, {end}] out of bounds (data section is {} bytes)",
            raw_data.len()
        ));
    }

    let bytes = &raw_data[start..end];
    if bytes.len() % 4 != 0 {
        return Err(format!(
            "Tensor byte length {} is not a multiple of 4",
            bytes.len()
        ));
    }

    let expected: usize = meta.shape.iter().product();
    if bytes.len() / 4 != expected {
        return Err(format!(
            "Tensor holds {} values, shape {:?} expects {expected}",
            bytes.len() / 4,
            meta.shape
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn validate_and_read_header(bytes: &[u8]) -> std::result::Result<usize, String> {
    if bytes.len() < 8 {
        return Err(format!(
            "File too small for SafeTensors header: {} bytes",
            bytes.len()
        ));
    }

    let mut header = [0u8; 8];
    header.copy_from_slice(&bytes[..8]);
    let metadata_len = u64::from_le_bytes(header) as usize;

    if bytes.len() < 8 + metadata_len {
        return Err(format!(
            "Truncated file: header declares {metadata_len} metadata bytes, {} available",
            bytes.len() - 8
        ));
    }

    Ok(metadata_len)
}

fn parse_metadata(
    bytes: &[u8],
    metadata_len: usize,
) -> std::result::Result<SafeTensorsMetadata, String> {
    let json = std::str::from_utf8(&bytes[8..8 + metadata_len])
        .map_err(|e| format!("Metadata is not valid UTF-8: {e}"))?;

    let entries: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(json).map_err(|e| format!("Metadata JSON parse failed: {e}"))?;

    let mut metadata = SafeTensorsMetadata::new();
    for (name, entry) in entries {
        // Free-form string map written by other tooling; not tensor metadata.
        if name == "__metadata__" {
            continue;
        }
        let tensor: TensorMetadata = serde_json::from_value(entry)
            .map_err(|e| format!("Tensor '{name}': invalid metadata: {e}"))?;
        metadata.insert(name, tensor);
    }

    Ok(metadata)
}
