// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image source ingestion.
//!
//! Base images are carried in the composition as strings: either a
//! `data:<mime>;base64,` URI or a remote URL. This module produces those
//! strings from local files and remote URLs, and decodes any of them (or a
//! plain file path) back into pixels.

use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Read a local image file into a data URI, keeping its original encoding.
pub fn file_to_data_uri(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let format = ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(&bytes))
        .with_context(|| format!("Unrecognised image type: {}", path.display()))?;
    Ok(encode_data_uri(format.to_mime_type(), &bytes))
}

/// Download the bytes behind `url`.
pub fn fetch(url: &str) -> Result<Vec<u8>> {
    log::info!("Fetching {}", url);
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Server rejected {}", url))?;
    let bytes = response.bytes().context("Failed to read response body")?;
    Ok(bytes.to_vec())
}

/// Fetch a remote image and re-encode it as a PNG data URI.
///
/// When the download succeeds but the bytes cannot be normalised, the raw URL
/// is returned so the caller can still try to display it.
pub fn resolve_remote(url: &str) -> Result<String> {
    let bytes = fetch(url)?;
    match normalize_to_png(&bytes) {
        Ok(uri) => Ok(uri),
        Err(e) => {
            log::warn!("Could not normalise {}: {:#}; using the URL as is", url, e);
            Ok(url.to_string())
        }
    }
}

fn normalize_to_png(bytes: &[u8]) -> Result<String> {
    let image = image::load_from_memory(bytes).context("Failed to decode image")?;
    let png = encode_png(&image)?;
    Ok(encode_data_uri(ImageFormat::Png.to_mime_type(), &png))
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(out)
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URI into its mime type and decoded payload.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("Not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("Data URI has no payload"))?;
    let Some(mime) = header.strip_suffix(";base64") else {
        bail!("Only base64 data URIs are supported");
    };
    let bytes = STANDARD
        .decode(payload.trim())
        .context("Invalid base64 in data URI")?;
    Ok((mime.to_string(), bytes))
}

/// Decode any supported image source: a data URI, an `http(s)` URL or a
/// local file path.
pub fn decode_source(source: &str) -> Result<DynamicImage> {
    let bytes = if source.starts_with("data:") {
        parse_data_uri(source)?.1
    } else if source.starts_with("http://") || source.starts_with("https://") {
        fetch(source)?
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read {}", source))?
    };
    image::load_from_memory(&bytes).context("Failed to decode image")
}

/// Display name for a file: its stem, or the whole path as a fallback.
pub fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
