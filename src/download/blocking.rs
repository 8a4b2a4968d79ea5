use log::debug;
use reqwest::blocking::Client;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use url::Url;

use crate::synapse::SynapseError;
use crate::synapse::client::error_for_status;

/// Stream `url` to `destination`, returning the number of bytes written.
///
/// The body is staged in a temporary file next to `destination` and renamed
/// over it once complete, so a failed transfer leaves nothing behind.
pub fn download_file_blocking(
    client: &Client,
    url: Url,
    destination: &Path,
    chunk_size: usize,
) -> Result<u64, SynapseError> {
    let target_dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(target_dir)?;

    // Pre-signed URLs carry their own authorization.
    let mut response = error_for_status(client.get(url).send()?)?;
    let content_length = response.content_length();

    let mut staged = NamedTempFile::new_in(target_dir)?;
    let mut buffer = vec![0; chunk_size];
    let mut downloaded: u64 = 0;
    loop {
        let data = response.read(&mut buffer[..])?;
        if data == 0 {
            break;
        }
        staged.write_all(&buffer[..data])?;
        downloaded += data as u64;
    }
    staged.as_file().sync_all()?;
    staged.persist(destination).map_err(|e| e.error)?;

    match content_length {
        Some(len) => debug!("Wrote {downloaded}/{len} bytes to {}", destination.display()),
        None => debug!("Wrote {downloaded} bytes to {}", destination.display()),
    }
    Ok(downloaded)
}
