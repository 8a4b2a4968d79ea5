use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

const FALLBACK_FILE_NAME: &str = "tmp.bin";

/// Where a file named `file_name` lands for a requested `location`.
///
/// An existing regular file is overwritten in place; anything else is
/// treated as a directory.
pub fn resolve_destination(location: &Path, file_name: &str) -> PathBuf {
    if location.is_file() {
        location.to_path_buf()
    } else {
        location.join(file_name)
    }
}

/// Keep only the final component of a server-provided file name.
pub fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}

pub fn file_name_from_url(url: &Url) -> String {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    sanitize_file_name(&percent_decode_str(last).decode_utf8_lossy())
}

pub fn hash_file(path: &Path, chunk_size: usize) -> io::Result<[u8; 32]> {
    use sha2::{Digest, Sha256};
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; chunk_size];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hasher.finalize().into())
}
