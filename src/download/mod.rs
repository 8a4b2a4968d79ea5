mod blocking;
pub mod utils;

pub use blocking::download_file_blocking;

/// Read size used when streaming a response body to disk.
pub const DEFAULT_CHUNK_SIZE: usize = 65_536;
