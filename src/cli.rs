use crate::download::{DEFAULT_CHUNK_SIZE, utils};
use crate::synapse::{Session, SynapseConfig};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;

/// Download the file attached to a Synapse evaluation submission.
#[derive(Debug, Parser)]
#[command(version, about, long_about=None)]
pub struct Cli {
    /// Submission ID
    #[arg(short = 's', long = "submissionId")]
    pub submission_id: String,

    /// File Download Location
    #[arg(short = 'f', long = "fileDownloadLocation")]
    pub file_download_location: PathBuf,

    /// Synapse configuration file [default: ~/.synapseConfig]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log verbosity, overridden by RUST_LOG
    #[arg(short, long, value_enum, default_value_t = Verbosity::Warn)]
    pub verbosity: Verbosity,
}

impl Cli {
    /// Log in and download the submission file, returning where it was written.
    pub fn execute(self) -> anyhow::Result<PathBuf> {
        let config = SynapseConfig::load(self.config.as_deref())
            .context("Unable to read Synapse configuration")?;
        let session = Session::login(&config)?;
        let path = session
            .download_submission_file(&self.submission_id, &self.file_download_location)?;

        let hash = utils::hash_file(&path, DEFAULT_CHUNK_SIZE)?;
        info!(
            "File downloaded to {}; SHA256: {}.",
            path.display(),
            hex::encode(hash)
        );
        Ok(path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Lowercase for RUST_LOG compatibility
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}
