pub mod cli;
pub mod download;
pub mod synapse;
