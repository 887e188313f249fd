use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Worker cap used when the hardware concurrency cannot be detected.
pub const FALLBACK_MAX_PROCS: usize = 4;

/// Where the harness reads images from, writes logs to, and which engine
/// it exercises. Workers receive a copy of this on startup.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Directory holding the images and their manifest.csv
    #[arg(long, default_value = "images")]
    pub images: PathBuf,

    /// Directory receiving one log file per worker and image kind
    #[arg(long, default_value = "output")]
    pub output: PathBuf,

    /// Engine implementation to exercise
    #[arg(long, default_value = "null")]
    pub engine: String,

    /// Read-only configuration directory handed to the engine
    #[arg(long, default_value = "config")]
    pub engine_config: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            images: PathBuf::from("images"),
            output: PathBuf::from("output"),
            engine: "null".to_string(),
            engine_config: PathBuf::from("config"),
        }
    }
}

/// Operations this executable can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Identify,
    Supported,
    Segment,
    Orientation,
    Usage,
}

impl Operation {
    /// Operations that run over the image set.
    pub fn is_suite(self) -> bool {
        matches!(self, Operation::Segment | Operation::Orientation)
    }
}

pub fn hardware_concurrency() -> Option<usize> {
    std::thread::available_parallelism().ok().map(|n| n.get())
}

/// Validate a requested worker count against the machine.
pub fn check_num_procs(requested: usize, available: Option<usize>) -> Result<usize, String> {
    let limit = available.unwrap_or(FALLBACK_MAX_PROCS);
    if requested == 0 || requested > limit {
        return Err(format!(
            "Asked to spawn {} processes, but refusing (allowed: 1 to {})",
            requested, limit
        ));
    }
    Ok(requested)
}

/// clap value parser for `-f`.
pub fn parse_num_procs(s: &str) -> Result<usize, String> {
    let requested: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("an error occurred when parsing \"{}\"", s))?;
    check_num_procs(requested, hardware_concurrency())
}
