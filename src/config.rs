use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::Ticks;
use crate::scheduler::FcfsMode;
use crate::sim::WorkloadEntry;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Number of feedback tiers ahead of the FCFS queue.
    pub num_tiers: usize,
    /// Quantum length used by every feedback tier.
    pub time_slice: Ticks,
    /// Per-tier quantum lengths; overrides `time_slice` when present.
    pub tier_time_slices: Option<Vec<Ticks>>,
    /// Queue capacity. Defaults to the workload size.
    pub capacity: Option<usize>,
    pub fcfs_mode: FcfsMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_tiers: 3,
            time_slice: 1,
            tier_time_slices: None,
            capacity: None,
            fcfs_mode: FcfsMode::Replay,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_tiers == 0 {
            return Err(ConfigError::NoTiers);
        }
        if self.time_slice == 0 {
            return Err(ConfigError::ZeroSlice { tier: None });
        }
        if let Some(slices) = &self.tier_time_slices {
            if slices.len() != self.num_tiers {
                return Err(ConfigError::SliceCountMismatch {
                    num_tiers: self.num_tiers,
                    slices: slices.len(),
                });
            }
            if let Some(tier) = slices.iter().position(|&slice| slice == 0) {
                return Err(ConfigError::ZeroSlice { tier: Some(tier) });
            }
        }
        Ok(())
    }

    pub fn slice_for(&self, tier: usize) -> Ticks {
        self.tier_time_slices
            .as_ref()
            .and_then(|slices| slices.get(tier).copied())
            .unwrap_or(self.time_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoTiers,
    ZeroSlice { tier: Option<usize> },
    SliceCountMismatch { num_tiers: usize, slices: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTiers => write!(f, "at least one feedback tier is required"),
            Self::ZeroSlice { tier: None } => write!(f, "time slice must be positive"),
            Self::ZeroSlice { tier: Some(tier) } => {
                write!(f, "time slice for tier {tier} must be positive")
            }
            Self::SliceCountMismatch { num_tiers, slices } => write!(
                f,
                "{slices} per-tier time slices given for {num_tiers} tiers"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A workload file: an optional `[config]` table plus `[[process]]` entries.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadFile {
    #[serde(default)]
    pub config: SimConfig,
    #[serde(default, rename = "process")]
    pub processes: Vec<WorkloadEntry>,
}

pub fn parse_workload_file(filepath: &Path) -> Result<WorkloadFile> {
    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read workload {}", filepath.display()))?;
    parse_workload_content(&content)
        .with_context(|| format!("Invalid workload file {}", filepath.display()))
}

pub fn parse_workload_content(content: &str) -> Result<WorkloadFile> {
    if content.trim().is_empty() {
        anyhow::bail!("The workload file is empty!")
    }
    let file: WorkloadFile = toml::from_str(content)?;
    file.config.validate()?;
    Ok(file)
}
