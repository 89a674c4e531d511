//! Trajectory recorder implementation

use crate::error::{Result, TrajectoryError};
use crate::trajectory::entry::EntryType;
use crate::trajectory::TrajectoryEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records execution trajectories for debugging and analysis
pub struct TrajectoryRecorder {
    id: String,
    started_at: DateTime<Utc>,
    entries: RwLock<Vec<TrajectoryEntry>>,
    file_path: Option<PathBuf>,
    auto_save: bool,
}

/// Complete trajectory data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    /// Metadata about the trajectory
    pub metadata: TrajectoryMetadata,

    /// All trajectory entries
    pub entries: Vec<TrajectoryEntry>,
}

/// Metadata for a trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryMetadata {
    /// Unique identifier for this trajectory
    pub id: String,

    /// When the trajectory was started
    pub started_at: DateTime<Utc>,

    /// Version of the trajectory format
    pub version: String,

    /// Task that was being executed
    pub task: Option<String>,

    /// Whether the task was successful
    pub success: Option<bool>,

    /// Total duration in milliseconds
    pub duration_ms: Option<u64>,
}

impl TrajectoryRecorder {
    /// Create a new in-memory trajectory recorder
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            entries: RwLock::new(Vec::new()),
            file_path: None,
            auto_save: false,
        }
    }

    /// Create a trajectory recorder that saves to a file after each entry
    pub fn with_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            entries: RwLock::new(Vec::new()),
            file_path: Some(path.as_ref().to_path_buf()),
            auto_save: true,
        }
    }

    /// Record a trajectory entry
    pub async fn record(&self, entry: TrajectoryEntry) -> Result<()> {
        {
            let mut entries = self.entries.write().await;
            entries.push(entry);
        }

        if self.auto_save {
            self.save().await?;
        }

        Ok(())
    }

    /// Get all recorded entries
    pub async fn get_entries(&self) -> Vec<TrajectoryEntry> {
        self.entries.read().await.clone()
    }

    /// Get the number of recorded entries
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Save the trajectory to its file, if one was configured
    pub async fn save(&self) -> Result<()> {
        if let Some(path) = &self.file_path {
            let trajectory = self.build_trajectory().await;
            let json = serde_json::to_string_pretty(&trajectory).map_err(|e| {
                TrajectoryError::RecordingFailed {
                    message: e.to_string(),
                }
            })?;
            fs::write(path, json).await?;
        }
        Ok(())
    }

    async fn build_trajectory(&self) -> Trajectory {
        let entries = self.entries.read().await.clone();

        let task = entries.iter().find_map(|entry| match &entry.entry_type {
            EntryType::TaskStart { task } => Some(task.clone()),
            _ => None,
        });

        let (success, duration_ms) = entries
            .iter()
            .rev()
            .find_map(|entry| match &entry.entry_type {
                EntryType::TaskComplete {
                    success,
                    duration_ms,
                    ..
                } => Some((Some(*success), Some(*duration_ms))),
                _ => None,
            })
            .unwrap_or((None, None));

        Trajectory {
            metadata: TrajectoryMetadata {
                id: self.id.clone(),
                started_at: self.started_at,
                version: "1.0".to_string(),
                task,
                success,
                duration_ms,
            },
            entries,
        }
    }
}

impl Trajectory {
    /// Load a previously saved trajectory from disk
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref())
                .await
                .map_err(|_| TrajectoryError::LoadFailed {
                    path: path.as_ref().display().to_string(),
                })?;

        serde_json::from_str(&content).map_err(|_| TrajectoryError::InvalidFormat.into())
    }
}

impl Default for TrajectoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}
