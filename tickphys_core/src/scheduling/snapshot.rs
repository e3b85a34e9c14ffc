use crate::error::TickResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Point-in-time view of a scheduler's clocks, for diagnostics and tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub scheduler_name: String,
    pub normal_time: f64,
    pub fixed_time: f64,
    pub fixed_frame_count: u64,
    pub extra_delta_time: f32,
    pub time_at_simulation: f64,
    pub is_physic_updated: bool,
    pub auto_update: bool,
    /// Registry entries at snapshot time, including any not yet pruned.
    pub registered_objects: usize,
}

impl TickSnapshot {
    pub fn to_json(&self) -> TickResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    pub fn write_to(&self, path: &Path) -> TickResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::{NoopWorld, TickScheduler};

    #[test]
    fn test_snapshot_json_fields() {
        let mut scheduler = TickScheduler::new(NoopWorld).with_name("world2d");
        scheduler.tick(2.0, 0.625, 0.25);

        let json = scheduler.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["scheduler_name"], "world2d");
        assert_eq!(value["fixed_frame_count"], 2);
        assert_eq!(value["fixed_time"], 0.5);
        assert_eq!(value["extra_delta_time"], 0.125);
        assert_eq!(value["registered_objects"], 0);
    }

    #[test]
    fn test_write_to_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagnostics").join("tick.json");

        let snapshot = TickScheduler::new(NoopWorld).snapshot();
        snapshot.write_to(&path).unwrap();

        let restored: TickSnapshot =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, snapshot);
    }
}
