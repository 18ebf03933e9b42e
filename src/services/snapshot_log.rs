//! Sinks de snapshots del ciclo de vida
//!
//! Registro append-only y en orden de los pasos ejecutados.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::snapshot::LifecycleSnapshot;
use crate::utils::errors::AppResult;

/// Destino externo de snapshots
pub trait SnapshotSink {
    fn record(&mut self, snapshot: &LifecycleSnapshot) -> AppResult<()>;
}

/// Log en memoria
#[derive(Debug, Default)]
pub struct MemorySnapshotLog {
    records: Vec<LifecycleSnapshot>,
}

impl MemorySnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LifecycleSnapshot] {
        &self.records
    }
}

impl SnapshotSink for MemorySnapshotLog {
    fn record(&mut self, snapshot: &LifecycleSnapshot) -> AppResult<()> {
        self.records.push(snapshot.clone());
        Ok(())
    }
}

/// Archivo JSON Lines, un snapshot por línea
#[derive(Debug)]
pub struct JsonLinesSnapshotLog {
    path: PathBuf,
}

impl JsonLinesSnapshotLog {
    /// Crear el sink, preparando el directorio padre
    pub fn create(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for JsonLinesSnapshotLog {
    fn record(&mut self, snapshot: &LifecycleSnapshot) -> AppResult<()> {
        let line = serde_json::to_string(snapshot)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lifecycle::LifecycleState;
    use chrono::Utc;
    use uuid::Uuid;

    fn snapshot(step: &str) -> LifecycleSnapshot {
        LifecycleSnapshot {
            run_id: Uuid::new_v4(),
            step: step.to_string(),
            state: LifecycleState::Created,
            timestamp: Utc::now(),
            request: None,
            route: None,
            route_options: None,
            carrier: None,
        }
    }

    #[test]
    fn test_memory_log_preserves_order() {
        let mut log = MemorySnapshotLog::new();
        log.record(&snapshot("a")).unwrap();
        log.record(&snapshot("b")).unwrap();
        let steps: Vec<_> = log.records().iter().map(|s| s.step.as_str()).collect();
        assert_eq!(steps, vec!["a", "b"]);
    }

    #[test]
    fn test_json_lines_log_appends() {
        let path = std::env::temp_dir()
            .join(format!("freight_routing_{}", Uuid::new_v4()))
            .join("snapshots.jsonl");
        let mut log = JsonLinesSnapshotLog::create(&path).unwrap();
        log.record(&snapshot("request_created")).unwrap();
        log.record(&snapshot("container_attached")).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let steps: Vec<String> = content
            .lines()
            .map(|line| serde_json::from_str::<LifecycleSnapshot>(line).unwrap().step)
            .collect();
        assert_eq!(steps, vec!["request_created", "container_attached"]);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
