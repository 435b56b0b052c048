// src/storage.rs

//! Best-effort snapshot of canvas state.
//!
//! A snapshot is one JSON file, `<dir>/dagfolio-state.json`. Nothing depends
//! on it: every failure is logged and the caller carries on with the data
//! file as loaded.

use std::path::PathBuf;

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::canvas::WorkflowCanvas;
use crate::fs::FileSystem;
use crate::model::Connection;
use crate::types::{NodeId, Point, TaskStatus};

/// Fixed storage key; also the file stem on disk.
pub const STORAGE_KEY: &str = "dagfolio-state";

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: NodeId,
    pub status: TaskStatus,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: NodeId,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Hash of the task ids and dependencies the snapshot was taken from.
    pub fingerprint: String,
    pub scale: f64,
    pub pan: Point,
    pub tasks: Vec<TaskSnapshot>,
    #[serde(default)]
    pub groups: Vec<GroupSnapshot>,
    /// Connections added explicitly; derived ones are rebuilt from the data.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Snapshot {
    pub fn capture(canvas: &WorkflowCanvas) -> Self {
        let index = canvas.index();
        Self {
            version: SNAPSHOT_VERSION,
            fingerprint: fingerprint(canvas),
            scale: canvas.viewport().scale(),
            pan: canvas.viewport().pan(),
            tasks: index
                .tasks()
                .map(|n| TaskSnapshot {
                    id: n.task.id.clone(),
                    status: n.task.status,
                    position: n.task.position,
                })
                .collect(),
            groups: index
                .groups()
                .map(|g| GroupSnapshot {
                    id: g.id.clone(),
                    expanded: g.expanded,
                })
                .collect(),
            connections: canvas
                .connections()
                .iter()
                .filter(|c| !c.derived)
                .cloned()
                .collect(),
        }
    }

    /// Apply onto `canvas`. Ids the canvas does not know are skipped.
    pub fn apply(&self, canvas: &mut WorkflowCanvas) {
        for task in &self.tasks {
            if !canvas.force_task_status(&task.id, task.status) {
                debug!(task = %task.id, "snapshot task not on canvas; skipping");
                continue;
            }
            canvas.move_node(&task.id, task.position.x, task.position.y);
        }
        for group in &self.groups {
            let current = canvas.index().group(&group.id).map(|g| g.expanded);
            if current.is_some_and(|expanded| expanded != group.expanded) {
                canvas.toggle_group(&group.id);
            }
        }
        for c in &self.connections {
            canvas.add_connection(&c.from, &c.to, c.animated, c.label.as_deref());
        }
        canvas.set_viewport(self.scale, self.pan);
        canvas.redraw_all_connections();
    }
}

/// Stable hash over sorted task ids and their dependencies.
pub fn fingerprint(canvas: &WorkflowCanvas) -> String {
    let mut entries: Vec<(NodeId, Vec<NodeId>)> = canvas
        .index()
        .tasks()
        .map(|n| {
            let mut deps = n.task.dependencies.clone();
            deps.sort();
            (n.task.id.clone(), deps)
        })
        .collect();
    entries.sort();

    let mut hasher = Hasher::new();
    for (id, deps) in entries {
        hasher.update(id.as_bytes());
        hasher.update(b"<-");
        for dep in deps {
            hasher.update(dep.as_bytes());
            hasher.update(b",");
        }
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

/// Reads and writes [`Snapshot`]s through a [`FileSystem`].
#[derive(Debug, Clone)]
pub struct SnapshotStore<F: FileSystem> {
    fs: F,
    dir: PathBuf,
}

impl<F: FileSystem> SnapshotStore<F> {
    pub fn new(fs: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.json"))
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Capture and write the canvas state. Returns `false` on failure.
    pub fn save(&self, canvas: &WorkflowCanvas) -> bool {
        let snapshot = Snapshot::capture(canvas);
        let path = self.path();
        let json = match serde_json::to_vec_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialize snapshot; skipping save");
                return false;
            }
        };
        match self.fs.write(&path, &json) {
            Ok(()) => {
                info!(path = %path.display(), tasks = snapshot.tasks.len(), "snapshot saved");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not write snapshot; ignoring");
                false
            }
        }
    }

    /// Read the stored snapshot, if there is a readable one.
    pub fn load(&self) -> Option<Snapshot> {
        let path = self.path();
        if !self.fs.exists(&path) {
            debug!(path = %path.display(), "no snapshot stored");
            return None;
        }
        let raw = match self.fs.read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read snapshot; ignoring");
                return None;
            }
        };
        match serde_json::from_str::<Snapshot>(&raw) {
            Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => Some(snapshot),
            Ok(snapshot) => {
                warn!(version = snapshot.version, "unsupported snapshot version; ignoring");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt snapshot; ignoring");
                None
            }
        }
    }

    /// Load and apply a snapshot taken from the same task set.
    pub fn restore(&self, canvas: &mut WorkflowCanvas) -> bool {
        let Some(snapshot) = self.load() else {
            return false;
        };
        if snapshot.fingerprint != fingerprint(canvas) {
            warn!("snapshot was taken from different portfolio data; ignoring");
            return false;
        }
        snapshot.apply(canvas);
        info!(tasks = snapshot.tasks.len(), "snapshot restored");
        true
    }

    /// Delete the stored snapshot; a missing one is not an error.
    pub fn clear(&self) -> bool {
        let path = self.path();
        if !self.fs.exists(&path) {
            return true;
        }
        match self.fs.remove_file(&path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not remove snapshot");
                false
            }
        }
    }
}

