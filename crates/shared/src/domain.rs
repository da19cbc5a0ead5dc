use serde::{Deserialize, Serialize};

/// Allocation policy tag reported by the backend. Opaque metadata, passed
/// through for display and never interpreted client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fit {
    FF,
    BF,
    WF,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionStatus {
    Mounted,
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// One virtual disk as reported by `diskinfo`. Fetched fresh on every
/// disk-selector entry; never cached across views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskDescriptor {
    pub path: String,
    pub capacity: String,
    pub fit: Fit,
    pub mounted: Vec<String>,
}

/// One partition of a disk as reported by `partitioninfo`. Scoped to the
/// disk it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescriptor {
    pub name: String,
    pub id: String,
    pub size: String,
    pub fit: Fit,
    pub status: PartitionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub permissions: String,
}

impl DirectoryEntry {
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}
