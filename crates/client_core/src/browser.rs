//! Transcript interpretation for the structured views.
//!
//! Each call site declares what it expects from the transcript (a JSON array
//! of a known descriptor) instead of guessing via try/fallback. The built-in
//! sample data remains available as an explicit degraded mode for demo and
//! offline use; when it substitutes for a real transcript the underlying
//! interpretation error is always logged.

use serde::de::DeserializeOwned;
use shared::{
    domain::{DirectoryEntry, DiskDescriptor, EntryKind, Fit, PartitionDescriptor, PartitionStatus},
    error::ClientError,
};
use tracing::warn;

/// A listing tagged with its provenance, so "the backend sent structured
/// data" and "sample data was substituted" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<T> {
    Structured(Vec<T>),
    Sample(Vec<T>),
}

impl<T> Listing<T> {
    pub fn entries(self) -> Vec<T> {
        match self {
            Listing::Structured(entries) | Listing::Sample(entries) => entries,
        }
    }

    pub fn is_sample(&self) -> bool {
        matches!(self, Listing::Sample(_))
    }
}

/// Interpret a transcript as a JSON array of `T`.
pub fn interpret_listing<T: DeserializeOwned>(
    command: &str,
    transcript: &str,
) -> Result<Vec<T>, ClientError> {
    serde_json::from_str(transcript).map_err(|err| ClientError::UnexpectedPayload {
        command: command.to_string(),
        detail: err.to_string(),
    })
}

/// Interpret a transcript, substituting the fixed sample data when the
/// degraded mode is enabled. The real error is logged either way.
pub fn interpret_or_sample<T: DeserializeOwned>(
    command: &str,
    transcript: &str,
    sample_fallback: bool,
    sample: fn() -> Vec<T>,
) -> Result<Listing<T>, ClientError> {
    match interpret_listing(command, transcript) {
        Ok(entries) => Ok(Listing::Structured(entries)),
        Err(err) if sample_fallback => {
            warn!(command, error = %err, "transcript not interpretable; substituting sample data");
            Ok(Listing::Sample(sample()))
        }
        Err(err) => Err(err),
    }
}

pub fn sample_disks() -> Vec<DiskDescriptor> {
    vec![
        DiskDescriptor {
            path: "/home/disk1.mia".into(),
            capacity: "20MB".into(),
            fit: Fit::FF,
            mounted: vec!["291A".into(), "292A".into()],
        },
        DiskDescriptor {
            path: "/home/disk2.mia".into(),
            capacity: "15MB".into(),
            fit: Fit::BF,
            mounted: vec!["291B".into(), "292B".into()],
        },
    ]
}

pub fn sample_partitions() -> Vec<PartitionDescriptor> {
    vec![
        PartitionDescriptor {
            name: "Particion1".into(),
            id: "291A".into(),
            size: "5000KB".into(),
            fit: Fit::BF,
            status: PartitionStatus::Mounted,
        },
        PartitionDescriptor {
            name: "ParticionLogica1".into(),
            id: "292A".into(),
            size: "2000KB".into(),
            fit: Fit::WF,
            status: PartitionStatus::Mounted,
        },
    ]
}

pub fn sample_directory() -> Vec<DirectoryEntry> {
    vec![
        DirectoryEntry {
            name: "users.txt".into(),
            kind: EntryKind::File,
            permissions: "rw-r--r--".into(),
        },
        DirectoryEntry {
            name: "docs".into(),
            kind: EntryKind::Folder,
            permissions: "rwx-r-xr-x".into(),
        },
    ]
}
