use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage provider types
///
/// Tag selecting which backend the process talks to. Chosen once from
/// configuration and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// S3-compatible object store (remote, signed URLs, canned ACLs)
    S3,
    /// Local filesystem (direct file I/O, static URLs)
    Local,
}

impl FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" | "object-store" => Ok(StorageProvider::S3),
            "local" | "filesystem" => Ok(StorageProvider::Local),
            _ => Err(anyhow::anyhow!("Invalid storage provider: {}", s)),
        }
    }
}

impl Display for StorageProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageProvider::S3 => write!(f, "s3"),
            StorageProvider::Local => write!(f, "local"),
        }
    }
}
