use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Object store backend types
///
/// Defined in core because it's used by configuration and the storage factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Metadata store backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataBackend {
    DynamoDb,
    Postgres,
}

impl FromStr for MetadataBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(MetadataBackend::DynamoDb),
            "postgres" | "postgresql" => Ok(MetadataBackend::Postgres),
            _ => Err(anyhow::anyhow!("Invalid metadata backend: {}", s)),
        }
    }
}

impl Display for MetadataBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetadataBackend::DynamoDb => write!(f, "dynamodb"),
            MetadataBackend::Postgres => write!(f, "postgres"),
        }
    }
}

pub const DEFAULT_OBJECT_VISIBILITY: &str = "public-read";
pub const DEFAULT_OBJECT_DISPOSITION: &str = "attachment";
pub const DEFAULT_OBJECT_ENCRYPTION: &str = "AES256";

/// Access and encoding flags applied to every object write.
///
/// Values are passed through to the object store verbatim; an empty string
/// means "do not send this flag".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPolicy {
    pub visibility: String,
    pub disposition: String,
    pub encryption: String,
}

impl Default for ObjectPolicy {
    fn default() -> Self {
        Self {
            visibility: DEFAULT_OBJECT_VISIBILITY.to_string(),
            disposition: DEFAULT_OBJECT_DISPOSITION.to_string(),
            encryption: DEFAULT_OBJECT_ENCRYPTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backends_parse_case_insensitively() {
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "DynamoDB".parse::<MetadataBackend>().unwrap(),
            MetadataBackend::DynamoDb
        );
        assert_eq!(
            "postgresql".parse::<MetadataBackend>().unwrap(),
            MetadataBackend::Postgres
        );
        assert!("nfs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn default_policy_matches_historical_flags() {
        let policy = ObjectPolicy::default();
        assert_eq!(policy.visibility, "public-read");
        assert_eq!(policy.disposition, "attachment");
        assert_eq!(policy.encryption, "AES256");
    }
}
