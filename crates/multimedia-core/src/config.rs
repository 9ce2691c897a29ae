//! Configuration module
//!
//! This module provides the service configuration loaded from the environment
//! (and `.env`), plus `UploaderConfig`, the explicit input of the uploader factory.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::AppError;
use crate::storage_types::{MetadataBackend, ObjectPolicy, StorageBackend};
use crate::storage_types::{
    DEFAULT_OBJECT_DISPOSITION, DEFAULT_OBJECT_ENCRYPTION, DEFAULT_OBJECT_VISIBILITY,
};

const DEFAULT_PORT: u16 = 4000;
const MAX_UPLOAD_MB: usize = 5;
const DEFAULT_PAGE_OPTIONS_TABLE: &str = "page_options";

/// How the uploader decides the asset type of an incoming file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    /// Every upload is an image.
    #[default]
    Fixed,
    /// Derive the type from the file's leading bytes.
    Sniff,
}

impl FromStr for ClassifierKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(ClassifierKind::Fixed),
            "sniff" => Ok(ClassifierKind::Sniff),
            _ => Err(anyhow::anyhow!("Invalid asset classifier: {}", s)),
        }
    }
}

impl Display for ClassifierKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ClassifierKind::Fixed => write!(f, "fixed"),
            ClassifierKind::Sniff => write!(f, "sniff"),
        }
    }
}

/// Settings the uploader factory needs to wire its collaborators.
#[derive(Debug, Clone, Default)]
pub struct UploaderConfig {
    pub table_name: String,
    pub bucket: String,
    pub region: String,
    pub s3_endpoint: Option<String>,
    pub dynamodb_endpoint: Option<String>,
    pub policy: ObjectPolicy,
    pub classifier: ClassifierKind,
}

impl UploaderConfig {
    pub fn new(
        table_name: impl Into<String>,
        bucket: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            bucket: bucket.into(),
            region: region.into(),
            ..Default::default()
        }
    }

    /// Rejects empty table, bucket or region before any remote session is built.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.table_name.trim().is_empty()
            || self.bucket.trim().is_empty()
            || self.region.trim().is_empty()
        {
            return Err(AppError::InvalidArgument(
                "table name, bucket and region must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Asset service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub table_name: String,
    pub page_options_table: String,
    pub s3_bucket: String,
    pub region: String,
    pub s3_endpoint: Option<String>,
    pub dynamodb_endpoint: Option<String>,
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub metadata_backend: MetadataBackend,
    pub database_url: Option<String>,
    pub object_policy: ObjectPolicy,
    pub classifier: ClassifierKind,
    pub max_upload_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn as_service(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_service().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_service().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_service().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_service().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_service().base.environment
    }

    pub fn table_name(&self) -> &str {
        &self.as_service().table_name
    }

    pub fn page_options_table(&self) -> &str {
        &self.as_service().page_options_table
    }

    pub fn s3_bucket(&self) -> &str {
        &self.as_service().s3_bucket
    }

    pub fn region(&self) -> &str {
        &self.as_service().region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_service().s3_endpoint.as_deref()
    }

    pub fn dynamodb_endpoint(&self) -> Option<&str> {
        self.as_service().dynamodb_endpoint.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_service().storage_backend
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_service().local_storage_path.as_deref()
    }

    pub fn metadata_backend(&self) -> MetadataBackend {
        self.as_service().metadata_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_service().database_url.as_deref()
    }

    pub fn object_policy(&self) -> &ObjectPolicy {
        &self.as_service().object_policy
    }

    pub fn classifier(&self) -> ClassifierKind {
        self.as_service().classifier
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.as_service().max_upload_bytes
    }

    pub fn uploader_config(&self) -> UploaderConfig {
        let svc = self.as_service();
        UploaderConfig {
            table_name: svc.table_name.clone(),
            bucket: svc.s3_bucket.clone(),
            region: svc.region.clone(),
            s3_endpoint: svc.s3_endpoint.clone(),
            dynamodb_endpoint: svc.dynamodb_endpoint.clone(),
            policy: svc.object_policy.clone(),
            classifier: svc.classifier,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build from an arbitrary variable source. Does not validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: match var("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => DEFAULT_PORT,
            },
            cors_origins,
            environment,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::S3,
        };

        let metadata_backend = match var("METADATA_BACKEND") {
            Some(s) => s.parse()?,
            None => MetadataBackend::DynamoDb,
        };

        let classifier = match var("ASSET_CLASSIFIER") {
            Some(s) => s.parse()?,
            None => ClassifierKind::Fixed,
        };

        let max_upload_mb = var("MAX_UPLOAD_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_MB);
        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_MB is too large: {}", max_upload_mb))?;

        // Explicitly set-but-empty policy flags disable the flag.
        let policy_flag = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(ServiceConfig {
            base,
            table_name: var("TABLE_NAME").unwrap_or_default(),
            page_options_table: var("PAGE_OPTIONS_TABLE")
                .unwrap_or_else(|| DEFAULT_PAGE_OPTIONS_TABLE.to_string()),
            s3_bucket: var("S3_BUCKET").unwrap_or_default(),
            region: var("AWS_REGION")
                .or_else(|| var("S3_REGION"))
                .unwrap_or_default(),
            s3_endpoint: var("S3_ENDPOINT"),
            dynamodb_endpoint: var("DYNAMODB_ENDPOINT"),
            storage_backend,
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            metadata_backend,
            database_url: var("DATABASE_URL"),
            object_policy: ObjectPolicy {
                visibility: policy_flag("OBJECT_VISIBILITY", DEFAULT_OBJECT_VISIBILITY),
                disposition: policy_flag("OBJECT_DISPOSITION", DEFAULT_OBJECT_DISPOSITION),
                encryption: policy_flag("OBJECT_ENCRYPTION", DEFAULT_OBJECT_ENCRYPTION),
            },
            classifier,
            max_upload_bytes,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.table_name.is_empty() {
            return Err(anyhow::anyhow!("TABLE_NAME must be set"));
        }

        if self.s3_bucket.is_empty() {
            return Err(anyhow::anyhow!("S3_BUCKET must be set"));
        }

        if self.region.is_empty() {
            return Err(anyhow::anyhow!("AWS_REGION or S3_REGION must be set"));
        }

        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when using local storage backend"
            ));
        }

        if self.metadata_backend == MetadataBackend::Postgres {
            match self.database_url.as_deref() {
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when using postgres metadata backend"
                    ))
                }
                Some(url)
                    if !url.starts_with("postgres://") && !url.starts_with("postgresql://") =>
                {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                Some(_) => {}
            }
        }

        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_MB must be greater than zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("TABLE_NAME", "assets"),
            ("S3_BUCKET", "media"),
            ("AWS_REGION", "eu-west-1"),
        ]))
        .unwrap();
        cfg.validate().unwrap();

        assert_eq!(cfg.base.server_port, 4000);
        assert_eq!(cfg.base.environment, "development");
        assert_eq!(cfg.page_options_table, "page_options");
        assert_eq!(cfg.storage_backend, StorageBackend::S3);
        assert_eq!(cfg.metadata_backend, MetadataBackend::DynamoDb);
        assert_eq!(cfg.classifier, ClassifierKind::Fixed);
        assert_eq!(cfg.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(cfg.object_policy, ObjectPolicy::default());
    }

    #[test]
    fn test_oversized_upload_limit_rejected() {
        let huge = usize::MAX.to_string();
        let err = ServiceConfig::from_lookup(lookup(&[("MAX_UPLOAD_MB", huge.as_str())]))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_MB"));
    }

    #[test]
    fn test_s3_region_fallback() {
        let cfg = ServiceConfig::from_lookup(lookup(&[("S3_REGION", "us-east-1")])).unwrap();
        assert_eq!(cfg.region, "us-east-1");
    }

    #[test]
    fn test_missing_required_values_rejected() {
        let cfg = ServiceConfig::from_lookup(lookup(&[("S3_BUCKET", "media")])).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("TABLE_NAME"));
    }

    #[test]
    fn test_empty_policy_flag_disables_it() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("OBJECT_VISIBILITY", ""),
            ("OBJECT_ENCRYPTION", "aws:kms"),
        ]))
        .unwrap();
        assert_eq!(cfg.object_policy.visibility, "");
        assert_eq!(cfg.object_policy.disposition, "attachment");
        assert_eq!(cfg.object_policy.encryption, "aws:kms");
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("TABLE_NAME", "assets"),
            ("S3_BUCKET", "media"),
            ("AWS_REGION", "eu-west-1"),
            ("METADATA_BACKEND", "postgres"),
        ]))
        .unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let result = ServiceConfig::from_lookup(lookup(&[("ENVIRONMENT", "production")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_uploader_config_rejects_empty_values() {
        for (table, bucket, region) in [
            ("", "media", "eu-west-1"),
            ("assets", "", "eu-west-1"),
            ("assets", "media", ""),
        ] {
            let err = UploaderConfig::new(table, bucket, region)
                .validate()
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)));
        }
        assert!(UploaderConfig::new("assets", "media", "eu-west-1")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_uploader_config_from_service_config() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("TABLE_NAME", "assets"),
            ("S3_BUCKET", "media"),
            ("AWS_REGION", "eu-west-1"),
            ("ASSET_CLASSIFIER", "sniff"),
        ]))
        .unwrap();
        let uploader = Config(Box::new(cfg)).uploader_config();
        assert_eq!(uploader.table_name, "assets");
        assert_eq!(uploader.bucket, "media");
        assert_eq!(uploader.region, "eu-west-1");
        assert_eq!(uploader.classifier, ClassifierKind::Sniff);
    }
}
