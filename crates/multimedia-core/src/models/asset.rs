use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::ValidationError;

/// Asset type enum
///
/// `Video` decodes so historical records stay readable, but new assets of that
/// type are rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Sound,
    Image,
    Pdf,
    Video,
}

impl AssetType {
    /// Types a new asset may be created with.
    pub const ACCEPTED: [AssetType; 3] = [AssetType::Sound, AssetType::Image, AssetType::Pdf];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Sound => "sound",
            AssetType::Image => "image",
            AssetType::Pdf => "pdf",
            AssetType::Video => "video",
        }
    }

    pub fn is_accepted(&self) -> bool {
        Self::ACCEPTED.contains(self)
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sound" => Ok(AssetType::Sound),
            "image" => Ok(AssetType::Image),
            "pdf" => Ok(AssetType::Pdf),
            "video" => Ok(AssetType::Video),
            _ => Err(format!("Unknown asset type: {}", s)),
        }
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptor of a stored media file: where the blob lives and what it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MultimediaAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Uuid>,
    #[schema(example = "https://media.s3-eu-west-1.amazonaws.com")]
    bucket: String,
    #[schema(example = "20240101120000-1234567890.png")]
    filename: String,
    #[serde(rename = "type")]
    asset_type: AssetType,
    #[serde(rename = "createdAt")]
    #[schema(example = "2024-01-01T12:00:00Z")]
    created_at: String,
}

/// Unvalidated input; validated before a `MultimediaAsset` can exist.
#[derive(Debug, Validate)]
struct AssetDraft {
    #[validate(length(min = 1, message = "bucket is required"))]
    #[validate(url(message = "bucket must be an absolute URL"))]
    bucket: String,
    #[validate(length(min = 1, message = "filename is required"))]
    filename: String,
    #[validate(custom(function = "validate_asset_type"))]
    asset_type: String,
}

fn validate_asset_type(value: &str) -> Result<(), validator::ValidationError> {
    match value.parse::<AssetType>() {
        Ok(t) if t.is_accepted() => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("oneof");
            err.message = Some("type must be one of sound, image, pdf".into());
            Err(err)
        }
    }
}

const FIELD_ORDER: [&str; 3] = ["bucket", "filename", "type"];
const FIELD_RENAMES: [(&str, &str); 1] = [("asset_type", "type")];

impl MultimediaAsset {
    /// Validate and construct a new, not yet persisted asset.
    ///
    /// Every failing field is reported, ordered bucket, filename, type.
    pub fn new(
        bucket: impl Into<String>,
        filename: impl Into<String>,
        asset_type: AssetType,
    ) -> Result<Self, ValidationError> {
        let bucket = bucket.into();
        let filename = filename.into();
        check(&bucket, &filename, asset_type.as_str())?;
        Ok(Self::stamped(bucket, filename, asset_type))
    }

    /// Like [`MultimediaAsset::new`] but takes the type as free text, so an
    /// unknown type is reported alongside the other field violations.
    pub fn parse(
        bucket: impl Into<String>,
        filename: impl Into<String>,
        asset_type: &str,
    ) -> Result<Self, ValidationError> {
        let bucket = bucket.into();
        let filename = filename.into();
        check(&bucket, &filename, asset_type)?;
        let asset_type = asset_type.parse::<AssetType>().map_err(|reason| {
            ValidationError::new(vec![crate::validation::FieldViolation {
                field: "type".to_string(),
                reasons: vec![reason],
            }])
        })?;
        Ok(Self::stamped(bucket, filename, asset_type))
    }

    /// Rehydrate an asset from a stored record. No validation is applied, since
    /// stored records were validated when written.
    pub fn from_parts(
        id: Option<Uuid>,
        bucket: String,
        filename: String,
        asset_type: AssetType,
        created_at: String,
    ) -> Self {
        Self {
            id,
            bucket,
            filename,
            asset_type,
            created_at,
        }
    }

    fn stamped(bucket: String, filename: String, asset_type: AssetType) -> Self {
        Self {
            id: None,
            bucket,
            filename,
            asset_type,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Set the identifier. An identifier is assigned at most once; a second
    /// call returns the existing id as the error.
    pub fn assign_id(&mut self, id: Uuid) -> Result<(), Uuid> {
        match self.id {
            Some(existing) => Err(existing),
            None => {
                self.id = Some(id);
                Ok(())
            }
        }
    }
}

fn check(bucket: &str, filename: &str, asset_type: &str) -> Result<(), ValidationError> {
    let draft = AssetDraft {
        bucket: bucket.to_string(),
        filename: filename.to_string(),
        asset_type: asset_type.to_string(),
    };
    draft
        .validate()
        .map_err(|errs| ValidationError::from_validator(&errs, &FIELD_ORDER, &FIELD_RENAMES))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCKET: &str = "https://media.s3-eu-west-1.amazonaws.com";

    #[test]
    fn test_valid_asset_is_stamped_without_id() {
        let asset = MultimediaAsset::new(BUCKET, "photo.png", AssetType::Image).unwrap();
        assert_eq!(asset.id(), None);
        assert_eq!(asset.bucket(), BUCKET);
        assert_eq!(asset.filename(), "photo.png");
        assert_eq!(asset.asset_type(), AssetType::Image);
        assert!(chrono::DateTime::parse_from_rfc3339(asset.created_at()).is_ok());
        assert!(asset.created_at().ends_with('Z'));
    }

    #[test]
    fn test_created_at_not_earlier_than_construction() {
        for _ in 0..200 {
            let before = Utc::now();
            let asset = MultimediaAsset::new(BUCKET, "jingle.mp3", AssetType::Sound).unwrap();
            let created = chrono::DateTime::parse_from_rfc3339(asset.created_at()).unwrap();
            assert!(created >= before, "{} is before {}", created, before);
        }
    }

    #[test]
    fn test_every_accepted_type() {
        for t in AssetType::ACCEPTED {
            assert!(MultimediaAsset::new(BUCKET, "f", t).is_ok());
        }
    }

    #[test]
    fn test_video_is_rejected() {
        let err = MultimediaAsset::new(BUCKET, "clip.mp4", AssetType::Video).unwrap_err();
        assert_eq!(err.fields(), vec!["type"]);
    }

    #[test]
    fn test_relative_bucket_is_rejected() {
        let err = MultimediaAsset::new("not a url", "a.png", AssetType::Image).unwrap_err();
        assert_eq!(err.fields(), vec!["bucket"]);
    }

    #[test]
    fn test_all_violations_reported_in_order() {
        let err = MultimediaAsset::parse("", "", "video").unwrap_err();
        assert_eq!(err.fields(), vec!["bucket", "filename", "type"]);
    }

    #[test]
    fn test_unknown_type_string_rejected() {
        let err = MultimediaAsset::parse(BUCKET, "a.bin", "spreadsheet").unwrap_err();
        assert_eq!(err.fields(), vec!["type"]);
        let asset = MultimediaAsset::parse(BUCKET, "a.pdf", "pdf").unwrap();
        assert_eq!(asset.asset_type(), AssetType::Pdf);
    }

    #[test]
    fn test_id_assigned_once() {
        let mut asset = MultimediaAsset::new(BUCKET, "a.png", AssetType::Image).unwrap();
        let first = Uuid::new_v4();
        asset.assign_id(first).unwrap();
        assert_eq!(asset.assign_id(Uuid::new_v4()), Err(first));
        assert_eq!(asset.id(), Some(first));
    }

    #[test]
    fn test_serialized_field_names() {
        let asset = MultimediaAsset::new(BUCKET, "a.png", AssetType::Image).unwrap();
        let json = serde_json::to_value(&asset).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["type"], "image");
        assert_eq!(json["createdAt"], asset.created_at());

        let decoded: MultimediaAsset = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, asset);
    }
}
