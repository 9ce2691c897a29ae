//! Conversion between assets and stored records.

use crate::error::PersistError;
use crate::store::Record;
use multimedia_core::{AssetType, MultimediaAsset};
use uuid::Uuid;

pub const ID: &str = "id";
pub const BUCKET: &str = "bucket";
pub const FILENAME: &str = "filename";
pub const TYPE: &str = "type";
pub const CREATED_AT: &str = "createdAt";

/// Snapshot every asset field into a record. The id attribute is written only
/// when the asset has one.
pub fn asset_to_record(asset: &MultimediaAsset) -> Record {
    let mut record = Record::new();
    if let Some(id) = asset.id() {
        record.insert(ID.to_string(), id.to_string());
    }
    record.insert(BUCKET.to_string(), asset.bucket().to_string());
    record.insert(FILENAME.to_string(), asset.filename().to_string());
    record.insert(TYPE.to_string(), asset.asset_type().to_string());
    record.insert(CREATED_AT.to_string(), asset.created_at().to_string());
    record
}

pub fn record_to_asset(record: &Record) -> Result<MultimediaAsset, PersistError> {
    let field = |name: &str| {
        record
            .get(name)
            .cloned()
            .ok_or_else(|| PersistError::Decode(format!("missing attribute '{}'", name)))
    };

    let id = field(ID)?
        .parse::<Uuid>()
        .map_err(|e| PersistError::Decode(format!("invalid id: {}", e)))?;
    let asset_type = field(TYPE)?
        .parse::<AssetType>()
        .map_err(PersistError::Decode)?;

    Ok(MultimediaAsset::from_parts(
        Some(id),
        field(BUCKET)?,
        field(FILENAME)?,
        asset_type,
        field(CREATED_AT)?,
    ))
}
