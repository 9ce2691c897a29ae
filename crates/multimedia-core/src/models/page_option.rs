use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::asset::MultimediaAsset;

/// Named site configuration entry, optionally pointing at a wallpaper asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct PageOption {
    /// Option identifier; primary key of the page options table
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub terms: String,
    #[serde(default)]
    pub wallpaper: Option<MultimediaAsset>,
}

/// Request body for storing a page option; the name comes from the path.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PageOptionBody {
    #[serde(default)]
    pub terms: String,
    #[serde(default)]
    pub wallpaper: Option<MultimediaAsset>,
}

impl PageOptionBody {
    pub fn into_option(self, name: impl Into<String>) -> PageOption {
        PageOption {
            name: name.into(),
            terms: self.terms,
            wallpaper: self.wallpaper,
        }
    }
}
