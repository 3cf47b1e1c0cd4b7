//! References to images hosted on Cloudinary.
//!
//! Uploading is done by the client against Cloudinary directly; the API only
//! records which asset belongs to a product or purchase.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    access::ListKey,
    config::CloudinaryConfig,
    error::{AppError, AppResult},
};

/// Image reference as supplied by a client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    /// Cloudinary public id, without the folder prefix.
    pub id: String,
    pub filename: Option<String>,
    pub mimetype: Option<String>,
}

/// Image reference as stored and returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloudinaryImage {
    pub id: String,
    pub filename: Option<String>,
    pub mimetype: Option<String>,
    pub folder: String,
    pub public_url: String,
}

impl CloudinaryImage {
    pub fn from_input(
        input: ImageInput,
        cloudinary: &CloudinaryConfig,
        folder: &str,
        list: ListKey,
        field: &'static str,
    ) -> AppResult<Self> {
        let id = input.id.trim().trim_matches('/').to_string();
        if id.is_empty() {
            return Err(AppError::validation(list, field, "image id must not be empty"));
        }
        if id.contains(char::is_whitespace) {
            return Err(AppError::validation(list, field, "image id must not contain whitespace"));
        }
        let public_url = format!(
            "https://res.cloudinary.com/{}/image/upload/{}/{}",
            cloudinary.cloud_name, folder, id
        );
        Ok(Self {
            id,
            filename: input.filename,
            mimetype: input.mimetype,
            folder: folder.to_string(),
            public_url,
        })
    }

    pub fn to_json(&self) -> AppResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| AppError::Internal(e.into()))
    }

    /// Decode a stored reference. Rows written by other tools may not match
    /// the expected shape; those are dropped rather than failing the read.
    pub fn from_json(value: Option<serde_json::Value>) -> Option<Self> {
        let value = value?;
        match serde_json::from_value(value) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::warn!(error = %err, "unreadable image reference");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloudinary() -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "presales".into(),
            api_key: "api_key".into(),
            api_secret: "api_secret".into(),
            products_folder: "products".into(),
            receipts_folder: "receipts".into(),
        }
    }

    #[test]
    fn builds_public_url_inside_folder() {
        let image = CloudinaryImage::from_input(
            ImageInput {
                id: "/hoodie-front/".into(),
                filename: Some("hoodie.jpg".into()),
                mimetype: Some("image/jpeg".into()),
            },
            &cloudinary(),
            "products",
            ListKey::Product,
            "picture",
        )
        .unwrap();

        assert_eq!(image.id, "hoodie-front");
        assert_eq!(
            image.public_url,
            "https://res.cloudinary.com/presales/image/upload/products/hoodie-front"
        );
    }

    #[test]
    fn empty_id_is_a_validation_error() {
        let err = CloudinaryImage::from_input(
            ImageInput {
                id: "  ".into(),
                filename: None,
                mimetype: None,
            },
            &cloudinary(),
            "receipts",
            ListKey::Purchase,
            "receiptImage",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "receiptImage", .. }));
    }
}
