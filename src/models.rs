use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{
        line_items::Model as LineItemModel, products::Model as ProductModel,
        purchases::Model as PurchaseModel, users::Model as UserModel,
    },
    image::CloudinaryImage,
};

pub use crate::entity::purchases::PurchaseStatus;

/// A user as returned by the API. The password hash never leaves storage.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub password_is_set: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            is_admin: model.is_admin,
            password_is_set: !model.password_hash.is_empty(),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub picture: Option<CloudinaryImage>,
    #[schema(value_type = Option<Object>)]
    pub description: Option<serde_json::Value>,
    pub stock: i32,
    pub price: i32,
}

impl From<ProductModel> for Product {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            picture: CloudinaryImage::from_json(model.picture),
            description: model.description,
            stock: model.stock,
            price: model.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub purchase_id: Uuid,
}

impl From<LineItemModel> for LineItem {
    fn from(model: LineItemModel) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            purchase_id: model.purchase_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub student: String,
    pub phone_number: String,
    pub receipt_image: Option<CloudinaryImage>,
    pub line_items: Vec<LineItem>,
    pub status: PurchaseStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    pub fn from_parts(model: PurchaseModel, line_items: Vec<LineItemModel>) -> Self {
        Self {
            id: model.id,
            student: model.student,
            phone_number: model.phone_number,
            receipt_image: CloudinaryImage::from_json(model.receipt_image),
            line_items: line_items.into_iter().map(LineItem::from).collect(),
            status: model.status,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
