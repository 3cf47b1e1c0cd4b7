use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    image::ImageInput,
    models::Product,
    schema::{FieldInput, FieldValue},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub picture: Option<ImageInput>,
    #[schema(value_type = Option<Object>)]
    pub description: Option<serde_json::Value>,
    pub stock: Option<i32>,
    pub price: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub picture: Option<ImageInput>,
    #[schema(value_type = Option<Object>)]
    pub description: Option<serde_json::Value>,
    pub stock: Option<i32>,
    pub price: Option<i32>,
}

macro_rules! product_fields {
    ($ty:ty) => {
        impl FieldInput for $ty {
            fn value(&self, field: &str) -> FieldValue<'_> {
                match field {
                    "name" => FieldValue::text(self.name.as_ref()),
                    "picture" => FieldValue::present(self.picture.as_ref()),
                    "description" => FieldValue::document(self.description.as_ref()),
                    "stock" => FieldValue::integer(self.stock),
                    "price" => FieldValue::integer(self.price),
                    _ => FieldValue::Absent,
                }
            }
        }
    };
}

product_fields!(CreateProductRequest);
product_fields!(UpdateProductRequest);

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
