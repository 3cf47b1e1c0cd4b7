use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::LineItem,
    schema::{FieldInput, FieldValue},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineItemRequest {
    pub product_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub purchase_id: Option<Uuid>,
}

impl FieldInput for CreateLineItemRequest {
    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "product" => FieldValue::present(self.product_id.as_ref()),
            "quantity" => FieldValue::integer(self.quantity),
            "purchase" => FieldValue::present(self.purchase_id.as_ref()),
            _ => FieldValue::Absent,
        }
    }
}

/// A line item created together with its purchase.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NestedLineItemInput {
    pub product_id: Option<Uuid>,
    pub quantity: Option<i32>,
}

impl FieldInput for NestedLineItemInput {
    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "product" => FieldValue::present(self.product_id.as_ref()),
            "quantity" => FieldValue::integer(self.quantity),
            // Supplied by the enclosing purchase.
            "purchase" => FieldValue::Present,
            _ => FieldValue::Absent,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineItemRequest {
    pub product_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub purchase_id: Option<Uuid>,
}

impl FieldInput for UpdateLineItemRequest {
    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "product" => FieldValue::present(self.product_id.as_ref()),
            "quantity" => FieldValue::integer(self.quantity),
            "purchase" => FieldValue::present(self.purchase_id.as_ref()),
            _ => FieldValue::Absent,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct LineItemList {
    #[schema(value_type = Vec<LineItem>)]
    pub items: Vec<LineItem>,
}
