use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::line_items::NestedLineItemInput,
    image::ImageInput,
    models::Purchase,
    schema::{FieldInput, FieldValue},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    pub student: Option<String>,
    pub phone_number: Option<String>,
    pub receipt_image: Option<ImageInput>,
    #[serde(default)]
    pub line_items: Vec<NestedLineItemInput>,
    /// One of `pending`, `confirmed`, `rejected`; defaults to `pending`.
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl FieldInput for CreatePurchaseRequest {
    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "student" => FieldValue::text(self.student.as_ref()),
            "phoneNumber" => FieldValue::text(self.phone_number.as_ref()),
            "receiptImage" => FieldValue::present(self.receipt_image.as_ref()),
            "lineItems" => FieldValue::Present,
            "status" => FieldValue::text(self.status.as_ref()),
            "notes" => FieldValue::text(self.notes.as_ref()),
            _ => FieldValue::Absent,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseRequest {
    pub student: Option<String>,
    pub phone_number: Option<String>,
    pub receipt_image: Option<ImageInput>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl FieldInput for UpdatePurchaseRequest {
    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "student" => FieldValue::text(self.student.as_ref()),
            "phoneNumber" => FieldValue::text(self.phone_number.as_ref()),
            "receiptImage" => FieldValue::present(self.receipt_image.as_ref()),
            "status" => FieldValue::text(self.status.as_ref()),
            "notes" => FieldValue::text(self.notes.as_ref()),
            _ => FieldValue::Absent,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PurchaseList {
    #[schema(value_type = Vec<Purchase>)]
    pub items: Vec<Purchase>,
}
