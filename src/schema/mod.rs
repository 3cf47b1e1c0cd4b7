//! Declarative description of every list: fields, constraints and the
//! per-operation access policy. Services consult this registry before
//! touching storage; admins can read it through the meta endpoint.

pub mod document;
pub mod field;

use serde::Serialize;

pub use document::{DocumentError, DocumentFeatures};
pub use field::{DefaultValue, FieldInput, FieldKind, FieldSpec, FieldValue, SelectOption};

use crate::{
    access::{AccessContext, ListKey, Operation, OperationAccess, Policy},
    config::CloudinaryConfig,
    entity::purchases::PurchaseStatus,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSchema {
    pub key: ListKey,
    pub access: OperationAccess,
    pub ui_hidden: bool,
    pub fields: Vec<FieldSpec>,
}

impl ListSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn can(&self, ctx: &AccessContext, operation: Operation) -> bool {
        self.access.allows(ctx, operation)
    }

    /// Fails with a generic denial when the caller may not run `operation`.
    pub fn authorize(&self, ctx: &AccessContext, operation: Operation) -> AppResult<()> {
        if self.can(ctx, operation) {
            return Ok(());
        }
        tracing::debug!(
            list = %self.key,
            operation = %operation,
            user_id = ?ctx.user_id(),
            "access denied"
        );
        Err(AppError::AccessDenied {
            list: self.key,
            operation,
        })
    }

    /// Run every field rule against `input`; the first failure wins.
    pub fn validate(&self, operation: Operation, input: &dyn FieldInput) -> AppResult<()> {
        for field in &self.fields {
            field
                .check(operation, &input.value(field.name))
                .map_err(|reason| AppError::validation(self.key, field.name, reason))?;
        }
        Ok(())
    }

    pub fn image_folder(&self, name: &str) -> AppResult<&str> {
        match self.field(name).map(|f| &f.kind) {
            Some(FieldKind::CloudinaryImage { folder }) => Ok(folder.as_str()),
            _ => Err(AppError::Internal(anyhow::anyhow!(
                "{}.{} is not an image field",
                self.key,
                name
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    user: ListSchema,
    product: ListSchema,
    line_item: ListSchema,
    purchase: ListSchema,
}

impl SchemaRegistry {
    pub fn new(cloudinary: &CloudinaryConfig) -> Self {
        let user = ListSchema {
            key: ListKey::User,
            access: OperationAccess::uniform(Policy::IsAdmin),
            ui_hidden: false,
            fields: vec![
                FieldSpec::text("name").required(),
                FieldSpec::text("email").required().unique(),
                FieldSpec::checkbox("isAdmin"),
                FieldSpec::password("password").required(),
                FieldSpec::timestamp("createdAt").default_value(DefaultValue::Now),
            ],
        };

        let product = ListSchema {
            key: ListKey::Product,
            access: OperationAccess {
                query: Policy::AllowAll,
                ..OperationAccess::uniform(Policy::IsAdmin)
            },
            ui_hidden: false,
            fields: vec![
                FieldSpec::text("name").required(),
                FieldSpec::cloudinary_image("picture", &cloudinary.products_folder),
                FieldSpec::document("description", DocumentFeatures::ALL),
                FieldSpec::integer("stock")
                    .required()
                    .default_value(DefaultValue::Integer(0))
                    .min(0),
                FieldSpec::integer("price").required().min(0),
            ],
        };

        let public_submission = OperationAccess {
            create: Policy::AllowAll,
            ..OperationAccess::uniform(Policy::IsAdmin)
        };

        let line_item = ListSchema {
            key: ListKey::LineItem,
            access: public_submission,
            ui_hidden: true,
            fields: vec![
                FieldSpec::relationship("product", "Product", false).required(),
                FieldSpec::integer("quantity").required().min(0),
                FieldSpec::relationship("purchase", "Purchase.lineItems", false).required(),
            ],
        };

        let status_options = PurchaseStatus::ALL
            .iter()
            .map(|s| SelectOption {
                label: s.label(),
                value: s.as_str(),
            })
            .collect();

        let purchase = ListSchema {
            key: ListKey::Purchase,
            access: public_submission,
            ui_hidden: false,
            fields: vec![
                FieldSpec::text("student").required(),
                FieldSpec::text("phoneNumber").required(),
                FieldSpec::cloudinary_image("receiptImage", &cloudinary.receipts_folder),
                FieldSpec::relationship("lineItems", "LineItem.purchase", true),
                FieldSpec::select("status", status_options)
                    .default_value(DefaultValue::Text(PurchaseStatus::Pending.as_str())),
                FieldSpec::text("notes").default_value(DefaultValue::Text("")),
                FieldSpec::timestamp("createdAt").default_value(DefaultValue::Now),
                FieldSpec::updated_at("updatedAt"),
            ],
        };

        Self {
            user,
            product,
            line_item,
            purchase,
        }
    }

    pub fn list(&self, key: ListKey) -> &ListSchema {
        match key {
            ListKey::User => &self.user,
            ListKey::Product => &self.product,
            ListKey::LineItem => &self.line_item,
            ListKey::Purchase => &self.purchase,
        }
    }

    pub fn lists(&self) -> Vec<&ListSchema> {
        ListKey::ALL.iter().map(|key| self.list(*key)).collect()
    }
}
