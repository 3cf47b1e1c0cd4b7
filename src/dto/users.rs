use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::User,
    schema::{FieldInput, FieldValue},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
    pub password: Option<String>,
}

fn user_field<'a>(
    field: &str,
    name: Option<&'a String>,
    email: Option<&'a String>,
    is_admin: Option<&'a bool>,
    password: Option<&'a String>,
) -> FieldValue<'a> {
    match field {
        "name" => FieldValue::text(name),
        "email" => FieldValue::text(email),
        "isAdmin" => FieldValue::present(is_admin),
        "password" => FieldValue::text(password),
        _ => FieldValue::Absent,
    }
}

impl FieldInput for CreateUserRequest {
    fn value(&self, field: &str) -> FieldValue<'_> {
        user_field(
            field,
            self.name.as_ref(),
            self.email.as_ref(),
            self.is_admin.as_ref(),
            self.password.as_ref(),
        )
    }
}

impl FieldInput for UpdateUserRequest {
    fn value(&self, field: &str) -> FieldValue<'_> {
        user_field(
            field,
            self.name.as_ref(),
            self.email.as_ref(),
            self.is_admin.as_ref(),
            self.password.as_ref(),
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}
