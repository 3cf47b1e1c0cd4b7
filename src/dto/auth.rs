use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    access::Session,
    schema::{FieldInput, FieldValue},
};

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub session: Session,
}

/// Creates the very first user; only accepted while no users exist.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct InitFirstUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FieldInput for InitFirstUserRequest {
    fn value(&self, field: &str) -> FieldValue<'_> {
        match field {
            "name" => FieldValue::text(self.name.as_ref()),
            "email" => FieldValue::text(self.email.as_ref()),
            "password" => FieldValue::text(self.password.as_ref()),
            _ => FieldValue::Absent,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub is_admin: bool,
    pub exp: usize,
}
