use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    access::{Session, SessionData},
    dto::{
        auth::{InitFirstUserRequest, LoginRequest, LoginResponse},
        line_items::{
            CreateLineItemRequest, LineItemList, NestedLineItemInput, UpdateLineItemRequest,
        },
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
        purchases::{CreatePurchaseRequest, PurchaseList, UpdatePurchaseRequest},
        users::{CreateUserRequest, UpdateUserRequest, UserList},
    },
    image::{CloudinaryImage, ImageInput},
    models::{LineItem, Product, Purchase, PurchaseStatus, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, line_items, params, products, purchases, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::init,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        line_items::list_line_items,
        line_items::get_line_item,
        line_items::create_line_item,
        line_items::update_line_item,
        line_items::delete_line_item,
        purchases::list_purchases,
        purchases::get_purchase,
        purchases::create_purchase,
        purchases::update_purchase,
        purchases::delete_purchase,
        admin::list_meta
    ),
    components(
        schemas(
            User,
            Product,
            LineItem,
            Purchase,
            PurchaseStatus,
            CloudinaryImage,
            ImageInput,
            Session,
            SessionData,
            LoginRequest,
            LoginResponse,
            InitFirstUserRequest,
            CreateUserRequest,
            UpdateUserRequest,
            UserList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateLineItemRequest,
            NestedLineItemInput,
            UpdateLineItemRequest,
            LineItemList,
            CreatePurchaseRequest,
            UpdatePurchaseRequest,
            PurchaseList,
            params::SortOrder,
            params::ProductSortBy,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Purchase>,
            ApiResponse<PurchaseList>,
            ApiResponse<LoginResponse>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Sign-in and first-user bootstrap"),
        (name = "Users", description = "User list (admin only)"),
        (name = "Products", description = "Product catalogue, publicly readable"),
        (name = "Line items", description = "Purchase line items"),
        (name = "Purchases", description = "Purchase submissions and review"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_list_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/users",
            "/api/products/{id}",
            "/api/line-items",
            "/api/purchases/{id}",
            "/api/admin/meta",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
