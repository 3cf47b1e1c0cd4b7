use presales_api::{
    access::AccessContext,
    dto::{
        line_items::{CreateLineItemRequest, NestedLineItemInput},
        purchases::{CreatePurchaseRequest, UpdatePurchaseRequest},
    },
    entity::{LineItems, Purchases},
    error::AppError,
    image::ImageInput,
    models::PurchaseStatus,
    routes::params::PurchaseListQuery,
    services::{line_item_service, product_service, purchase_service},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

mod common;

fn purchase_for(student: &str, line_items: Vec<NestedLineItemInput>) -> CreatePurchaseRequest {
    CreatePurchaseRequest {
        student: Some(student.into()),
        phone_number: Some("555-0100".into()),
        line_items,
        ..Default::default()
    }
}

fn item(product_id: Uuid, quantity: i32) -> NestedLineItemInput {
    NestedLineItemInput {
        product_id: Some(product_id),
        quantity: Some(quantity),
    }
}

// Storefront submission: anonymous create, admin-only review.
#[tokio::test]
async fn anonymous_submission_is_reviewed_by_admin() -> anyhow::Result<()> {
    let state = common::setup_state().await;
    let product = common::insert_product(&state, "Prep Book", 150).await;
    let anonymous = AccessContext::anonymous();

    let created = purchase_service::create_purchase(
        &state,
        &anonymous,
        purchase_for("Alice", vec![item(product.id, 2)]),
    )
    .await?;
    assert_eq!(created.message, "Purchase created");
    assert!(created.data.is_none(), "anonymous caller cannot read back");

    let err = purchase_service::list_purchases(&state, &anonymous, PurchaseListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied { .. }));

    let customer = common::customer_context(&state).await;
    let err = purchase_service::list_purchases(&state, &customer, PurchaseListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied { .. }));

    let admin = common::admin_context(&state).await;
    let listed = purchase_service::list_purchases(&state, &admin, PurchaseListQuery::default())
        .await?
        .data
        .expect("purchases");
    assert_eq!(listed.items.len(), 1);
    let purchase = &listed.items[0];
    assert_eq!(purchase.student, "Alice");
    assert_eq!(purchase.phone_number, "555-0100");
    assert_eq!(purchase.status, PurchaseStatus::Pending);
    assert_eq!(purchase.notes, "");
    assert_eq!(purchase.line_items.len(), 1);
    assert_eq!(purchase.line_items[0].product_id, product.id);
    assert_eq!(purchase.line_items[0].quantity, 2);

    let confirmed = purchase_service::update_purchase(
        &state,
        &admin,
        purchase.id,
        UpdatePurchaseRequest {
            status: Some("confirmed".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("admin reads the update");
    assert_eq!(confirmed.status, PurchaseStatus::Confirmed);
    assert!(confirmed.updated_at >= purchase.updated_at);
    assert_eq!(confirmed.line_items.len(), 1);

    let filtered = purchase_service::list_purchases(
        &state,
        &admin,
        PurchaseListQuery {
            status: Some("pending".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("purchases");
    assert!(filtered.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn purchase_without_line_items_is_accepted() -> anyhow::Result<()> {
    let state = common::setup_state().await;
    let admin = common::admin_context(&state).await;

    let created = purchase_service::create_purchase(&state, &admin, purchase_for("Bob", vec![]))
        .await?
        .data
        .expect("admin reads back");
    assert!(created.line_items.is_empty());
    assert_eq!(created.status, PurchaseStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn unknown_product_rolls_back_the_whole_purchase() -> anyhow::Result<()> {
    let state = common::setup_state().await;
    let product = common::insert_product(&state, "Formula Sheet", 20).await;

    let err = purchase_service::create_purchase(
        &state,
        &AccessContext::anonymous(),
        purchase_for("Carol", vec![item(product.id, 1), item(Uuid::new_v4(), 1)]),
    )
    .await
    .unwrap_err();
    assert!(
        matches!(err, AppError::Validation { field: "product", .. }),
        "got {err:?}"
    );

    assert_eq!(Purchases::find().count(&state.orm).await?, 0);
    assert_eq!(LineItems::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn standalone_line_item_needs_an_existing_product() {
    let state = common::setup_state().await;
    let admin = common::admin_context(&state).await;

    let err = line_item_service::create_line_item(
        &state,
        &admin,
        CreateLineItemRequest {
            product_id: Some(Uuid::new_v4()),
            quantity: Some(1),
            purchase_id: Some(Uuid::new_v4()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "product", .. }));
}

#[tokio::test]
async fn admin_is_told_when_a_purchase_is_missing() {
    let state = common::setup_state().await;
    let admin = common::admin_context(&state).await;
    let product = common::insert_product(&state, "Mock Exam Pack", 90).await;

    let err = line_item_service::create_line_item(
        &state,
        &admin,
        CreateLineItemRequest {
            product_id: Some(product.id),
            quantity: Some(1),
            purchase_id: Some(Uuid::new_v4()),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "LineItem.purchase: references a Purchase that does not exist"
    );
}

#[tokio::test]
async fn anonymous_callers_cannot_tell_missing_from_closed_purchases() -> anyhow::Result<()> {
    let state = common::setup_state().await;
    let anonymous = AccessContext::anonymous();
    let admin = common::admin_context(&state).await;
    let product = common::insert_product(&state, "Mock Exam Pack", 90).await;

    let confirmed = purchase_service::create_purchase(&state, &admin, purchase_for("Dan", vec![]))
        .await?
        .data
        .expect("purchase");
    purchase_service::update_purchase(
        &state,
        &admin,
        confirmed.id,
        UpdatePurchaseRequest {
            status: Some("confirmed".into()),
            ..Default::default()
        },
    )
    .await?;

    let attach = |purchase_id| CreateLineItemRequest {
        product_id: Some(product.id),
        quantity: Some(3),
        purchase_id: Some(purchase_id),
    };

    let missing = line_item_service::create_line_item(&state, &anonymous, attach(Uuid::new_v4()))
        .await
        .unwrap_err();
    let closed = line_item_service::create_line_item(&state, &anonymous, attach(confirmed.id))
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::Validation { field: "purchase", .. }));
    assert_eq!(missing.to_string(), closed.to_string());

    let reloaded = purchase_service::get_purchase(&state, &admin, confirmed.id)
        .await?
        .data
        .expect("purchase");
    assert!(reloaded.line_items.is_empty());
    assert_eq!(reloaded.status, PurchaseStatus::Confirmed);
    Ok(())
}

#[tokio::test]
async fn anonymous_callers_can_add_to_a_pending_purchase() -> anyhow::Result<()> {
    let state = common::setup_state().await;
    let anonymous = AccessContext::anonymous();
    let admin = common::admin_context(&state).await;
    let product = common::insert_product(&state, "Mock Exam Pack", 90).await;

    let pending = purchase_service::create_purchase(&state, &admin, purchase_for("Eli", vec![]))
        .await?
        .data
        .expect("purchase");
    let added = line_item_service::create_line_item(
        &state,
        &anonymous,
        CreateLineItemRequest {
            product_id: Some(product.id),
            quantity: Some(3),
            purchase_id: Some(pending.id),
        },
    )
    .await?;
    assert!(added.data.is_none());

    let reloaded = purchase_service::get_purchase(&state, &admin, pending.id)
        .await?
        .data
        .expect("purchase");
    assert_eq!(reloaded.line_items.len(), 1);
    assert_eq!(reloaded.line_items[0].quantity, 3);
    Ok(())
}

#[tokio::test]
async fn invalid_status_and_negative_quantity_are_rejected() {
    let state = common::setup_state().await;
    let product = common::insert_product(&state, "Prep Book", 150).await;
    let anonymous = AccessContext::anonymous();

    let err = purchase_service::create_purchase(
        &state,
        &anonymous,
        CreatePurchaseRequest {
            status: Some("shipped".into()),
            ..purchase_for("Eve", vec![])
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "status", .. }));

    let err = purchase_service::create_purchase(
        &state,
        &anonymous,
        purchase_for("Eve", vec![item(product.id, -1)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "quantity", .. }));

    let err = purchase_service::create_purchase(
        &state,
        &anonymous,
        CreatePurchaseRequest {
            phone_number: None,
            ..purchase_for("Eve", vec![])
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "phoneNumber", .. }));
}

#[tokio::test]
async fn receipt_image_lands_in_the_receipts_folder() -> anyhow::Result<()> {
    let state = common::setup_state().await;
    let admin = common::admin_context(&state).await;

    let created = purchase_service::create_purchase(
        &state,
        &admin,
        CreatePurchaseRequest {
            receipt_image: Some(ImageInput {
                id: "receipt-123".into(),
                filename: Some("receipt.jpg".into()),
                mimetype: Some("image/jpeg".into()),
            }),
            ..purchase_for("Fay", vec![])
        },
    )
    .await?
    .data
    .expect("purchase");
    let image = created.receipt_image.expect("receipt image");
    assert_eq!(image.folder, "receipts");
    assert!(image.public_url.ends_with("/receipts/receipt-123"));
    Ok(())
}

#[tokio::test]
async fn deleting_a_purchase_removes_its_line_items() -> anyhow::Result<()> {
    let state = common::setup_state().await;
    let admin = common::admin_context(&state).await;
    let product = common::insert_product(&state, "Prep Book", 150).await;

    let purchase = purchase_service::create_purchase(
        &state,
        &admin,
        purchase_for("Gus", vec![item(product.id, 1), item(product.id, 4)]),
    )
    .await?
    .data
    .expect("purchase");

    let err = product_service::delete_product(&state, &admin, product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    purchase_service::delete_purchase(&state, &admin, purchase.id).await?;
    assert_eq!(LineItems::find().count(&state.orm).await?, 0);

    let err = purchase_service::get_purchase(&state, &admin, purchase.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    product_service::delete_product(&state, &admin, product.id).await?;
    Ok(())
}
