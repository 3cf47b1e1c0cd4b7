use presales_api::{
    access::{AccessContext, ListKey, Operation},
    config::AppConfig,
    schema::SchemaRegistry,
};
use uuid::Uuid;

mod common;

fn registry() -> SchemaRegistry {
    let config: AppConfig = common::test_config();
    SchemaRegistry::new(&config.cloudinary)
}

/// (list, operation, anonymous, signed-in non-admin, admin)
const TABLE: [(ListKey, Operation, bool, bool, bool); 16] = [
    (ListKey::User, Operation::Query, false, false, true),
    (ListKey::User, Operation::Create, false, false, true),
    (ListKey::User, Operation::Update, false, false, true),
    (ListKey::User, Operation::Delete, false, false, true),
    (ListKey::Product, Operation::Query, true, true, true),
    (ListKey::Product, Operation::Create, false, false, true),
    (ListKey::Product, Operation::Update, false, false, true),
    (ListKey::Product, Operation::Delete, false, false, true),
    (ListKey::LineItem, Operation::Query, false, false, true),
    (ListKey::LineItem, Operation::Create, true, true, true),
    (ListKey::LineItem, Operation::Update, false, false, true),
    (ListKey::LineItem, Operation::Delete, false, false, true),
    (ListKey::Purchase, Operation::Query, false, false, true),
    (ListKey::Purchase, Operation::Create, true, true, true),
    (ListKey::Purchase, Operation::Update, false, false, true),
    (ListKey::Purchase, Operation::Delete, false, false, true),
];

#[test]
fn every_list_operation_follows_the_policy_table() {
    let registry = registry();
    let anonymous = AccessContext::anonymous();
    let customer = AccessContext::with_session(Uuid::new_v4(), false);
    let admin = AccessContext::with_session(Uuid::new_v4(), true);

    for (list, operation, anon_ok, customer_ok, admin_ok) in TABLE {
        let schema = registry.list(list);
        assert_eq!(schema.can(&anonymous, operation), anon_ok, "anonymous {operation} {list}");
        assert_eq!(schema.can(&customer, operation), customer_ok, "customer {operation} {list}");
        assert_eq!(schema.can(&admin, operation), admin_ok, "admin {operation} {list}");
    }
}

#[test]
fn denial_message_names_only_list_and_operation() {
    let registry = registry();
    let err = registry
        .list(ListKey::Purchase)
        .authorize(&AccessContext::anonymous(), Operation::Delete)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Access denied: you cannot perform the 'delete' operation on the list 'Purchase'"
    );
}

#[test]
fn line_items_are_hidden_from_the_admin_navigation() {
    let registry = registry();
    assert!(registry.list(ListKey::LineItem).ui_hidden);
    assert!(!registry.list(ListKey::Purchase).ui_hidden);
}
