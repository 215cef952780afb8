mod common;

use order_desk_api::{
    error::AppError,
    patch::PatchOperation,
    routes::params::ListQuery,
    services::customer_service,
};
use serde_json::json;

fn ops(value: serde_json::Value) -> Vec<PatchOperation> {
    serde_json::from_value(value).expect("patch document")
}

#[tokio::test]
async fn created_customer_reads_back_unchanged() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let input = common::customer(7, "Anna");

    let created = customer_service::create_customer(&state, input.clone()).await?;
    assert_eq!(created.data.as_ref(), Some(&input));

    let fetched = customer_service::get_customer(&state, 7).await?;
    assert!(fetched.meta.is_some());
    assert_eq!(fetched.data, Some(input));
    Ok(())
}

#[tokio::test]
async fn empty_collection_is_not_found() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let result = customer_service::list_customers(&state, ListQuery::default()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn list_pages_through_customers_in_id_order() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    for (id, name) in [(3, "Cara"), (1, "Ann"), (2, "Bea")] {
        customer_service::create_customer(&state, common::customer(id, name)).await?;
    }

    let all = customer_service::list_customers(&state, ListQuery::default()).await?;
    let ids: Vec<i16> = all.data.unwrap().items.iter().map(|c| c.customer_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(all.meta.unwrap().total, Some(3));

    let page = customer_service::list_customers(
        &state,
        ListQuery {
            page: Some(2),
            per_page: Some(2),
        },
    )
    .await?;
    let ids: Vec<i16> = page.data.unwrap().items.iter().map(|c| c.customer_id).collect();
    assert_eq!(ids, vec![3]);

    let beyond = customer_service::list_customers(
        &state,
        ListQuery {
            page: Some(i64::MAX),
            per_page: Some(100),
        },
    )
    .await;
    assert!(matches!(beyond, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn duplicate_id_is_a_conflict() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    customer_service::create_customer(&state, common::customer(1, "Ann")).await?;

    let result = customer_service::create_customer(&state, common::customer(1, "Other")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = customer_service::get_customer(&state, 1).await?;
    assert_eq!(stored.data.unwrap().customer_name, "Ann");
    Ok(())
}

#[tokio::test]
async fn invalid_customer_is_rejected_before_insert() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let mut input = common::customer(1, "Ann");
    input.customer_name = "  ".into();

    let result = customer_service::create_customer(&state, input).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(matches!(
        customer_service::get_customer(&state, 1).await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn replace_with_mismatched_ids_leaves_record_unchanged() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let original = common::customer(1, "Ann");
    customer_service::create_customer(&state, original.clone()).await?;

    let result = customer_service::replace_customer(&state, 1, common::customer(2, "Zed")).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let stored = customer_service::get_customer(&state, 1).await?;
    assert_eq!(stored.data, Some(original));
    Ok(())
}

#[tokio::test]
async fn replace_overwrites_every_field() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    customer_service::create_customer(&state, common::customer(1, "Ann")).await?;

    let mut replacement = common::customer(1, "Annette");
    replacement.customer_title = None;
    replacement.cell_phone = None;
    customer_service::replace_customer(&state, 1, replacement.clone()).await?;

    let stored = customer_service::get_customer(&state, 1).await?;
    assert_eq!(stored.data, Some(replacement));
    Ok(())
}

#[tokio::test]
async fn replace_of_missing_customer_is_not_found() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let result = customer_service::replace_customer(&state, 4, common::customer(4, "Ann")).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn patch_applies_operations_in_order() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    customer_service::create_customer(&state, common::customer(1, "Ann")).await?;

    customer_service::patch_customer(
        &state,
        1,
        ops(json!([
            { "op": "replace", "path": "/customerName", "value": "Anne" },
            { "op": "remove", "path": "/cellPhone" },
            { "op": "replace", "path": "/customerName", "value": "Annie" }
        ])),
    )
    .await?;

    let stored = customer_service::get_customer(&state, 1).await?.data.unwrap();
    assert_eq!(stored.customer_name, "Annie");
    assert_eq!(stored.cell_phone, None);
    assert_eq!(stored.customer_surname, "Botha");
    Ok(())
}

#[tokio::test]
async fn patch_with_null_clears_optional_fields() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    customer_service::create_customer(&state, common::customer(1, "Ann")).await?;

    customer_service::patch_customer(
        &state,
        1,
        ops(json!([
            { "op": "replace", "path": "/cellPhone", "value": null },
            { "op": "replace", "path": "/customerTitle", "value": null }
        ])),
    )
    .await?;

    let stored = customer_service::get_customer(&state, 1).await?.data.unwrap();
    assert_eq!(stored.cell_phone, None);
    assert_eq!(stored.customer_title, None);
    assert_eq!(stored.customer_name, "Ann");

    let required = customer_service::patch_customer(
        &state,
        1,
        ops(json!([{ "op": "replace", "path": "/customerName", "value": null }])),
    )
    .await;
    assert!(matches!(required, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn rejected_patch_changes_nothing() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let original = common::customer(1, "Ann");
    customer_service::create_customer(&state, original.clone()).await?;

    for doc in [
        json!([{ "op": "replace", "path": "/customerId", "value": 9 }]),
        json!([{ "op": "remove", "path": "/customerSurname" }]),
        json!([
            { "op": "replace", "path": "/customerName", "value": "Changed" },
            { "op": "replace", "path": "/customerTitle", "value": "His Excellency" }
        ]),
    ] {
        let result = customer_service::patch_customer(&state, 1, ops(doc)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    let stored = customer_service::get_customer(&state, 1).await?;
    assert_eq!(stored.data, Some(original));
    Ok(())
}

#[tokio::test]
async fn patch_of_missing_customer_is_not_found() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let result = customer_service::patch_customer(
        &state,
        3,
        ops(json!([{ "op": "replace", "path": "/customerName", "value": "X" }])),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn delete_removes_only_the_target() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    customer_service::create_customer(&state, common::customer(1, "Ann")).await?;
    customer_service::create_customer(&state, common::customer(2, "Bea")).await?;

    let missing = customer_service::delete_customer(&state, 9).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    let all = customer_service::list_customers(&state, ListQuery::default()).await?;
    assert_eq!(all.data.unwrap().items.len(), 2);

    customer_service::delete_customer(&state, 1).await?;
    assert!(matches!(
        customer_service::get_customer(&state, 1).await,
        Err(AppError::NotFound)
    ));
    assert!(customer_service::get_customer(&state, 2).await.is_ok());
    Ok(())
}
