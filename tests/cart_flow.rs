mod common;

use autoservice_api::{
    dto::cart::AddToCartRequest,
    error::AppError,
    models::{CartLine, ItemType},
    services::cart_service,
};
use serde_json::json;

fn oil_filter() -> AddToCartRequest {
    AddToCartRequest {
        item_type: ItemType::Part,
        name: "Oil filter".into(),
        price: 500,
        image: Some("/img/filter.png".into()),
    }
}

#[tokio::test]
async fn unknown_cart_is_empty() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();
    assert!(cart_service::get_cart(&state, "42").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn saved_cart_round_trips_unchanged() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    let lines: Vec<CartLine> = serde_json::from_value(json!([
        { "type": "service", "name": "Diagnostics", "price": 1200, "qty": 1 },
        { "type": "part", "name": "Oil filter", "price": 500, "qty": 3,
          "image": "/img/filter.png", "note": "left side" }
    ]))?;

    let resp = cart_service::save_cart(&state, "7", lines.clone()).await?;
    assert_eq!(resp.message, "Cart saved");

    let stored = cart_service::get_cart(&state, "7").await?;
    assert_eq!(stored, lines);
    assert_eq!(stored[1].extra.get("note"), Some(&json!("left side")));

    // Carts are per user.
    assert!(cart_service::get_cart(&state, "8").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn add_to_cart_merges_same_line() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    cart_service::add_to_cart(&state, "7", oil_filter()).await?;
    let resp = cart_service::add_to_cart(&state, "7", oil_filter()).await?;
    assert_eq!(resp.message, "Added to cart");
    assert_eq!(resp.data.cart.len(), 1);
    assert_eq!(resp.data.cart[0].qty, 2);

    let stored = cart_service::get_cart(&state, "7").await?;
    assert_eq!(stored, resp.data.cart);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_are_all_counted() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let state = state.clone();
        tasks.push(tokio::spawn(async move {
            cart_service::add_to_cart(&state, "7", oil_filter()).await
        }));
    }
    for task in tasks {
        task.await??;
    }

    let stored = cart_service::get_cart(&state, "7").await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].qty, 20);

    Ok(())
}

#[tokio::test]
async fn invalid_user_id_is_rejected() {
    let (dir, state) = common::setup_state();

    for bad in ["abc", "0", "../users", "-1"] {
        let err = cart_service::get_cart(&state, bad).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUserId), "{bad}");
        let err = cart_service::add_to_cart(&state, bad, oil_filter())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidUserId), "{bad}");
    }

    let mut entries = std::fs::read_dir(dir.path()).expect("data dir");
    assert!(entries.next().is_none());
}

#[tokio::test]
async fn summary_totals_cart() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    cart_service::add_to_cart(&state, "7", oil_filter()).await?;
    cart_service::add_to_cart(&state, "7", oil_filter()).await?;
    cart_service::add_to_cart(
        &state,
        "7",
        AddToCartRequest {
            item_type: ItemType::Service,
            name: "Oil and filter change".into(),
            price: 2000,
            image: None,
        },
    )
    .await?;

    let summary = cart_service::cart_summary(&state, "7").await?;
    assert_eq!(summary.services_cost, 2000);
    assert_eq!(summary.parts_cost, 1000);
    assert_eq!(summary.total, 3000);
    assert_eq!(summary.count, 3);

    Ok(())
}

#[tokio::test]
async fn summary_of_huge_saved_cart_saturates() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    let lines: Vec<CartLine> = serde_json::from_value(json!([
        { "type": "part", "name": "Engine", "price": 5_000_000_000_000_000_000_i64, "qty": 2 }
    ]))?;
    cart_service::save_cart(&state, "7", lines).await?;

    let summary = cart_service::cart_summary(&state, "7").await?;
    assert_eq!(summary.parts_cost, i64::MAX);
    assert_eq!(summary.total, i64::MAX);
    assert_eq!(summary.count, 2);

    Ok(())
}
