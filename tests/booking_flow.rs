mod common;

use autoservice_api::{
    dto::bookings::BookingRequest,
    services::booking_service,
};
use chrono::NaiveDate;
use serde_json::json;

fn booking(date: &str, total: i64) -> BookingRequest {
    BookingRequest {
        client_name: "Ivan".into(),
        client_phone: "+7 900 000-00-00".into(),
        client_email: "ivan@example.com".into(),
        car_model: "Lada Vesta".into(),
        service: "Oil and filter change".into(),
        date: date.into(),
        time: "10:30".into(),
        comments: String::new(),
        total,
        ..Default::default()
    }
}

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

#[tokio::test]
async fn create_list_and_delete_booking() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    let created = booking_service::create_booking(&state, booking("2026-10-20", 3500)).await?;
    assert_eq!(created.message, "Booking created");
    let other = booking_service::create_booking(&state, booking("2026-10-21", 2000)).await?;
    assert_ne!(created.data.id, other.data.id);

    let records = booking_service::list_bookings(&state).await?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, created.data.id);
    assert_eq!(records[0].client_name, "Ivan");

    let resp = booking_service::delete_booking(&state, &created.data.id.to_string()).await?;
    assert_eq!(resp.message, "Booking deleted");

    let records = booking_service::list_bookings(&state).await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, other.data.id);

    // Unknown ids still answer with success.
    booking_service::delete_booking(&state, "12345").await?;
    assert_eq!(booking_service::list_bookings(&state).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn delete_matches_id_loosely() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    let created = booking_service::create_booking(&state, booking("2026-10-20", 0)).await?;
    let raw = format!(" {}.0 ", created.data.id);
    booking_service::delete_booking(&state, &raw).await?;
    assert!(booking_service::list_bookings(&state).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn client_cannot_choose_id_or_created_at() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    let request: BookingRequest = serde_json::from_value(json!({
        "id": 1,
        "createdAt": "2000-01-01T00:00:00Z",
        "clientName": "Ivan",
        "service": "Diagnostics",
        "date": "2026-10-20",
        "time": "09:00",
        "total": 1200,
        "promo": "AUTUMN"
    }))?;

    let created = booking_service::create_booking(&state, request).await?;
    assert_ne!(created.data.id, 1);

    let records = booking_service::list_bookings(&state).await?;
    let record = &records[0];
    assert_eq!(record.id, created.data.id);
    assert!(record.created_at.timestamp() > 946_684_800);
    assert!(!record.extra.contains_key("id"));
    assert!(!record.extra.contains_key("createdAt"));
    assert_eq!(record.extra.get("promo"), Some(&json!("AUTUMN")));

    let body = serde_json::to_value(record)?;
    assert_eq!(body["promo"], "AUTUMN");
    assert_eq!(body["id"], created.data.id);

    Ok(())
}

#[tokio::test]
async fn clear_removes_every_booking() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    booking_service::create_booking(&state, booking("2026-10-20", 100)).await?;
    booking_service::create_booking(&state, booking("2026-10-21", 200)).await?;

    let resp = booking_service::clear_bookings(&state).await?;
    assert_eq!(resp.message, "All bookings deleted");
    assert!(booking_service::list_bookings(&state).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn stats_and_upcoming() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    booking_service::create_booking(&state, booking("2026-10-10", 1000)).await?;
    booking_service::create_booking(&state, booking("2026-10-16", 2000)).await?;
    booking_service::create_booking(&state, booking("2026-10-18", 3000)).await?;
    booking_service::create_booking(&state, booking("2026-10-17", 4000)).await?;
    booking_service::create_booking(&state, booking("someday", 500)).await?;

    let today = day("2026-10-16");
    let stats = booking_service::booking_stats(&state, today).await?;
    assert_eq!(stats.total_records, 5);
    assert_eq!(stats.today_records, 1);
    assert_eq!(stats.total_revenue, 10_500);

    let upcoming = booking_service::upcoming_bookings(&state, today, 2).await?;
    let dates: Vec<_> = upcoming.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2026-10-16", "2026-10-17"]);

    let all = booking_service::upcoming_bookings(&state, today, 10).await?;
    assert_eq!(all.len(), 3);

    Ok(())
}

#[tokio::test]
async fn stats_survive_huge_totals() -> anyhow::Result<()> {
    let (_dir, state) = common::setup_state();

    booking_service::create_booking(&state, booking("2026-10-16", i64::MAX)).await?;
    booking_service::create_booking(&state, booking("2026-10-17", i64::MAX)).await?;

    let stats = booking_service::booking_stats(&state, day("2026-10-16")).await?;
    assert_eq!(stats.total_records, 2);
    assert_eq!(stats.total_revenue, i64::MAX);

    Ok(())
}
