use chrono::{NaiveDate, Utc};

use crate::{
    audit::log_audit,
    dto::bookings::{BookingCreated, BookingRequest, BookingStats},
    error::{AppError, AppResult, StorageContext},
    models::BookingRecord,
    response::{ApiResponse, Empty},
    state::AppState,
    store::Collection,
};

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

pub async fn create_booking(
    state: &AppState,
    payload: BookingRequest,
) -> AppResult<ApiResponse<BookingCreated>> {
    let BookingRequest {
        client_name,
        client_phone,
        client_email,
        car_model,
        service,
        date,
        time,
        comments,
        total,
        mut extra,
    } = payload;
    // Assigned here, never taken from the client.
    extra.remove("id");
    extra.remove("createdAt");

    let id = state
        .store
        .update(&Collection::Records, Vec::new, |records: &mut Vec<BookingRecord>| {
            state.ids.observe(records.iter().map(|r| r.id).max());
            let record = BookingRecord {
                id: state.ids.next_id(),
                client_name,
                client_phone,
                client_email,
                car_model,
                service,
                date,
                time,
                comments,
                total,
                created_at: Utc::now(),
                extra,
            };
            let id = record.id;
            records.push(record);
            Ok::<_, AppError>(id)
        })
        .await
        .storage_context("Failed to create booking")?;

    log_audit(
        None,
        "booking_create",
        Some("records"),
        Some(serde_json::json!({ "id": id })),
    );
    Ok(ApiResponse::success("Booking created", BookingCreated { id }))
}

pub async fn list_bookings(state: &AppState) -> AppResult<Vec<BookingRecord>> {
    state
        .store
        .load_or(&Collection::Records, Vec::new)
        .await
        .storage_context("Failed to load bookings")
}

/// Remove the booking whose id loosely equals `raw_id`.
pub async fn delete_booking(state: &AppState, raw_id: &str) -> AppResult<ApiResponse<Empty>> {
    let removed = state
        .store
        .update(&Collection::Records, Vec::new, |records: &mut Vec<BookingRecord>| {
            let before = records.len();
            records.retain(|r| !loosely_equals(r.id, raw_id));
            Ok::<_, AppError>(before - records.len())
        })
        .await
        .storage_context("Failed to delete booking")?;

    log_audit(
        None,
        "booking_delete",
        Some("records"),
        Some(serde_json::json!({ "id": raw_id, "removed": removed })),
    );
    Ok(ApiResponse::message("Booking deleted"))
}

pub async fn clear_bookings(state: &AppState) -> AppResult<ApiResponse<Empty>> {
    state
        .store
        .save(&Collection::Records, &Vec::<BookingRecord>::new())
        .await
        .storage_context("Failed to clear bookings")?;

    log_audit(None, "booking_clear", Some("records"), None);
    Ok(ApiResponse::message("All bookings deleted"))
}

pub async fn booking_stats(state: &AppState, today: NaiveDate) -> AppResult<BookingStats> {
    let records = list_bookings(state).await?;
    Ok(stats_for(&records, today))
}

pub async fn upcoming_bookings(
    state: &AppState,
    today: NaiveDate,
    limit: usize,
) -> AppResult<Vec<BookingRecord>> {
    let records = list_bookings(state).await?;
    Ok(upcoming_from(records, today, limit))
}

pub fn stats_for(records: &[BookingRecord], today: NaiveDate) -> BookingStats {
    let today = today.format("%Y-%m-%d").to_string();
    BookingStats {
        total_records: records.len(),
        today_records: records.iter().filter(|r| r.date == today).count(),
        total_revenue: records
            .iter()
            .fold(0_i64, |sum, r| sum.saturating_add(r.total)),
    }
}

/// Bookings dated today or later, earliest first. Records whose date does
/// not parse are skipped.
pub fn upcoming_from(
    records: Vec<BookingRecord>,
    today: NaiveDate,
    limit: usize,
) -> Vec<BookingRecord> {
    let mut dated: Vec<(NaiveDate, BookingRecord)> = records
        .into_iter()
        .filter_map(|r| parse_booking_date(&r.date).map(|date| (date, r)))
        .filter(|(date, _)| *date >= today)
        .collect();
    dated.sort_by_key(|(date, _)| *date);
    dated.into_iter().take(limit).map(|(_, r)| r).collect()
}

fn parse_booking_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // Accept a full timestamp too; only the day matters.
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Compare a stored numeric id with an id taken from a URL the way a
/// loosely typed client would: surrounding whitespace is ignored, an empty
/// string equals zero, and the text is read as a number.
pub fn loosely_equals(stored: i64, raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return stored == 0;
    }

    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| raw.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix {
        return i64::from_str_radix(digits, radix).is_ok_and(|value| value == stored);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value == stored as f64,
        _ => false,
    }
}
