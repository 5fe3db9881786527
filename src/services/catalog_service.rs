use crate::{
    audit::log_audit,
    dto::catalog::{
        AddItemRequest, BookingQuote, DeletedItems, ItemEnvelope, PriceInput, PricedCatalog,
        PricedItem,
    },
    error::{AppError, AppResult, StorageContext},
    models::{Catalog, CatalogItem, ItemType, PricingRules},
    response::ApiResponse,
    services::pricing::calculate_price,
    state::AppState,
    store::Collection,
};

/// Stored catalog, or the seed content when nothing has been written yet.
/// Never writes.
pub async fn get_catalog(state: &AppState) -> AppResult<Catalog> {
    state
        .store
        .load_or(&Collection::Items, Catalog::seed)
        .await
        .storage_context("Failed to load catalog")
}

pub async fn add_item(
    state: &AppState,
    payload: AddItemRequest,
) -> AppResult<ApiResponse<ItemEnvelope>> {
    let NewItem {
        item_type,
        name,
        price,
        description,
        parts,
        image,
        pricing_rules,
    } = validate_new_item(payload)?;

    let item = state
        .store
        .update(&Collection::Items, Catalog::seed, |catalog: &mut Catalog| {
            state.ids.observe(catalog.max_id());
            let item = CatalogItem {
                id: state.ids.next_id(),
                name,
                price,
                description,
                parts,
                image,
                pricing_rules,
            };
            catalog.section_mut(item_type).push(item.clone());
            Ok::<_, AppError>(item)
        })
        .await
        .storage_context("Failed to add item")?;

    log_audit(
        None,
        "catalog_item_add",
        Some("items"),
        Some(serde_json::json!({ "type": item_type.as_str(), "id": item.id, "name": item.name })),
    );

    Ok(ApiResponse::success("Item added", ItemEnvelope { item }))
}

/// Remove every item of `item_type` whose name is exactly `name`.
pub async fn delete_item(
    state: &AppState,
    item_type: &str,
    name: &str,
) -> AppResult<ApiResponse<DeletedItems>> {
    let item_type = parse_item_type(item_type)?;

    let removed = state
        .store
        .update(&Collection::Items, Catalog::seed, |catalog: &mut Catalog| {
            let section = catalog.section_mut(item_type);
            let before = section.len();
            section.retain(|item| item.name != name);
            Ok::<_, AppError>(before - section.len())
        })
        .await
        .storage_context("Failed to delete item")?;

    if removed > 1 {
        tracing::warn!(
            item_type = %item_type,
            name,
            removed,
            "name matched several catalog items, all removed"
        );
    }
    log_audit(
        None,
        "catalog_item_delete",
        Some("items"),
        Some(serde_json::json!({ "type": item_type.as_str(), "name": name, "removed": removed })),
    );

    Ok(ApiResponse::success("Item deleted", DeletedItems { removed }))
}

pub async fn delete_item_by_id(
    state: &AppState,
    item_type: &str,
    id: i64,
) -> AppResult<ApiResponse<DeletedItems>> {
    let item_type = parse_item_type(item_type)?;

    let removed = state
        .store
        .update(&Collection::Items, Catalog::seed, |catalog: &mut Catalog| {
            let section = catalog.section_mut(item_type);
            let before = section.len();
            section.retain(|item| item.id != id);
            match before - section.len() {
                0 => Err(AppError::NotFound(format!("No {item_type} with id {id}"))),
                removed => Ok(removed),
            }
        })
        .await
        .storage_context("Failed to delete item")?;

    log_audit(
        None,
        "catalog_item_delete",
        Some("items"),
        Some(serde_json::json!({ "type": item_type.as_str(), "id": id })),
    );

    Ok(ApiResponse::success("Item deleted", DeletedItems { removed }))
}

/// Catalog with each item's price resolved for one engine volume.
pub async fn priced_catalog(
    state: &AppState,
    engine_volume: Option<f64>,
) -> AppResult<PricedCatalog> {
    let catalog = get_catalog(state).await?;
    let price_all = |items: Vec<CatalogItem>| -> Vec<PricedItem> {
        items
            .into_iter()
            .map(|item| PricedItem {
                final_price: calculate_price(&item, engine_volume),
                item,
            })
            .collect()
    };

    Ok(PricedCatalog {
        services: price_all(catalog.services),
        parts: price_all(catalog.parts),
    })
}

/// Booking total for a service: its tier price plus the base price of every
/// listed part found in the catalog.
pub fn quote_service(
    catalog: &Catalog,
    service_name: &str,
    engine_volume: Option<f64>,
) -> AppResult<BookingQuote> {
    let service = catalog
        .services
        .iter()
        .find(|s| s.name == service_name)
        .ok_or_else(|| AppError::NotFound(format!("Service `{service_name}` not found")))?;

    let service_price = calculate_price(service, engine_volume);
    let mut parts_cost = 0;
    let mut missing_parts = Vec::new();
    for part_name in service.parts.iter().flatten() {
        match catalog.parts.iter().find(|p| &p.name == part_name) {
            Some(part) => parts_cost = part.price.saturating_add(parts_cost),
            None => missing_parts.push(part_name.clone()),
        }
    }

    Ok(BookingQuote {
        service: service.name.clone(),
        service_price,
        parts_cost,
        total: service_price.saturating_add(parts_cost),
        missing_parts,
    })
}

pub async fn quote_booking(
    state: &AppState,
    service_name: &str,
    engine_volume: Option<f64>,
) -> AppResult<BookingQuote> {
    let catalog = get_catalog(state).await?;
    quote_service(&catalog, service_name, engine_volume)
}

struct NewItem {
    item_type: ItemType,
    name: String,
    price: i64,
    description: String,
    parts: Option<Vec<String>>,
    image: Option<String>,
    pricing_rules: Option<PricingRules>,
}

fn validate_new_item(payload: AddItemRequest) -> AppResult<NewItem> {
    let item_type = non_empty(payload.item_type).ok_or(AppError::MissingField)?;
    let name = non_empty(payload.name).ok_or(AppError::MissingField)?;
    let description = non_empty(payload.description).ok_or(AppError::MissingField)?;
    let price = match &payload.price {
        Some(price) => parse_price(price)?,
        None => return Err(AppError::MissingField),
    };
    // A numeric zero is treated as not filled in.
    if price == 0 && matches!(payload.price, Some(PriceInput::Number(_))) {
        return Err(AppError::MissingField);
    }

    let item_type = parse_item_type(&item_type)?;
    let (parts, image) = match item_type {
        ItemType::Service => (Some(parse_parts(payload.parts.as_deref())), None),
        ItemType::Part => (None, non_empty(payload.image)),
    };

    let pricing_rules = payload
        .pricing_rules
        .map(|mut rules| {
            if rules
                .engine_volume
                .iter()
                .any(|tier| !tier.up_to.is_finite() || tier.price < 0)
            {
                return Err(AppError::BadRequest(
                    "pricing tiers need a finite upTo and a non-negative price".to_string(),
                ));
            }
            rules.engine_volume.sort_by(|a, b| a.up_to.total_cmp(&b.up_to));
            Ok(rules)
        })
        .transpose()?
        .filter(|rules| !rules.engine_volume.is_empty());

    Ok(NewItem {
        item_type,
        name,
        price,
        description,
        parts,
        image,
        pricing_rules,
    })
}

fn parse_item_type(raw: &str) -> AppResult<ItemType> {
    raw.parse().map_err(|_| AppError::InvalidType)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_price(price: &PriceInput) -> AppResult<i64> {
    let value = match price {
        PriceInput::Number(n) => *n,
        PriceInput::Text(text) if text.is_empty() => return Err(AppError::MissingField),
        PriceInput::Text(text) => text.trim().parse::<f64>().map_err(|_| invalid_price())?,
    };

    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > i64::MAX as f64 {
        return Err(invalid_price());
    }
    Ok(value as i64)
}

fn invalid_price() -> AppError {
    AppError::BadRequest("price must be a non-negative whole number".to_string())
}

/// Newline-separated part names to a trimmed list without blanks.
pub fn parse_parts(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
