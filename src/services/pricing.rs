use crate::models::CatalogItem;

/// Price of `item` for a car with the given engine volume (litres).
///
/// Picks the first tier whose `up_to` covers the volume, the last tier when
/// the volume exceeds them all, and the base price when the item has no tiers
/// or the volume is unknown. A zero volume counts as unknown.
pub fn calculate_price(item: &CatalogItem, engine_volume: Option<f64>) -> i64 {
    let volume = match engine_volume {
        Some(volume) if volume.is_finite() && volume != 0.0 => volume,
        _ => return item.price,
    };

    let tiers = match item.pricing_rules.as_ref() {
        Some(rules) if !rules.engine_volume.is_empty() => &rules.engine_volume,
        _ => return item.price,
    };

    tiers
        .iter()
        .find(|tier| volume <= tier.up_to)
        .or_else(|| tiers.last())
        .map_or(item.price, |tier| tier.price)
}
