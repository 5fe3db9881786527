use crate::{
    models::{BookingRecord, Catalog, User},
    store::{Collection, JsonStore, StoreResult},
};

pub mod auth_service;
pub mod booking_service;
pub mod cart_service;
pub mod catalog_service;
pub mod pricing;

/// Write the default documents for any collection that has no file yet.
/// Existing files are left alone.
pub async fn init_default_data(store: &JsonStore) -> StoreResult<()> {
    let created_users = store
        .ensure_exists(&Collection::Users, &Vec::<User>::new())
        .await?;
    let created_items = store
        .ensure_exists(&Collection::Items, &Catalog::seed())
        .await?;
    let created_records = store
        .ensure_exists(&Collection::Records, &Vec::<BookingRecord>::new())
        .await?;

    tracing::info!(
        data_dir = %store.data_dir().display(),
        created_users,
        created_items,
        created_records,
        "default data checked"
    );
    Ok(())
}
