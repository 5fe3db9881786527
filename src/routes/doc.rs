use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, RegisterRequest, UserEnvelope},
        bookings::{BookingCreated, BookingRequest, BookingStats},
        cart::{AddToCartRequest, CartEnvelope, CartSummary},
        catalog::{
            AddItemRequest, BookingQuote, DeletedItems, ItemEnvelope, PriceInput, PricedCatalog,
            PricedItem,
        },
    },
    models::{
        BookingRecord, Car, CartLine, Catalog, CatalogItem, ItemType, PriceTier, PricingRules,
        Role, User,
    },
    response::{ApiResponse, Empty},
    routes::{auth, bookings, cart, catalog, health},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::users,
        catalog::list_items,
        catalog::priced_items,
        catalog::add_item,
        catalog::delete_item,
        catalog::delete_item_by_id,
        cart::get_cart,
        cart::save_cart,
        cart::add_to_cart,
        cart::cart_summary,
        bookings::create_booking,
        bookings::quote_booking,
        bookings::list_records,
        bookings::record_stats,
        bookings::upcoming_records,
        bookings::delete_record,
        bookings::clear_records
    ),
    components(
        schemas(
            User,
            Car,
            Role,
            ItemType,
            Catalog,
            CatalogItem,
            PricingRules,
            PriceTier,
            CartLine,
            BookingRecord,
            RegisterRequest,
            LoginRequest,
            UserEnvelope,
            AddItemRequest,
            PriceInput,
            ItemEnvelope,
            DeletedItems,
            PricedCatalog,
            PricedItem,
            BookingQuote,
            AddToCartRequest,
            CartEnvelope,
            CartSummary,
            BookingRequest,
            BookingCreated,
            BookingStats,
            Empty,
            ApiResponse<UserEnvelope>,
            ApiResponse<ItemEnvelope>,
            ApiResponse<BookingCreated>,
            ApiResponse<Empty>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and user listing"),
        (name = "Catalog", description = "Services and parts"),
        (name = "Cart", description = "Per-user cart"),
        (name = "Bookings", description = "Appointments and admin panel data"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
