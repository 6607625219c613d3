//! Demo data seeding.
//!
//! Creates one vendor (identity, user, store, address), a couple of
//! brands, a linked product catalog, and one placed order with a Stripe
//! payment session, so every API surface has something to return out of
//! the box. Not idempotent: run against an empty database.

use rust_decimal::Decimal;
use uuid::Uuid;

use agora_core::{CustomerId, OrderId};
use agora_server::db::store_addresses::{StoreAddressInput, StoreAddressRepository};
use agora_server::db::{BrandRepository, ProductRepository, StoreRepository, UserRepository};
use agora_server::services::auth::hash_password;

use super::CommandError;

const SEED_EMAIL: &str = "vendor@agora.test";
const SEED_PASSWORD: &str = "agora-demo";

/// Seed the database with demo data.
///
/// # Errors
///
/// Returns `CommandError` if any insert fails (e.g., the seed vendor
/// already exists).
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let users = UserRepository::new(&pool);
    let stores = StoreRepository::new(&pool);
    let brands = BrandRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    tracing::info!("Seeding demo data...");

    // Vendor: identity -> user -> store, the same shape registration builds.
    let email = agora_core::Email::parse(SEED_EMAIL)
        .map_err(agora_server::services::auth::AuthError::InvalidEmail)?;
    let password_hash = hash_password(SEED_PASSWORD)?;
    let identity = users.create_identity(&email, &password_hash).await?;
    let user = users.create_user(&email, false).await?;
    users.bind_identity(identity.id, user.id).await?;

    let store = stores.create("Agora Demo Store", user.id).await?;
    StoreAddressRepository::new(&pool)
        .create(
            store.id,
            &StoreAddressInput {
                address_1: "1 Ermou".to_owned(),
                address_2: None,
                city: "Athens".to_owned(),
                postal_code: "10563".to_owned(),
                province: None,
                country_code: "gr".to_owned(),
                phone: Some("+30 210 000 0000".to_owned()),
            },
        )
        .await?;
    tracing::info!(store = %store.name, email = SEED_EMAIL, password = SEED_PASSWORD, "vendor created");

    // Brands and a small catalog.
    let olive = brands
        .create("Olive & Co", "olive-co", None, Some("Olive-wood kitchenware"))
        .await?;
    brands
        .create("Kyma Ceramics", "kyma-ceramics", None, None)
        .await?;

    let board = products
        .create("Olive-wood cutting board", "olive-wood-cutting-board-d3m0s", None, "published")
        .await?;
    products
        .add_image(board.id, "https://cdn.agora.test/boards/01.jpg", 0)
        .await?;
    products
        .set_thumbnail(board.id, "https://cdn.agora.test/boards/01.jpg")
        .await?;
    stores.link_product(board.id, store.id).await?;
    brands.link_product(board.id, olive.id).await?;

    let bowl = products
        .create("Serving bowl", "serving-bowl-d3m0s", None, "published")
        .await?;
    stores.link_product(bowl.id, store.id).await?;

    // One placed order with a Stripe session, ready for the order-placed
    // hook to pick up.
    let customer_id = CustomerId::generate();
    sqlx::query("INSERT INTO customer (id, email) VALUES ($1, $2)")
        .bind(customer_id)
        .bind("shopper@example.com")
        .execute(&pool)
        .await?;

    let order_id = OrderId::generate();
    sqlx::query(
        "INSERT INTO orders (id, customer_id, currency_code, total) VALUES ($1, $2, 'eur', $3)",
    )
    .bind(order_id)
    .bind(customer_id)
    .bind(Decimal::from(4500))
    .execute(&pool)
    .await?;

    sqlx::query(
        "INSERT INTO order_line_item (id, order_id, product_id, title, quantity, unit_price)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(board.id)
    .bind(&board.title)
    .bind(1_i32)
    .bind(Decimal::from(4500))
    .execute(&pool)
    .await?;

    let collection_id = Uuid::new_v4();
    sqlx::query("INSERT INTO payment_collection (id, order_id) VALUES ($1, $2)")
        .bind(collection_id)
        .bind(order_id)
        .execute(&pool)
        .await?;
    sqlx::query(
        "INSERT INTO payment_session (id, payment_collection_id, provider_id, data)
         VALUES ($1, $2, 'stripe', $3)",
    )
    .bind(Uuid::new_v4())
    .bind(collection_id)
    .bind(serde_json::json!({ "id": "pi_demo_0000000000" }))
    .execute(&pool)
    .await?;

    tracing::info!(order = %order_id, "demo order created");
    tracing::info!("Seeding complete");

    Ok(())
}
