pub mod application;
pub mod cart;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::checkout_service::CheckoutService;
use application::order_service::OrderService;
use domain::ports::{OrderRepository, PriceCatalog};
use infrastructure::catalog_repo::DieselPriceCatalog;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type AppCheckoutService = CheckoutService<Arc<dyn OrderRepository>, Arc<dyn PriceCatalog>>;
pub type AppOrderService = OrderService<Arc<dyn OrderRepository>>;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::checkout::place_order,
        handlers::orders::get_order,
        handlers::orders::get_order_by_number,
        handlers::orders::list_orders,
    ),
    tags(
        (name = "checkout", description = "Turn a cart into an order"),
        (name = "orders", description = "Placed orders"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Register the HTTP routes. Expects `AppCheckoutService` and
/// `AppOrderService` to be present as app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkout", web::post().to(handlers::checkout::place_order))
        .service(
            web::scope("/orders")
                .route("", web::get().to(handlers::orders::list_orders))
                .route(
                    "/by-number/{order_number}",
                    web::get().to(handlers::orders::get_order_by_number),
                )
                .route("/{id}", web::get().to(handlers::orders::get_order)),
        );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let orders: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool.clone()));
    let catalog: Arc<dyn PriceCatalog> = Arc::new(DieselPriceCatalog::new(pool));
    let checkout = web::Data::new(CheckoutService::new(orders.clone(), catalog));
    let order_queries = web::Data::new(OrderService::new(orders));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(checkout.clone())
            .app_data(order_queries.clone())
            .wrap(Logger::default())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
