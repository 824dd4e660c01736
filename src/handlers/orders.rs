use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::address::OrderAddress;
use crate::domain::order::{OrderItemView, OrderView};
use crate::errors::AppError;
use crate::AppOrderService;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i32,
    /// Decimal amounts are rendered as strings, e.g. "100.00"
    pub price: String,
    pub total: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Option<String>,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub discount: String,
    pub total: String,
    pub shipping_address: AddressResponse,
    pub billing_address: AddressResponse,
    pub payment_intent_id: String,
    pub payment_method: String,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderAddress> for AddressResponse {
    fn from(a: OrderAddress) -> Self {
        Self {
            name: a.name,
            line1: a.line1,
            line2: a.line2,
            city: a.city,
            state: a.state,
            country: a.country,
            postal_code: a.postal_code,
        }
    }
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(i: OrderItemView) -> Self {
        Self {
            id: i.id,
            product_id: i.product_id,
            variant_id: i.variant_id,
            quantity: i.quantity,
            price: i.price.to_string(),
            total: i.total.to_string(),
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            order_number: o.order_number,
            user_id: o.user_id,
            email: o.email,
            phone: o.phone,
            status: o.status,
            subtotal: o.subtotal.to_string(),
            tax: o.tax.to_string(),
            shipping: o.shipping.to_string(),
            discount: o.discount.to_string(),
            total: o.total.to_string(),
            shipping_address: o.shipping_address.into(),
            billing_address: o.billing_address.into(),
            payment_intent_id: o.payment_intent_id,
            payment_method: o.payment_method,
            created_at: o.created_at.to_rfc3339(),
            items: o.items.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders/{id}
///
/// Returns the order together with its items.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders/by-number/{order_number}
///
/// Looks an order up by the reference shown to the shopper.
#[utoipa::path(
    get,
    path = "/orders/by-number/{order_number}",
    params(
        ("order_number" = String, Path, description = "Order number, e.g. TH-M5X2K1AB-7QZ0D"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order_by_number(
    service: web::Data<AppOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_number = path.into_inner();

    let order = web::block(move || service.get_order_by_number(&order_number))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders
///
/// Returns a paginated list of orders (without their items), newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<AppOrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();

    let result = web::block(move || service.list_orders(params.page, params.limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page: result.page,
        limit: result.limit,
    }))
}
