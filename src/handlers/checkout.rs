use std::str::FromStr;

use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::DEFAULT_VARIANT;
use crate::domain::checkout::{
    BillingChoice, CheckoutLine, CheckoutSubmission, Customer, PaymentSelection, PostalAddress,
};
use crate::domain::order::PlacedOrder;
use crate::domain::payment::PaymentMethod;
use crate::errors::AppError;
use crate::AppCheckoutService;

/// Set by the auth layer in front of the service for signed-in shoppers.
pub const USER_ID_HEADER: &str = "X-User-Id";

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Unit price as sent by the storefront: a JSON number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

impl PriceInput {
    fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            PriceInput::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
            PriceInput::Text(s) => BigDecimal::from_str(s.trim()).ok(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemRequest {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    /// Display name, informational only.
    #[serde(default)]
    pub name: Option<String>,
    #[schema(value_type = String, example = "100.00")]
    pub price: PriceInput,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    /// Defaults to Harare.
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub suburb: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfoRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub delivery_address: AddressRequest,
    #[serde(default)]
    pub billing_address: Option<AddressRequest>,
    /// Bill to the delivery address. Defaults to true.
    #[serde(default = "default_true")]
    pub same_as_billing: bool,
    /// One of `ecocash`, `innbucks` or `cash`; anything else means cash.
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub ecocash_number: Option<String>,
    #[serde(default)]
    pub innbucks_number: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItemRequest>,
    pub customer_info: CustomerInfoRequest,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub payment_instructions: String,
    pub payment_method: String,
}

impl From<PlacedOrder> for CheckoutResponse {
    fn from(p: PlacedOrder) -> Self {
        Self {
            order_id: p.order_id,
            order_number: p.order_number,
            payment_instructions: p.payment_instructions,
            payment_method: p.payment_method.as_str().to_string(),
        }
    }
}

// ── Decoding ─────────────────────────────────────────────────────────────────

impl From<AddressRequest> for PostalAddress {
    fn from(a: AddressRequest) -> Self {
        Self {
            line1: a.line1,
            line2: a.line2,
            city: a.city,
            suburb: a.suburb,
        }
    }
}

impl CheckoutItemRequest {
    fn into_line(self) -> Result<CheckoutLine, AppError> {
        let unit_price = self.price.to_decimal().ok_or_else(|| {
            AppError::BadRequest(format!("price for {} is not a number", self.product_id))
        })?;
        let quantity = i32::try_from(self.quantity).map_err(|_| {
            AppError::BadRequest(format!("quantity for {} is out of range", self.product_id))
        })?;
        let variant_id = self
            .variant_id
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && v != DEFAULT_VARIANT);

        Ok(CheckoutLine {
            product_id: self.product_id.trim().to_string(),
            variant_id,
            unit_price,
            quantity,
        })
    }
}

impl CheckoutRequest {
    pub fn into_submission(self, user_id: Option<String>) -> Result<CheckoutSubmission, AppError> {
        let lines = self
            .items
            .into_iter()
            .map(CheckoutItemRequest::into_line)
            .collect::<Result<Vec<_>, _>>()?;

        let info = self.customer_info;
        let billing = match (info.same_as_billing, info.billing_address) {
            (false, Some(address)) => BillingChoice::Separate(address.into()),
            _ => BillingChoice::SameAsShipping,
        };

        Ok(CheckoutSubmission {
            user_id,
            customer: Customer {
                first_name: info.first_name,
                last_name: info.last_name,
                email: info.email,
                phone: info.phone,
            },
            delivery_address: info.delivery_address.into(),
            billing,
            payment: PaymentSelection {
                method: PaymentMethod::resolve(info.payment_method.as_deref()),
                ecocash_number: info.ecocash_number,
                innbucks_number: info.innbucks_number,
            },
            lines,
        })
    }
}

fn user_id(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Places an order for the submitted cart. Prices are checked against the
/// catalog; the order and its items are written in a single transaction.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    params(
        ("X-User-Id" = Option<String>, Header, description = "Signed-in shopper, if any"),
    ),
    responses(
        (status = 201, description = "Order placed", body = CheckoutResponse),
        (status = 400, description = "Invalid checkout submission"),
        (status = 409, description = "Cart is out of date with the catalog"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn place_order(
    service: web::Data<AppCheckoutService>,
    req: HttpRequest,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let submission = body.into_inner().into_submission(user_id(&req))?;

    let placed = web::block(move || service.place_order(submission))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CheckoutResponse::from(placed)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::application::checkout_service::CheckoutService;
    use crate::application::order_service::OrderService;
    use crate::domain::ports::{OrderRepository, PriceCatalog};
    use crate::test_support::{FixedCatalog, InMemoryOrderRepository};

    fn services(
        repo: &InMemoryOrderRepository,
    ) -> (web::Data<AppCheckoutService>, web::Data<crate::AppOrderService>) {
        let orders: Arc<dyn OrderRepository> = Arc::new(repo.clone());
        let catalog: Arc<dyn PriceCatalog> = Arc::new(
            FixedCatalog::default()
                .with("p1", None, "100")
                .with("p2", None, "350")
                .with("p2", Some("long-30"), "420"),
        );
        (
            web::Data::new(CheckoutService::new(orders.clone(), catalog)),
            web::Data::new(OrderService::new(orders)),
        )
    }

    fn body(items: Value, customer_overrides: Value) -> Value {
        let mut customer = json!({
            "firstName": "Tariro",
            "lastName": "Chikwanha",
            "email": "tariro@example.com",
            "phone": "0772000111",
            "deliveryAddress": { "line1": "4 Lomagundi Road", "suburb": "Mount Pleasant" },
            "sameAsBilling": true
        });
        if let (Some(target), Some(extra)) = (customer.as_object_mut(), customer_overrides.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }
        json!({ "items": items, "customerInfo": customer })
    }

    macro_rules! app {
        ($repo:expr) => {{
            let (checkout, orders) = services($repo);
            test::init_service(
                App::new()
                    .app_data(checkout)
                    .app_data(orders)
                    .configure(crate::routes),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn checkout_returns_order_reference_and_instructions() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(body(
                json!([
                    { "productId": "p1", "price": 100, "quantity": 2 },
                    { "productId": "p2", "price": "350.00", "quantity": 1 }
                ]),
                json!({ "paymentMethod": "ecocash", "ecocashNumber": "0771234567" }),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let out: CheckoutResponse = test::read_body_json(resp).await;
        assert!(out.order_number.starts_with("TH-"));
        assert_eq!(out.payment_method, "ecocash");
        assert!(out.payment_instructions.contains("0771234567"));

        let orders = repo.orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].0.id, out.order_id);
        assert_eq!(orders[0].0.totals.total, BigDecimal::from(550));
    }

    #[actix_web::test]
    async fn default_variant_and_user_header_are_decoded() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .insert_header((USER_ID_HEADER, "user-7"))
            .set_json(body(
                json!([
                    { "productId": "p1", "variantId": "default", "price": 100, "quantity": 1 },
                    { "productId": "p2", "variantId": "long-30", "price": 420, "quantity": 1 }
                ]),
                json!({}),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let (order, items) = &repo.orders()[0];
        assert_eq!(order.user_id.as_deref(), Some("user-7"));
        assert_eq!(items[0].variant_id, None);
        assert_eq!(items[1].variant_id.as_deref(), Some("long-30"));
    }

    #[actix_web::test]
    async fn oversized_quantity_is_a_bad_request_and_not_stored() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(body(
                json!([{ "productId": "p1", "price": 100, "quantity": 2000000000 }]),
                json!({}),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(repo.orders().is_empty());
    }

    #[actix_web::test]
    async fn unknown_payment_method_falls_back_to_cash() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(body(
                json!([{ "productId": "p1", "price": 100, "quantity": 1 }]),
                json!({ "paymentMethod": "bitcoin" }),
            ))
            .to_request();
        let out: CheckoutResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(out.payment_method, "cash");
    }

    #[actix_web::test]
    async fn separate_billing_address_is_used_when_requested() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(body(
                json!([{ "productId": "p1", "price": 100, "quantity": 1 }]),
                json!({
                    "sameAsBilling": false,
                    "billingAddress": { "line1": "1 Union Avenue", "city": "Harare", "suburb": "CBD" }
                }),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let (order, _) = &repo.orders()[0];
        assert_eq!(order.billing_address.line1, "1 Union Avenue");
        assert_eq!(order.shipping_address.line1, "4 Lomagundi Road");
    }

    #[actix_web::test]
    async fn empty_cart_is_a_client_error() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(body(json!([]), json!({})))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], "cart is empty");
        assert!(repo.orders().is_empty());
    }

    #[actix_web::test]
    async fn non_numeric_price_is_a_client_error() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(body(
                json!([{ "productId": "p1", "price": "cheap", "quantity": 1 }]),
                json!({}),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn malformed_json_is_a_client_error() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(json!({ "items": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn stale_price_is_a_conflict() {
        let repo = InMemoryOrderRepository::default();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(body(
                json!([{ "productId": "p1", "price": 90, "quantity": 1 }]),
                json!({}),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert!(repo.orders().is_empty());
    }

    #[actix_web::test]
    async fn storage_failure_hides_the_cause() {
        let repo = InMemoryOrderRepository::failing();
        let app = app!(&repo);

        let req = test::TestRequest::post()
            .uri("/checkout")
            .set_json(body(
                json!([{ "productId": "p1", "price": 100, "quantity": 1 }]),
                json!({}),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err, json!({ "error": "Internal server error" }));
    }
}
