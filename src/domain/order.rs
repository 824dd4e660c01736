use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::address::OrderAddress;
use super::payment::PaymentMethod;
use super::pricing::OrderTotals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
        }
    }
}

/// Everything needed to insert one order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Option<String>,
    pub email: String,
    pub phone: String,
    pub status: OrderStatus,
    pub totals: OrderTotals,
    pub shipping_address: OrderAddress,
    pub billing_address: OrderAddress,
    pub payment_intent_id: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub id: Uuid,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}

/// What the shopper gets back after a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub order_number: String,
    pub payment_instructions: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Option<String>,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
    pub shipping_address: OrderAddress,
    pub billing_address: OrderAddress,
    pub payment_intent_id: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}

/// One page of orders, with the paging values actually applied.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub items: Vec<OrderView>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
