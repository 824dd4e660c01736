use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::{order_items, orders};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
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
    pub shipping_address: Value,
    pub billing_address: Value,
    pub payment_intent_id: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
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
    pub shipping_address: Value,
    pub billing_address: Value,
    pub payment_intent_id: String,
    pub payment_method: String,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i32,
    pub price: BigDecimal,
    pub total: BigDecimal,
}
