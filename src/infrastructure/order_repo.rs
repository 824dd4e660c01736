use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::address::OrderAddress;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    ListResult, NewOrder, NewOrderItem, OrderItemView, OrderView,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

const ORDER_NUMBER_CONSTRAINT: &str = "orders_order_number_key";

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(format!("Malformed stored address: {e}"))
    }
}

fn order_insert_error(order_number: &str, e: diesel::result::Error) -> DomainError {
    match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(ORDER_NUMBER_CONSTRAINT) =>
        {
            DomainError::DuplicateOrderNumber(order_number.to_string())
        }
        other => other.into(),
    }
}

// ── Row mapping ──────────────────────────────────────────────────────────────

fn to_view(order: OrderRow, items: Vec<OrderItemRow>) -> Result<OrderView, DomainError> {
    let shipping_address: OrderAddress = serde_json::from_value(order.shipping_address)?;
    let billing_address: OrderAddress = serde_json::from_value(order.billing_address)?;

    Ok(OrderView {
        id: order.id,
        order_number: order.order_number,
        user_id: order.user_id,
        email: order.email,
        phone: order.phone,
        status: order.status,
        subtotal: order.subtotal,
        tax: order.tax,
        shipping: order.shipping,
        discount: order.discount,
        total: order.total,
        shipping_address,
        billing_address,
        payment_intent_id: order.payment_intent_id,
        payment_method: order.payment_method,
        created_at: order.created_at,
        items: items
            .into_iter()
            .map(|i| OrderItemView {
                id: i.id,
                product_id: i.product_id,
                variant_id: i.variant_id,
                quantity: i.quantity,
                price: i.price,
                total: i.total,
            })
            .collect(),
    })
}

fn with_items(conn: &mut PgConnection, order: OrderRow) -> Result<OrderView, DomainError> {
    let items = OrderItemRow::belonging_to(&order)
        .select(OrderItemRow::as_select())
        .load(conn)?;
    to_view(order, items)
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder, items: Vec<NewOrderItem>) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let order_row = NewOrderRow {
            id: order.id,
            order_number: order.order_number.clone(),
            user_id: order.user_id,
            email: order.email,
            phone: order.phone,
            status: order.status.as_str().to_string(),
            subtotal: order.totals.subtotal,
            tax: order.totals.tax,
            shipping: order.totals.shipping,
            discount: order.totals.discount,
            total: order.totals.total,
            shipping_address: serde_json::to_value(&order.shipping_address)?,
            billing_address: serde_json::to_value(&order.billing_address)?,
            payment_intent_id: order.payment_intent_id,
            payment_method: order.payment_method.as_str().to_string(),
        };
        let item_rows: Vec<NewOrderItemRow> = items
            .into_iter()
            .map(|i| NewOrderItemRow {
                id: i.id,
                order_id: order.id,
                product_id: i.product_id,
                variant_id: i.variant_id,
                quantity: i.quantity,
                price: i.price,
                total: i.total,
            })
            .collect();

        // The order row goes in first so the items can reference it; both
        // commit together or not at all.
        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(orders::table)
                .values(&order_row)
                .execute(conn)
                .map_err(|e| order_insert_error(&order.order_number, e))?;

            diesel::insert_into(order_items::table)
                .values(&item_rows)
                .execute(conn)?;

            Ok(())
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        order.map(|o| with_items(&mut conn, o)).transpose()
    }

    fn find_by_number(&self, order_number: &str) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::order_number.eq(order_number))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        order.map(|o| with_items(&mut conn, o)).transpose()
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(|o| to_view(o, vec![]))
                    .collect::<Result<_, _>>()?,
                total,
            })
        })
    }
}
