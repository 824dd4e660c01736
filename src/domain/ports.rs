use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{ListResult, NewOrder, NewOrderItem, OrderView};

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist an order and all of its items atomically: either every row is
    /// written or none is.
    fn create(&self, order: NewOrder, items: Vec<NewOrderItem>) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn find_by_number(&self, order_number: &str) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
}

pub trait PriceCatalog: Send + Sync + 'static {
    /// Current unit price of a product (or one of its variants). `None` when
    /// the product, or the variant under that product, is not for sale.
    fn unit_price(
        &self,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> Result<Option<BigDecimal>, DomainError>;
}

impl<R: OrderRepository + ?Sized> OrderRepository for Arc<R> {
    fn create(&self, order: NewOrder, items: Vec<NewOrderItem>) -> Result<(), DomainError> {
        (**self).create(order, items)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        (**self).find_by_id(id)
    }

    fn find_by_number(&self, order_number: &str) -> Result<Option<OrderView>, DomainError> {
        (**self).find_by_number(order_number)
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        (**self).list(page, limit)
    }
}

impl<C: PriceCatalog + ?Sized> PriceCatalog for Arc<C> {
    fn unit_price(
        &self,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> Result<Option<BigDecimal>, DomainError> {
        (**self).unit_price(product_id, variant_id)
    }
}
