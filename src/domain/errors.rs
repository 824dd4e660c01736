use bigdecimal::BigDecimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Product {0} is not available")]
    UnknownProduct(String),
    #[error("Price of {product_id} changed from {submitted} to {current}")]
    PriceChanged {
        product_id: String,
        submitted: BigDecimal,
        current: BigDecimal,
    },
    #[error("Order number {0} is already taken")]
    DuplicateOrderNumber(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
