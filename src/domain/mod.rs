pub mod address;
pub mod checkout;
pub mod errors;
pub mod order;
pub mod order_number;
pub mod payment;
pub mod ports;
pub mod pricing;
