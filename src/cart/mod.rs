//! The shopper's cart: line items merged by product and variant, kept in a
//! per-session store that survives restarts through a `CartStorage` backend.

pub mod line_item;
pub mod storage;
pub mod store;

pub use line_item::{line_item_id, LineItem, NewLineItem, VariantDescriptor, DEFAULT_VARIANT};
pub use storage::{CartStorage, CartStorageError, FileCartStorage, MemoryCartStorage};
pub use store::{CartSnapshot, CartState, CartStore, CART_STORAGE_KEY, MAX_LINE_QUANTITY};
