use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use super::line_item::{line_item_id, LineItem, NewLineItem};
use super::storage::CartStorage;
use crate::domain::checkout::{CheckoutLine, MAX_QUANTITY_PER_LINE};

/// Upper bound for a cart line's quantity, matching what checkout accepts.
pub const MAX_LINE_QUANTITY: u32 = MAX_QUANTITY_PER_LINE as u32;

/// Storage key the cart state is saved under.
pub const CART_STORAGE_KEY: &str = "th-cart-storage";

/// Everything that is persisted for a cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub is_open: bool,
}

/// Read-only copy of the cart's items, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
}

impl CartSnapshot {
    /// The lines a checkout submission is built from.
    pub fn checkout_lines(&self) -> Vec<CheckoutLine> {
        self.items
            .iter()
            .map(|item| CheckoutLine {
                product_id: item.product_id.clone(),
                variant_id: item.variant_id.clone(),
                unit_price: item.price.clone(),
                quantity: i32::try_from(item.quantity).unwrap_or(MAX_QUANTITY_PER_LINE),
            })
            .collect()
    }
}

/// One shopper session's cart.
///
/// Every mutation is applied and saved while holding the store's lock, so
/// concurrent callers never lose each other's updates and the saved state
/// always matches the last completed mutation.
pub struct CartStore {
    key: String,
    storage: Arc<dyn CartStorage>,
    state: Mutex<CartState>,
}

impl CartStore {
    pub fn open(storage: Arc<dyn CartStorage>) -> Self {
        Self::open_with_key(storage, CART_STORAGE_KEY)
    }

    /// Open the cart saved under `key`. Missing or unreadable state gives an
    /// empty cart.
    pub fn open_with_key(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = rehydrate(storage.as_ref(), &key);
        Self {
            key,
            storage,
            state: Mutex::new(state),
        }
    }

    pub fn add_item(&self, item: NewLineItem) -> LineItem {
        let id = line_item_id(&item.product_id, item.variant_id.as_deref());
        self.mutate(|state| {
            if let Some(existing) = state.items.iter_mut().find(|i| i.id == id) {
                existing.quantity = (existing.quantity + 1).min(MAX_LINE_QUANTITY);
                return existing.clone();
            }
            let created = LineItem::from_new(item);
            state.items.push(created.clone());
            created
        })
    }

    pub fn remove_item(&self, id: &str) {
        self.mutate(|state| state.items.retain(|i| i.id != id));
    }

    /// Set the quantity exactly. Zero or less removes the item; values above
    /// [`MAX_LINE_QUANTITY`] are capped.
    pub fn update_quantity(&self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        if quantity > i64::from(MAX_LINE_QUANTITY) {
            log::warn!(
                "Capping quantity {} for cart item '{}' at {}",
                quantity,
                id,
                MAX_LINE_QUANTITY
            );
        }
        let quantity = u32::try_from(quantity)
            .unwrap_or(MAX_LINE_QUANTITY)
            .min(MAX_LINE_QUANTITY);
        self.mutate(|state| {
            if let Some(item) = state.items.iter_mut().find(|i| i.id == id) {
                item.quantity = quantity;
            }
        });
    }

    pub fn clear_cart(&self) {
        self.mutate(|state| state.items.clear());
    }

    pub fn open_cart(&self) {
        self.mutate(|state| state.is_open = true);
    }

    pub fn close_cart(&self) {
        self.mutate(|state| state.is_open = false);
    }

    pub fn toggle_cart(&self) {
        self.mutate(|state| state.is_open = !state.is_open);
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open
    }

    pub fn items(&self) -> Vec<LineItem> {
        self.lock().items.clone()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items(),
        }
    }

    pub fn total_price(&self) -> BigDecimal {
        self.lock()
            .items
            .iter()
            .map(LineItem::line_total)
            .fold(BigDecimal::zero(), |acc, t| acc + t)
    }

    /// Number of units in the cart, not number of lines.
    pub fn total_items(&self) -> u64 {
        self.lock().items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut CartState) -> T) -> T {
        let mut state = self.lock();
        let out = f(&mut state);
        self.persist(&state);
        out
    }

    fn persist(&self, state: &CartState) {
        let result = serde_json::to_string(state)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .write(&self.key, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            log::warn!("Failed to save cart '{}': {}", self.key, e);
        }
    }
}

fn rehydrate(storage: &dyn CartStorage, key: &str) -> CartState {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CartState::default(),
        Err(e) => {
            log::warn!("Failed to read cart '{}', starting empty: {}", key, e);
            return CartState::default();
        }
    };

    match serde_json::from_str::<CartState>(&raw) {
        Ok(mut state) => {
            state.items.retain(|i| i.quantity >= 1);
            for item in &mut state.items {
                item.quantity = item.quantity.min(MAX_LINE_QUANTITY);
            }
            state
        }
        Err(e) => {
            log::warn!("Discarding malformed cart '{}': {}", key, e);
            CartState::default()
        }
    }
}
