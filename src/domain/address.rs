use serde::{Deserialize, Serialize};

use super::checkout::{Customer, PostalAddress};

pub const DEFAULT_CITY: &str = "Harare";
pub const COUNTRY: &str = "Zimbabwe";

/// Address shape stored on orders, for both shipping and billing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl OrderAddress {
    pub fn normalize(customer: &Customer, address: &PostalAddress) -> Self {
        let city = address
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY);

        Self {
            name: customer.full_name(),
            line1: address.line1.trim().to_string(),
            line2: address.line2.as_deref().unwrap_or_default().trim().to_string(),
            city: city.to_string(),
            state: address.suburb.trim().to_string(),
            country: COUNTRY.to_string(),
            postal_code: String::new(),
        }
    }
}
