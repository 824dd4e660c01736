use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Stand-in variant for products sold without variants.
pub const DEFAULT_VARIANT: &str = "default";

/// Display labels of the chosen variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<String>,
}

/// A product selection as offered to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub name: String,
    pub price: BigDecimal,
    pub image: String,
    pub variant: Option<VariantDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub name: String,
    pub price: BigDecimal,
    pub image: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantDescriptor>,
}

impl LineItem {
    pub(crate) fn from_new(item: NewLineItem) -> Self {
        Self {
            id: line_item_id(&item.product_id, item.variant_id.as_deref()),
            product_id: item.product_id,
            variant_id: item.variant_id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: 1,
            variant: item.variant,
        }
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.price * &BigDecimal::from(self.quantity)
    }
}

/// `<productId>-<variantId>`, with `default` standing in for a missing variant.
pub fn line_item_id(product_id: &str, variant_id: Option<&str>) -> String {
    format!("{}-{}", product_id, variant_id.unwrap_or(DEFAULT_VARIANT))
}
