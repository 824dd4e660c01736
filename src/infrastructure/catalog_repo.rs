use bigdecimal::BigDecimal;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::PriceCatalog;
use crate::schema::{product_variants, products};

/// Reads sale prices from the product tables maintained by the admin side.
pub struct DieselPriceCatalog {
    pool: DbPool,
}

impl DieselPriceCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PriceCatalog for DieselPriceCatalog {
    fn unit_price(
        &self,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> Result<Option<BigDecimal>, DomainError> {
        let mut conn = self.pool.get()?;

        let base_price: Option<BigDecimal> = products::table
            .filter(products::id.eq(product_id))
            .filter(products::active.eq(true))
            .select(products::price)
            .first(&mut conn)
            .optional()?;

        let Some(base_price) = base_price else {
            return Ok(None);
        };
        let Some(variant_id) = variant_id else {
            return Ok(Some(base_price));
        };

        let variant_price: Option<Option<BigDecimal>> = product_variants::table
            .filter(product_variants::id.eq(variant_id))
            .filter(product_variants::product_id.eq(product_id))
            .select(product_variants::price)
            .first(&mut conn)
            .optional()?;

        Ok(variant_price.map(|price| price.unwrap_or(base_price)))
    }
}
