use bigdecimal::{BigDecimal, Zero};

use super::checkout::CheckoutLine;

/// Orders with a subtotal strictly above this amount ship for free.
pub const FREE_DELIVERY_THRESHOLD: u32 = 500;
pub const FLAT_DELIVERY_FEE: u32 = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub shipping: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
}

impl OrderTotals {
    pub fn compute(lines: &[CheckoutLine]) -> Self {
        let subtotal = lines
            .iter()
            .map(|l| line_total(&l.unit_price, l.quantity))
            .fold(BigDecimal::zero(), |acc, t| acc + t);
        let shipping = delivery_fee(&subtotal);
        // Tax and discounts are not charged by this storefront.
        let tax = BigDecimal::zero();
        let discount = BigDecimal::zero();
        let total = &subtotal + &shipping + &tax - &discount;

        Self {
            subtotal,
            tax,
            shipping,
            discount,
            total,
        }
    }
}

pub fn line_total(unit_price: &BigDecimal, quantity: i32) -> BigDecimal {
    unit_price * &BigDecimal::from(quantity)
}

pub fn delivery_fee(subtotal: &BigDecimal) -> BigDecimal {
    if *subtotal > BigDecimal::from(FREE_DELIVERY_THRESHOLD) {
        BigDecimal::zero()
    } else {
        BigDecimal::from(FLAT_DELIVERY_FEE)
    }
}
