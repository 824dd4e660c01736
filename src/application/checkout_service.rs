use uuid::Uuid;

use crate::domain::address::OrderAddress;
use crate::domain::checkout::{BillingChoice, CheckoutLine, CheckoutSubmission};
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, NewOrderItem, OrderStatus, PlacedOrder};
use crate::domain::order_number::{OrderNumberGenerator, TimestampOrderNumbers};
use crate::domain::payment::{payment_instructions, payment_reference};
use crate::domain::ports::{OrderRepository, PriceCatalog};
use crate::domain::pricing::{line_total, OrderTotals};

/// How many fresh order numbers to try before giving up on a collision.
pub const MAX_ORDER_NUMBER_ATTEMPTS: u32 = 3;

pub struct CheckoutService<R, C> {
    repo: R,
    catalog: C,
    numbers: Box<dyn OrderNumberGenerator>,
}

impl<R: OrderRepository, C: PriceCatalog> CheckoutService<R, C> {
    pub fn new(repo: R, catalog: C) -> Self {
        Self::with_order_numbers(repo, catalog, Box::new(TimestampOrderNumbers))
    }

    pub fn with_order_numbers(
        repo: R,
        catalog: C,
        numbers: Box<dyn OrderNumberGenerator>,
    ) -> Self {
        Self {
            repo,
            catalog,
            numbers,
        }
    }

    /// Turn a checkout submission into a persisted `PENDING` order.
    ///
    /// The submission is validated and its prices checked against the catalog
    /// before anything is written. The order and its items are stored in one
    /// atomic repository call, so a failure never leaves an order without items.
    pub fn place_order(&self, submission: CheckoutSubmission) -> Result<PlacedOrder, DomainError> {
        submission.validate()?;
        self.verify_prices(&submission.lines)?;

        let totals = OrderTotals::compute(&submission.lines);
        let shipping_address =
            OrderAddress::normalize(&submission.customer, &submission.delivery_address);
        let billing_address = match &submission.billing {
            BillingChoice::SameAsShipping => shipping_address.clone(),
            BillingChoice::Separate(address) => {
                OrderAddress::normalize(&submission.customer, address)
            }
        };
        let method = submission.payment.method;

        let mut attempt = 1;
        loop {
            let order_id = Uuid::new_v4();
            let order_number = self.numbers.next_order_number();
            let order = NewOrder {
                id: order_id,
                order_number: order_number.clone(),
                user_id: submission.user_id.clone(),
                email: submission.customer.email.trim().to_string(),
                phone: submission.customer.phone.trim().to_string(),
                status: OrderStatus::Pending,
                totals: totals.clone(),
                shipping_address: shipping_address.clone(),
                billing_address: billing_address.clone(),
                payment_intent_id: payment_reference(method, &order_number),
                payment_method: method,
            };

            match self.repo.create(order, order_items(&submission.lines)) {
                Ok(()) => {
                    log::info!(
                        "Placed order {} ({}) total={} method={}",
                        order_number,
                        order_id,
                        totals.total,
                        method.as_str()
                    );
                    return Ok(PlacedOrder {
                        order_id,
                        order_number,
                        payment_instructions: payment_instructions(
                            &submission.payment,
                            &submission.customer.phone,
                        ),
                        payment_method: method,
                    });
                }
                Err(DomainError::DuplicateOrderNumber(taken))
                    if attempt < MAX_ORDER_NUMBER_ATTEMPTS =>
                {
                    log::warn!("Order number {} already taken, retrying", taken);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn verify_prices(&self, lines: &[CheckoutLine]) -> Result<(), DomainError> {
        for line in lines {
            let current = self
                .catalog
                .unit_price(&line.product_id, line.variant_id.as_deref())?
                .ok_or_else(|| DomainError::UnknownProduct(line.product_id.clone()))?;

            if current != line.unit_price {
                log::warn!(
                    "Stale price for {}: submitted {}, catalog {}",
                    line.product_id,
                    line.unit_price,
                    current
                );
                return Err(DomainError::PriceChanged {
                    product_id: line.product_id.clone(),
                    submitted: line.unit_price.clone(),
                    current,
                });
            }
        }
        Ok(())
    }
}

fn order_items(lines: &[CheckoutLine]) -> Vec<NewOrderItem> {
    lines
        .iter()
        .map(|l| NewOrderItem {
            id: Uuid::new_v4(),
            product_id: l.product_id.clone(),
            variant_id: l.variant_id.clone(),
            quantity: l.quantity,
            price: l.unit_price.clone(),
            total: line_total(&l.unit_price, l.quantity),
        })
        .collect()
}
