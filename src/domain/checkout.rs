use bigdecimal::{BigDecimal, Zero};

use super::errors::DomainError;
use super::payment::PaymentMethod;
use super::pricing::OrderTotals;

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_LINE: i32 = 9999;

/// Order amounts are stored as `NUMERIC(12, 2)`; totals must stay below 10^10.
const MAX_ORDER_AMOUNT: i64 = 10_000_000_000;

/// One submitted cart line. The price is the unit price the shopper saw.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutLine {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub unit_price: BigDecimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostalAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub suburb: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillingChoice {
    SameAsShipping,
    Separate(PostalAddress),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSelection {
    pub method: PaymentMethod,
    pub ecocash_number: Option<String>,
    pub innbucks_number: Option<String>,
}

/// A complete checkout submission, after decoding at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSubmission {
    pub user_id: Option<String>,
    pub customer: Customer,
    pub delivery_address: PostalAddress,
    pub billing: BillingChoice,
    pub payment: PaymentSelection,
    pub lines: Vec<CheckoutLine>,
}

impl CheckoutSubmission {
    /// Reject submissions that must never reach pricing or persistence.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lines.is_empty() {
            return Err(invalid("cart is empty"));
        }
        for line in &self.lines {
            if line.product_id.trim().is_empty() {
                return Err(invalid("productId is required"));
            }
            if line.quantity < 1 {
                return Err(invalid(format!(
                    "quantity for {} must be at least 1",
                    line.product_id
                )));
            }
            if line.quantity > MAX_QUANTITY_PER_LINE {
                return Err(invalid(format!(
                    "quantity for {} must be at most {}",
                    line.product_id, MAX_QUANTITY_PER_LINE
                )));
            }
            if line.unit_price < BigDecimal::zero() {
                return Err(invalid(format!(
                    "price for {} must not be negative",
                    line.product_id
                )));
            }
        }
        if OrderTotals::compute(&self.lines).total >= BigDecimal::from(MAX_ORDER_AMOUNT) {
            return Err(invalid("order total is too large"));
        }

        require(&self.customer.first_name, "firstName")?;
        require(&self.customer.last_name, "lastName")?;
        require(&self.customer.phone, "phone")?;
        if !looks_like_email(&self.customer.email) {
            return Err(invalid("email is not valid"));
        }

        validate_address(&self.delivery_address, "deliveryAddress")?;
        if let BillingChoice::Separate(address) = &self.billing {
            validate_address(address, "billingAddress")?;
        }
        Ok(())
    }
}

fn validate_address(address: &PostalAddress, field: &str) -> Result<(), DomainError> {
    require(&address.line1, &format!("{field}.line1"))?;
    require(&address.suburb, &format!("{field}.suburb"))
}

fn require(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(invalid(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

fn invalid(msg: impl Into<String>) -> DomainError {
    DomainError::InvalidInput(msg.into())
}


#[cfg(test)]
mod tests {
    use super::fixtures::{line, submission};
    use super::*;

    #[test]
    fn valid_submission_passes() {
        assert!(submission(vec![line("p1", "100", 2)]).validate().is_ok());
    }

    #[test]
    fn empty_cart_is_rejected() {
        let err = submission(vec![]).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg == "cart is empty"));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = submission(vec![line("p1", "100", 0)]).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn quantity_above_line_limit_is_rejected() {
        assert!(submission(vec![line("p1", "100", MAX_QUANTITY_PER_LINE)])
            .validate()
            .is_ok());

        let err = submission(vec![line("p1", "100", MAX_QUANTITY_PER_LINE + 1)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg.contains("at most 9999")));
    }

    #[test]
    fn total_beyond_storable_amount_is_rejected() {
        let err = submission(vec![
            line("p1", "2000000", MAX_QUANTITY_PER_LINE),
            line("p2", "1", 1),
        ])
        .validate()
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg == "order total is too large"));

        assert!(submission(vec![line("p1", "999999", 9999)]).validate().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = submission(vec![line("p1", "-1", 1)]).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn blank_product_id_is_rejected() {
        let err = submission(vec![line("  ", "10", 1)]).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["", "rudo", "rudo@", "@example.com", "rudo@example"] {
            let mut s = submission(vec![line("p1", "10", 1)]);
            s.customer.email = email.to_string();
            assert!(s.validate().is_err(), "{email:?} should be rejected");
        }
    }

    #[test]
    fn missing_suburb_is_rejected() {
        let mut s = submission(vec![line("p1", "10", 1)]);
        s.delivery_address.suburb = String::new();
        let err = s.validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg.contains("suburb")));
    }

    #[test]
    fn separate_billing_address_is_validated() {
        let mut s = submission(vec![line("p1", "10", 1)]);
        s.billing = BillingChoice::Separate(PostalAddress {
            line1: String::new(),
            line2: None,
            city: None,
            suburb: "Borrowdale".to_string(),
        });
        let err = s.validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg.starts_with("billingAddress")));
    }

    #[test]
    fn full_name_trims_parts() {
        let s = submission(vec![]);
        assert_eq!(s.customer.full_name(), "Rudo Moyo");
    }
}
