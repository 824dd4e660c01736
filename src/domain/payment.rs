//! Payment method selection and the instructions shown after checkout.
//!
//! No payment provider is called from here: a method only decides which
//! instruction text the shopper sees and how the payment reference is built.

use super::checkout::PaymentSelection;

pub const STORE_ADDRESS: &str = "TH Hair Studio, Shop 14, Eastgate Mall, Robert Mugabe Road, Harare";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    EcoCash,
    InnBucks,
    #[default]
    Cash,
}

impl PaymentMethod {
    /// Resolve a submitted method tag. Missing or unknown tags fall back to cash.
    pub fn resolve(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("ecocash") => PaymentMethod::EcoCash,
            Some("innbucks") => PaymentMethod::InnBucks,
            _ => PaymentMethod::Cash,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::EcoCash => "ecocash",
            PaymentMethod::InnBucks => "innbucks",
            PaymentMethod::Cash => "cash",
        }
    }
}

/// Build the instruction text for a selection, falling back to the contact
/// phone when no wallet number was given.
pub fn payment_instructions(selection: &PaymentSelection, phone: &str) -> String {
    match selection.method {
        PaymentMethod::EcoCash => format!(
            "An EcoCash payment prompt has been sent to {}. Enter your PIN on your phone to complete the payment.",
            wallet_number(selection.ecocash_number.as_deref(), phone)
        ),
        PaymentMethod::InnBucks => format!(
            "An InnBucks payment prompt has been sent to {}. Approve the payment in your InnBucks app to complete the order.",
            wallet_number(selection.innbucks_number.as_deref(), phone)
        ),
        PaymentMethod::Cash => format!(
            "Please pay in cash when you collect or receive your order. Our store is at {STORE_ADDRESS}."
        ),
    }
}

/// Reference stored in place of a provider payment intent.
pub fn payment_reference(method: PaymentMethod, order_number: &str) -> String {
    format!("{}_{}", method.as_str(), order_number)
}

fn wallet_number<'a>(wallet: Option<&'a str>, phone: &'a str) -> &'a str {
    wallet
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| phone.trim())
}
