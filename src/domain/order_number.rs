use chrono::Utc;
use uuid::Uuid;

pub const ORDER_NUMBER_PREFIX: &str = "TH";
const SUFFIX_LEN: u32 = 5;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub trait OrderNumberGenerator: Send + Sync + 'static {
    fn next_order_number(&self) -> String;
}

/// `TH-<base36 millis>-<5 random base36 chars>`, upper-cased.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampOrderNumbers;

impl OrderNumberGenerator for TimestampOrderNumbers {
    fn next_order_number(&self) -> String {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let random = Uuid::new_v4().as_u128() % 36u128.pow(SUFFIX_LEN);
        format_order_number(millis, random)
    }
}

pub fn format_order_number(millis: u64, random: u128) -> String {
    let suffix = format!("{:0>width$}", to_base36(random), width = SUFFIX_LEN as usize);
    format!("{ORDER_NUMBER_PREFIX}-{}-{}", to_base36(millis.into()), suffix).to_uppercase()
}

pub fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
