//! Payment card domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCard {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Raw card number as supplied. Never serialized into an API
    /// response; the route layer only ever exposes [`Self::masked_number`].
    #[serde(skip_serializing, default)]
    pub card_number: String,
    pub cardholder_name: String,
    /// `MM/YY`.
    pub expiry_date: String,
    /// Declared brand: Visa, Mastercard, ...
    pub card_type: String,
    /// Exactly one card per user holds this flag (while the user has
    /// any cards at all).
    pub is_default: bool,
    /// Derived from the card number at creation, immutable thereafter.
    pub last_four_digits: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentCard {
    /// Display form every API response uses: `**** **** **** 1234`.
    pub fn masked_number(&self) -> String {
        format!("**** **** **** {}", self.last_four_digits)
    }
}

/// The trailing four characters of a card number, for deriving
/// `last_four_digits` at creation time.
pub fn last_four(card_number: &str) -> String {
    let chars: Vec<char> = card_number.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentCard {
    pub user_id: Uuid,
    pub card_number: String,
    pub cardholder_name: String,
    pub expiry_date: String,
    pub card_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_four_of_full_number() {
        assert_eq!(last_four("4242424242424242"), "4242");
    }

    #[test]
    fn last_four_of_short_input() {
        assert_eq!(last_four("42"), "42");
    }

    #[test]
    fn masked_number_shape() {
        let card = PaymentCard {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            card_number: "4242424242424242".into(),
            cardholder_name: "A. Investor".into(),
            expiry_date: "12/27".into(),
            card_type: "Visa".into(),
            is_default: true,
            last_four_digits: "4242".into(),
            created_at: chrono::Utc::now(),
        };
        assert_eq!(card.masked_number(), "**** **** **** 4242");
    }

    #[test]
    fn raw_number_is_never_serialized() {
        let card = PaymentCard {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            card_number: "4242424242424242".into(),
            cardholder_name: "A. Investor".into(),
            expiry_date: "12/27".into(),
            card_type: "Visa".into(),
            is_default: false,
            last_four_digits: "4242".into(),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&card).unwrap();
        assert!(!json.contains("4242424242424242"));
    }
}
