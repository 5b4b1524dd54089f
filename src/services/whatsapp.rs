//! `wa.me` deep links for ordering and contact.

use crate::constants::messages;
use serde::Serialize;

const BASE_URL: &str = "https://wa.me/";

/// Keeps only the digits of a phone number, dropping `+`, spaces and dashes.
#[must_use]
pub fn normalize_number(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// Order message for a named product.
#[must_use]
pub fn product_message(product_name: &str) -> String {
    format!("{} {}", messages::PRODUCT_ORDER_PREFIX, product_name.trim())
}

/// Builds a WhatsApp link.
///
/// An explicit `custom_message` wins over the product message, which wins
/// over the generic inquiry. Blank strings count as absent.
///
/// ```
/// use claystore::services::whatsapp;
///
/// let link = whatsapp::build("+966 50 000 0000", None, Some("hi"));
/// assert_eq!(link, "https://wa.me/966500000000?text=hi");
/// ```
#[must_use]
pub fn build(number: &str, product_name: Option<&str>, custom_message: Option<&str>) -> String {
    let message = match (
        custom_message.filter(|m| !m.trim().is_empty()),
        product_name.filter(|n| !n.trim().is_empty()),
    ) {
        (Some(custom), _) => custom.to_string(),
        (None, Some(name)) => product_message(name),
        (None, None) => messages::GENERIC_INQUIRY.to_string(),
    };

    format!(
        "{BASE_URL}{}?text={}",
        normalize_number(number),
        urlencoding::encode(&message)
    )
}

/// Picks the number from site settings, falling back to the configured one.
#[must_use]
pub fn resolve_number<'a>(settings_number: Option<&'a str>, fallback: &'a str) -> &'a str {
    settings_number
        .filter(|n| n.chars().any(|c| c.is_ascii_digit()))
        .unwrap_or(fallback)
}

/// Prefilled links used across the public pages.
#[derive(Debug, Clone, Serialize)]
pub struct PageLinks {
    pub contact: String,
    pub custom_order: String,
    pub review_invitation: String,
}

impl PageLinks {
    #[must_use]
    pub fn for_number(number: &str) -> Self {
        Self {
            contact: build(number, None, None),
            custom_order: build(number, None, Some(messages::CUSTOM_ORDER)),
            review_invitation: build(number, None, Some(messages::REVIEW_INVITATION)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded_text(link: &str) -> String {
        let (_, text) = link.split_once("?text=").unwrap();
        urlencoding::decode(text).unwrap().into_owned()
    }

    #[test]
    fn product_name_produces_order_message() {
        let link = build("966500000000", Some("مزهرية"), None);
        assert!(link.starts_with("https://wa.me/966500000000?text="));
        assert_eq!(decoded_text(&link), "مرحباً، أرغب في طلب منتج مزهرية");
    }

    #[test]
    fn no_arguments_fall_back_to_inquiry() {
        let link = build("966500000000", None, None);
        assert_eq!(decoded_text(&link), messages::GENERIC_INQUIRY);
    }

    #[test]
    fn custom_message_always_wins() {
        let link = build("966500000000", Some("مزهرية"), Some("custom text"));
        assert_eq!(decoded_text(&link), "custom text");
    }

    #[test]
    fn blank_inputs_are_ignored() {
        let link = build("966500000000", Some("  "), Some(""));
        assert_eq!(decoded_text(&link), messages::GENERIC_INQUIRY);
    }

    #[test]
    fn message_is_percent_encoded() {
        let link = build("1", None, Some("a b&c"));
        assert_eq!(link, "https://wa.me/1?text=a%20b%26c");
        let arabic = build("1", Some("كوب"), None);
        assert!(arabic.is_ascii());
    }

    #[test]
    fn number_is_reduced_to_digits() {
        assert_eq!(normalize_number("+20 (100) 123-4567"), "201001234567");
    }

    #[test]
    fn settings_number_overrides_fallback() {
        assert_eq!(resolve_number(Some("+1 555"), "999"), "+1 555");
        assert_eq!(resolve_number(Some("  "), "999"), "999");
        assert_eq!(resolve_number(None, "999"), "999");
    }

    #[test]
    fn page_links_carry_their_templates() {
        let links = PageLinks::for_number("966500000000");
        assert_eq!(decoded_text(&links.custom_order), messages::CUSTOM_ORDER);
        assert_eq!(
            decoded_text(&links.review_invitation),
            messages::REVIEW_INVITATION
        );
        assert_eq!(decoded_text(&links.contact), messages::GENERIC_INQUIRY);
    }
}
