//! Form field checks shared by the services.
//!
//! Each returns the cleaned value or a user-facing message.

/// Trims and requires a non-empty value of at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{field} must be {max} characters or less"));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional value; blank input becomes `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, String> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(format!("{field} must be {max} characters or less"));
    }
    Ok(Some(trimmed.to_string()))
}

/// Like [`required_text`] without a length cap, for long-form text.
pub fn required_body(field: &str, value: &str) -> Result<String, String> {
    required_text(field, value, usize::MAX)
}

pub fn price(value: f64) -> Result<f64, String> {
    if !value.is_finite() || value <= 0.0 {
        return Err("Price must be greater than zero".to_string());
    }
    Ok(value)
}

/// Accepts an `http(s)` URL of bounded length; blank clears.
pub fn optional_url(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, String> {
    let Some(url) = optional_text(field, value, max)? else {
        return Ok(None);
    };
    match url::Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(Some(url)),
        _ => Err(format!("{field} must be a valid http(s) URL")),
    }
}

/// Accepts a loosely formatted email address; blank clears.
pub fn optional_email(value: Option<&str>, max: usize) -> Result<Option<String>, String> {
    let Some(email) = optional_text("Contact email", value, max)? else {
        return Ok(None);
    };
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !valid {
        return Err("Contact email is not a valid address".to_string());
    }
    Ok(Some(email))
}

/// Accepts digits with the usual separators; blank clears.
pub fn optional_phone(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, String> {
    let Some(phone) = optional_text(field, value, max)? else {
        return Ok(None);
    };
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    if !allowed || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(format!("{field} must be a phone number"));
    }
    Ok(Some(phone))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_bounds() {
        assert_eq!(required_text("Name", "  كوب  ", 10).unwrap(), "كوب");
        assert!(required_text("Name", "   ", 10).is_err());
        assert!(required_text("Name", &"a".repeat(11), 10).is_err());
        // Arabic characters count once each.
        assert!(required_text("Name", &"ك".repeat(10), 10).is_ok());
    }

    #[test]
    fn blank_optional_text_clears() {
        assert_eq!(optional_text("Category", Some(""), 50).unwrap(), None);
        assert_eq!(optional_text("Category", None, 50).unwrap(), None);
        assert_eq!(
            optional_text("Category", Some(" mugs "), 50).unwrap(),
            Some("mugs".to_string())
        );
    }

    #[test]
    fn price_must_be_positive() {
        assert!(price(12.5).is_ok());
        assert!(price(0.0).is_err());
        assert!(price(-1.0).is_err());
        assert!(price(f64::NAN).is_err());
    }

    #[test]
    fn urls_emails_and_phones() {
        assert!(optional_url("Instagram", Some("https://instagram.com/clay"), 200).is_ok());
        assert!(optional_url("Instagram", Some("javascript:alert(1)"), 200).is_err());
        assert!(optional_email(Some("shop@example.com"), 120).is_ok());
        assert!(optional_email(Some("not-an-email"), 120).is_err());
        assert!(optional_phone("Phone", Some("+966 50-000"), 20).is_ok());
        assert!(optional_phone("Phone", Some("call me"), 20).is_err());
    }
}
