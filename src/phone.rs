//! Brazilian phone number normalization.

/// Normalize a raw phone string into the canonical form the gateway expects:
/// digits only, prefixed with the country code `55`.
///
/// The function is total. Input that cannot be brought into canonical form is
/// returned digits-only, unchanged; the send may still fail downstream, but a
/// single bad contact never aborts a batch.
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.starts_with("55") {
        return digits;
    }

    if let Some(rest) = digits.strip_prefix('0') {
        return format!("55{rest}");
    }

    // DDD + number (11 digits with the mobile 9, 10 without).
    if digits.len() == 11 || digits.len() == 10 {
        return format!("55{digits}");
    }

    digits
}
