//! Country code lookup for location labels

/// Full country name for an ISO code, or the code itself when unknown
pub fn country_name(code: &str) -> &str {
    match code.to_ascii_uppercase().as_str() {
        "DE" => "Germany",
        "FI" => "Finland",
        "US" => "United States",
        "SG" => "Singapore",
        _ => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_codes() {
        assert_eq!(country_name("DE"), "Germany");
        assert_eq!(country_name("fi"), "Finland");
        assert_eq!(country_name("XX"), "XX");
    }
}
