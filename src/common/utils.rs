//! Utility functions for tuplespaces

use std::time::Duration;

/// Is `s` a tuple or search pattern (`<...>`)?
pub fn is_tuple_or_pattern(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('<') && s.ends_with('>')
}

/// Validate a tuple or search pattern argument
pub fn validate_tuple(s: &str) -> crate::Result<()> {
    if !is_tuple_or_pattern(s) {
        return Err(crate::Error::InvalidArgument(format!(
            "'{}' is not a tuple or search pattern (expected <...>)",
            s
        )));
    }
    Ok(())
}

/// Parse a delay given in (possibly fractional) seconds
pub fn parse_seconds(s: &str) -> crate::Result<Duration> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| crate::Error::InvalidArgument(format!("invalid number of seconds: {}", s)))?;

    Duration::try_from_secs_f64(secs)
        .map_err(|_| crate::Error::InvalidArgument(format!("invalid number of seconds: {}", s)))
}

/// Turn a registered address (`host:port` or URL) into a base URL
pub fn endpoint_url(address: &str) -> String {
    let address = address.trim_end_matches('/');
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

/// Random positive client identifier
pub fn random_client_id() -> u32 {
    let (high, _) = uuid::Uuid::new_v4().as_u64_pair();
    (high as u32) & (i32::MAX as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_validation() {
        assert!(is_tuple_or_pattern("<a,1>"));
        assert!(is_tuple_or_pattern("<a,*>"));
        assert!(is_tuple_or_pattern("<>"));
        assert!(!is_tuple_or_pattern("abc"));
        assert!(!is_tuple_or_pattern("<abc"));
        assert!(!is_tuple_or_pattern("abc>"));
        assert!(!is_tuple_or_pattern(">"));
        assert!(!is_tuple_or_pattern(""));

        assert!(validate_tuple("<a>").is_ok());
        assert!(matches!(
            validate_tuple("abc"),
            Err(crate::Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("2").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_seconds("0.5").unwrap(), Duration::from_millis(500));
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(endpoint_url("localhost:2001"), "http://localhost:2001");
        assert_eq!(endpoint_url("http://10.0.0.1:2001/"), "http://10.0.0.1:2001");
        assert_eq!(endpoint_url("https://replica"), "https://replica");
    }

    #[test]
    fn test_random_client_id_is_positive() {
        for _ in 0..32 {
            assert!(random_client_id() <= i32::MAX as u32);
        }
    }
}
