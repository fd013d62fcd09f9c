pub mod activity;
pub mod auth;
pub mod city;
pub mod hotel;
pub mod restaurant;
pub mod share;
pub mod stop;
pub mod transport;
pub mod trip;
pub mod wizard;

/// Page-size sanitizer for list endpoints. Zero and absent both mean the
/// default; MongoDB reads a literal limit of 0 as "unlimited".
pub(crate) fn clamp_limit(requested: Option<u32>, default: i64, max: i64) -> i64 {
    match requested {
        Some(limit) if limit > 0 => (limit as i64).min(max),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_defaults_absent_and_zero() {
        assert_eq!(clamp_limit(None, 50, 100), 50);
        assert_eq!(clamp_limit(Some(0), 50, 100), 50);
    }

    #[test]
    fn test_clamp_limit_caps_at_max() {
        assert_eq!(clamp_limit(Some(3), 50, 100), 3);
        assert_eq!(clamp_limit(Some(100), 50, 100), 100);
        assert_eq!(clamp_limit(Some(5000), 50, 100), 100);
    }
}
