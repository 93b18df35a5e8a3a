use rand::Rng;
use time::{Duration, OffsetDateTime};

// Codes expire well before the temp record's own 15-minute lifetime.
const OTP_VALIDITY: Duration = Duration::minutes(10);

/// Generates a numeric OTP of the given length plus its expiry timestamp.
pub fn generate_otp(length: usize) -> (String, OffsetDateTime) {
    let mut rng = rand::thread_rng();
    let otp: String = (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    (otp, OffsetDateTime::now_utc() + OTP_VALIDITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_has_requested_length_and_only_digits() {
        let (otp, _) = generate_otp(6);
        assert_eq!(otp.len(), 6);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn expiry_is_about_ten_minutes_out() {
        let (_, expire) = generate_otp(6);
        let delta = expire - OffsetDateTime::now_utc();
        assert!(delta > Duration::minutes(9));
        assert!(delta <= Duration::minutes(10));
    }
}
