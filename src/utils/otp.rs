//! One-time code generation.

use rand::Rng;

use crate::config::OTP_CODE_DIGITS;

/// Generate a zero-padded numeric OTP code.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    let max = 10u32.pow(OTP_CODE_DIGITS);
    format!(
        "{:0width$}",
        rng.gen_range(0..max),
        width = OTP_CODE_DIGITS as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_fixed_width_digits() {
        for _ in 0..100 {
            let code = generate_otp();
            assert_eq!(code.len(), OTP_CODE_DIGITS as usize);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
