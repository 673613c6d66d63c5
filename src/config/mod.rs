//! Application configuration module
//!
//! Environment-driven settings plus the platform-wide constants
//! (OTP windows, pagination caps, role names, cache key prefixes).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
