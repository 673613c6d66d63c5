//! Utility functions and helpers.

pub mod otp;
pub mod templates;

pub use otp::generate_otp;
pub use templates::EmailTemplate;
