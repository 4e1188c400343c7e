//! Outbound channels. Only SMTP exists today.

pub mod email;
