//! Token encoding and lifecycle management.

pub mod codec;
pub mod service;

pub use codec::TokenCodec;
pub use service::{TokenPolicy, TokenService};
