//! Credential handling: signed access tokens, password hashing, opaque
//! secrets and the refresh-token cookie side channel.

pub mod cookie;
pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::{create_token, decode_token, Claims};
pub use password::{hash_password, verify_password};
pub use token::generate_secure_token;
