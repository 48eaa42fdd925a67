//! Request extractors: the authorizer front door.
//!
//! [`CurrentAccount`] resolves the bearer credential to an account (401 on
//! any failure, fails closed), [`RequireAdmin`] layers the role check on
//! top (403 on mismatch), [`PathId`] turns a non-numeric id segment into
//! the same 404 an unmatched route produces, and [`Json`] maps body decode
//! failures to the API's `{"message"}` error shape.

mod current_account;
mod json;
mod path_id;

pub use current_account::{CurrentAccount, RequireAdmin};
pub use json::Json;
pub use path_id::PathId;
