//! Auth-domain identifiers, token material, and normalized identities.

pub mod datetime;
pub mod id;
pub mod token;
pub mod user;

pub use datetime::*;
pub use id::*;
pub use token::{secret::*, *};
pub use user::*;
