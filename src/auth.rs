//! Session-domain models: the bearer token, the resolved profile, and the cookie codec.

pub mod cookie;
pub mod secret;
pub mod session;

pub use cookie::*;
pub use secret::*;
pub use session::*;
