//! Shared-password login with a signed, stateless session cookie.

pub mod extractor;
pub mod session;

pub use extractor::{session_cookie, Authenticated};
pub use session::{password_matches, SessionKeys, SESSION_COOKIE};
