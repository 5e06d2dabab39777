//! Steadfast courier implementation.
//!
//! Steadfast has no merchant API for fraud checks; the stats come from its
//! web dashboard. Logging in scrapes a CSRF token from the login page, posts
//! the login form and keeps the resulting session cookies.
//!
//! Cache key: `steadfast_auth_data`

mod csrf;
mod descriptor;
pub(crate) mod parser;
mod session;
mod strategies;
mod web;

pub use csrf::extract_csrf_token;
pub use descriptor::steadfast_descriptor;
pub use parser::SteadfastFraudResponse;
pub use session::{LOGIN_MARKER, SessionExpiredPredicate, is_session_expired};
pub use strategies::{STEADFAST_CACHE_KEY, SteadfastWebStrategy};
pub use web::{STEADFAST_BASE_URL, SteadfastWebClient};
