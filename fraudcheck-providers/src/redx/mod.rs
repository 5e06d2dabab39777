//! RedX courier implementation.
//!
//! RedX logs in through its API host and serves customer stats from its web
//! host. Both expect phone numbers with the `88` country prefix.
//!
//! Cache key: `redx_access_token`

mod api;
mod descriptor;
pub(crate) mod parser;
mod strategies;

pub use api::{
    REDX_API_BASE_URL, REDX_BASE_URL, RedxApiClient, RedxLoginData, RedxLoginResponse,
    RedxStatsData, RedxStatsResponse,
};
pub use descriptor::redx_descriptor;
pub use strategies::{REDX_CACHE_KEY, RedxApiStrategy};
