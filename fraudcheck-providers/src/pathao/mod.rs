//! Pathao courier implementation.
//!
//! Pathao exposes a merchant API: a JSON login returns a bearer token, and
//! the customer success endpoint returns delivered and total parcel counts.
//!
//! Cache key: `pathao_access_token`

mod api;
mod descriptor;
pub(crate) mod parser;
mod strategies;

pub use api::{
    PATHAO_BASE_URL, PathaoApiClient, PathaoCustomer, PathaoLoginResponse, PathaoSuccessData,
    PathaoSuccessResponse,
};
pub use descriptor::pathao_descriptor;
pub use strategies::{PATHAO_CACHE_KEY, PathaoApiStrategy};
