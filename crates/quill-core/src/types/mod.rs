//! Validated value types.

mod api_base;

pub use api_base::ApiBase;
