pub mod query_params;
pub mod surf_logging;

pub use query_params::{url_with_params, QueryParams};
pub use surf_logging::SurfLogging;
