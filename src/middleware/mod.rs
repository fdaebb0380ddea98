// Middleware modules
pub mod logging;

pub use logging::{RequestLogLayer, RequestLogService, DEFAULT_MAX_BODY_BYTES};
