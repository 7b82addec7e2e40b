pub mod request_id;
pub mod request_info;

pub use request_id::{CORRELATION_ID_HEADER, CorrelationId, RequestIdExt, RequestIdMiddleware};
pub use request_info::RequestInfo;
