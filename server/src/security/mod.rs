//! Request-boundary security: what a client may store as an image URL, who
//! may mutate what, how often, and the headers every response carries.

pub mod headers;
pub mod image_url;
pub mod ownership;
pub mod rate_limit;

pub use headers::{security_headers, SecurityHeaders};
pub use image_url::{validate_upload_filename, ImageUrlPolicy, ImageUrlRejection, UploadNameRejection};
pub use ownership::ensure_owner;
pub use rate_limit::RateLimiter;
