pub mod http_source;
pub mod seed;

pub use http_source::HttpUserSource;
pub use seed::StaticUserSource;
