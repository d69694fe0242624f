mod origin_middleware;

pub use origin_middleware::*;
