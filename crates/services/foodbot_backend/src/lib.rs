pub mod app_state;
pub mod rate_limit;
pub mod router;
pub mod service_factory;

pub use app_state::AppState;
pub use rate_limit::RateLimiter;
pub use router::build_router;
pub use service_factory::FoodbotServiceFactory;
