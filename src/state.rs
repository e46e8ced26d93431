use crate::config::Config;
use crate::rate_limit::RateLimiter;
use crate::routes::RouteTable;

// app's shared state, built once and handed to every request

pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,               // read-only after startup
    pub rate_limiter: RateLimiter,        // per path, shared window clock
}

impl AppState {
    pub fn new(config: Config, routes: RouteTable) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit);
        Self {
            config,
            routes,
            rate_limiter,
        }
    }
}
