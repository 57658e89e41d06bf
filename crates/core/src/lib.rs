pub mod auth;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod detail;
pub mod metrics;
pub mod query;
pub mod testing;
pub mod upstream;

pub use auth::{
    extract_token, AuthError, AuthRequest, Authenticator, Claims, Identity, LoginError,
    LoginService, Session, TokenAuthenticator, TokenError, TokenService,
};
pub use catalog::{CacheError, CacheStatus, CatalogCache, CatalogSnapshot, IndexEntry};
pub use clock::{Clock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, Config, ConfigError,
    SanitizedConfig, ServerConfig, UpstreamConfig,
};
pub use detail::{DetailError, DetailRecord, DetailService, Stats};
pub use query::{run_query, Query, QueryResult, SortKey};
pub use upstream::{CatalogSource, PokeApiClient, UpstreamError};
