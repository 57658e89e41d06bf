use std::sync::Arc;

use pokedex_core::{
    Authenticator, CatalogCache, CatalogSource, Config, DetailService, LoginService,
    TokenAuthenticator, TokenService,
};

/// Shared application state
pub struct AppState {
    authenticator: Arc<dyn Authenticator>,
    login: LoginService,
    catalog: CatalogCache,
    details: DetailService,
}

impl AppState {
    /// Wire the services around one token service and one upstream source.
    pub fn new(config: &Config, tokens: Arc<TokenService>, source: Arc<dyn CatalogSource>) -> Self {
        let catalog = CatalogCache::new(Arc::clone(&source));
        Self::with_catalog(config, tokens, source, catalog)
    }

    /// Like [`AppState::new`] with a preconfigured catalog cache.
    pub fn with_catalog(
        config: &Config,
        tokens: Arc<TokenService>,
        source: Arc<dyn CatalogSource>,
        catalog: CatalogCache,
    ) -> Self {
        Self {
            authenticator: Arc::new(TokenAuthenticator::new(Arc::clone(&tokens))),
            login: LoginService::new(&config.auth, tokens),
            catalog,
            details: DetailService::new(source),
        }
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn login(&self) -> &LoginService {
        &self.login
    }

    pub fn tokens(&self) -> &TokenService {
        self.login.tokens()
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn details(&self) -> &DetailService {
        &self.details
    }
}
