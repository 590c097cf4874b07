//! HTTP server configuration object.

use journal_backend::inbound::http::pages::SiteRoot;
use journal_backend::inbound::http::state::HttpState;

/// Everything [`create_server`](super::create_server) needs.
pub struct ServerConfig {
    pub(crate) http_state: HttpState,
    pub(crate) site: SiteRoot,
    pub(crate) bind_addr: (String, u16),
}

impl ServerConfig {
    /// Serve `http_state` on `host:port`.
    #[must_use]
    pub fn new(http_state: HttpState, host: impl Into<String>, port: u16) -> Self {
        Self {
            http_state,
            site: SiteRoot::new("public"),
            bind_addr: (host.into(), port),
        }
    }

    /// Serve front-end pages from `site`.
    #[must_use]
    pub fn with_site(mut self, site: SiteRoot) -> Self {
        self.site = site;
        self
    }
}
