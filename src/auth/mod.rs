//! Authentication module
//!
//! Bearer-token handling for API requests.
//!
//! A [`TokenSource`] knows where a credential lives (environment, a
//! project-local file, a user-wide file). The [`AuthTokenProvider`] asks its
//! source once, caches the answer in memory, and forgets it when a request
//! comes back `401 Unauthorized`.

mod provider;
mod source;

pub use provider::AuthTokenProvider;
pub use source::{
    ChainTokenSource, EnvTokenSource, FileTokenSource, StaticTokenSource, TokenSource,
    CREDENTIALS_DIR, CREDENTIALS_FILE, TOKEN_ENV_VAR,
};
