//! Authentication: credentials, identity and the session store.

mod identity;
pub mod oauth;
mod session;
mod store;
mod token;

pub use identity::Identity;
pub use oauth::{CallbackOutcome, DEFAULT_PROVIDER, authorization_url};
pub use session::{IdentitySource, SessionSnapshot, SessionStatus, SessionStore};
pub use store::{
    CREDENTIAL_FILE, CREDENTIAL_KEY, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
pub use token::BearerToken;
