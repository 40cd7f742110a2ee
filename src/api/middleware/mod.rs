pub mod auth;
pub mod session;

pub use auth::{AuthClaims, CurrentUser};
pub use session::login_session_layer;
