//! Application services.

pub mod auth;
pub mod classifier;
pub mod cookies;

pub use auth::{AuthService, IssuedCredential};
pub use classifier::{Classification, HttpClassifier, ImageClassifier};
pub use cookies::CookieHelper;
