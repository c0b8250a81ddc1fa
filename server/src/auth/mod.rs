//! Authentication Module
//!
//! JWT issuance/validation and the staff extractor:
//! - [`JwtService`] - token service
//! - [`AdminCredentials`] - env-configured staff account
//! - [`CurrentStaff`] - authenticated-request context

pub mod credentials;
pub mod extractor;
pub mod jwt;

pub use credentials::AdminCredentials;
pub use extractor::CurrentStaff;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
