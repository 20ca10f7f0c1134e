//! Authentication for the banking API.
//!
//! Covers the password verifier store (bcrypt), the JWT token service, and
//! the per-request ownership middleware for protected routes.

pub mod credentials;
pub mod middleware;
pub mod token;

pub use middleware::{AccountOwner, Authenticated, Outcome};
pub use token::{Claims, ExpiryPolicy, TokenService};
