//! Request extractors and middleware

pub mod tenant;

pub use tenant::{Tenant, TENANT_HEADER};
