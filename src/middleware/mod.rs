//! Request extractors enforcing authentication, roles and the error envelope.

pub mod auth;
pub mod extract;
pub mod rbac;
