//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_security_admin_repository;
mod postgres_audit_trail;
mod postgres_authorization_repository;
mod postgres_security_admin_repository;

pub use in_memory_security_admin_repository::InMemorySecurityAdminRepository;
pub use postgres_audit_trail::PostgresAuditTrail;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;
