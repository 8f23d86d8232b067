//! Outbound adapters implementing the domain's driven ports against real
//! infrastructure: PostgreSQL persistence, the S3-compatible object store,
//! and the welcome-mail relay.

pub mod notify;
pub mod persistence;
pub mod storage;
