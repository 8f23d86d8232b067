//! Truck-wash operations backend.
//!
//! A hexagonal actix-web service: managers administer accounts and trigger
//! storage cleanup, washers log wash events with before/after photos, and
//! drivers are passive records attached to trucks. Domain logic lives in
//! [`domain`], transports in [`inbound`], infrastructure in [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
