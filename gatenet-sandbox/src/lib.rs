//! Gatenet Sandbox - diagnostics réseau de démonstration
//!
//! Ping, traceroute et port scan sont entièrement simulés ; seule la
//! résolution DNS passe par la pile réseau de l'hôte.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod models;
pub mod resolver;
pub mod sim;

pub use config::SandboxConfig;
pub use error::DiagnosticError;
pub use http::{build_router, AppState};
pub use resolver::{LayeredResolver, Resolver, SharedResolver, StaticResolver, SystemResolver};
