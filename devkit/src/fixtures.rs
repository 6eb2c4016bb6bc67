/*!
Fixtures partagées : configuration sans délai et resolver hors-ligne
*/

use gatenet_sandbox::config::SandboxConfig;
use gatenet_sandbox::resolver::StaticResolver;
use std::net::{IpAddr, Ipv4Addr};

/// Adresse renvoyée pour example.com par `demo_resolver`
pub const EXAMPLE_COM_IP: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

/// Config de test : pas de délai, pas d'échec de ping, graine fixe
pub fn test_config() -> SandboxConfig {
    let mut cfg = SandboxConfig::default();
    cfg.simulation.delay_ms = 0;
    cfg.simulation.ping_failure_probability = 0.0;
    cfg.simulation.rng_seed = Some(42);
    cfg
}

/// Resolver hors-ligne connaissant localhost et example.com
pub fn demo_resolver() -> StaticResolver {
    StaticResolver::new()
        .with_entry("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST))
        .with_entry("example.com", IpAddr::V4(EXAMPLE_COM_IP))
}
