/*!
# Gatenet DevKit - Harness et fixtures pour tester le sandbox

Bibliothèque facilitant les tests de l'API Gatenet avec:
- Router piloté in-process (aucun socket, aucun délai artificiel)
- Resolver statique pour tester le traceroute sans réseau
- Assertions sur l'enveloppe {ok, result|hops|error}
*/

pub mod fixtures;
pub mod test_utils;

pub use anyhow;
pub use fixtures::{demo_resolver, test_config};
pub use test_utils::TestHarness;
