/**
 * SIMULATEURS - Générateurs de diagnostics synthétiques
 *
 * RÔLE :
 * Fabrique des résultats plausibles (ping, traceroute, port scan) sans
 * aucune I/O réseau. Chaque générateur est une fonction pure de
 * (source aléatoire explicite, hôte, paramètres) vers un résultat.
 *
 * FONCTIONNEMENT :
 * - La source aléatoire est passée explicitement (`&mut impl Rng`)
 * - `request_rng` fournit un StdRng par requête, seedé si configuré
 * - Seul le traceroute consulte le Resolver (dernier saut)
 */

pub mod ping;
pub mod port_scan;
pub mod traceroute;

pub use ping::simulate_ping;
pub use port_scan::{parse_ports, service_name, simulate_port_scan, PortScanPolicy};
pub use traceroute::simulate_traceroute;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::net::Ipv4Addr;

/// Source aléatoire d'une requête
pub fn request_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Arrondi à 2 décimales
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Probabilité utilisable par `gen_bool` : bornée à [0,1], NaN traité comme 0
pub(crate) fn probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Adresse dans 203.0.113.0/24 (TEST-NET-3, RFC 5737)
pub(crate) fn documentation_ip<R: Rng + ?Sized>(rng: &mut R) -> Ipv4Addr {
    Ipv4Addr::new(203, 0, 113, rng.gen_range(1..=254))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(15.004), 15.0);
        assert_eq!(round2(99.999), 100.0);
        assert_eq!(round2(42.125_1), 42.13);
    }

    #[test]
    fn test_probability_sanitizing() {
        assert_eq!(probability(f64::NAN), 0.0);
        assert_eq!(probability(-0.5), 0.0);
        assert_eq!(probability(1.5), 1.0);
        assert_eq!(probability(0.25), 0.25);
    }

    #[test]
    fn test_documentation_ip_stays_in_range() {
        let mut rng = request_rng(Some(1));
        for _ in 0..500 {
            let ip = documentation_ip(&mut rng);
            assert_eq!(&ip.octets()[..3], &[203, 0, 113]);
            assert!(ip.octets()[3] >= 1 && ip.octets()[3] <= 254);
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = request_rng(Some(99));
        let mut b = request_rng(Some(99));
        for _ in 0..8 {
            assert_eq!(a.gen::<u32>(), b.gen::<u32>());
        }
    }
}
