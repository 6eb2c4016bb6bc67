use super::{documentation_ip, round2};
use crate::error::DiagnosticError;
use crate::models::Hop;
use crate::resolver::Resolver;
use rand::Rng;
use std::net::Ipv4Addr;
use tracing::{debug, error};

pub const MIN_HOPS: u32 = 5;
pub const MAX_HOPS: u32 = 12;

/// Les N premiers sauts sont dans le LAN (10.0.0.x)
const PRIVATE_HOPS: u32 = 3;
const DESTINATION_REAL_PROBABILITY: f64 = 0.7;
const ROUTER_NAME_PROBABILITY: f64 = 0.3;
const BASE_LATENCY_MS: f64 = 5.0;
const HOP_INCREMENT_MS: std::ops::RangeInclusive<f64> = 5.0..=15.0;

/// Fabrique une chaîne de sauts vers `host`, latence cumulée strictement croissante.
/// Une faute du resolver sur la destination devient une erreur interne, jamais une liste partielle.
pub async fn simulate_traceroute<R: Rng + Send + ?Sized>(
    rng: &mut R,
    resolver: &dyn Resolver,
    host: &str,
) -> Result<Vec<Hop>, DiagnosticError> {
    let hop_count = rng.gen_range(MIN_HOPS..=MAX_HOPS);

    // tirage fait avant la résolution pour ne pas dépendre de son résultat
    let use_real_destination = rng.gen_bool(DESTINATION_REAL_PROBABILITY);
    let destination_ip = if use_real_destination {
        resolver.resolve(host).await.map_err(|e| {
            error!(host, "traceroute: résolution de la destination impossible: {e}");
            DiagnosticError::Internal(e.to_string())
        })?
        .to_string()
    } else {
        documentation_ip(rng).to_string()
    };

    let mut latency = BASE_LATENCY_MS;
    let mut hops = Vec::with_capacity(hop_count as usize);

    for i in 0..hop_count {
        let is_last = i + 1 == hop_count;

        let ip = if is_last {
            destination_ip.clone()
        } else if i < PRIVATE_HOPS {
            Ipv4Addr::new(10, 0, 0, (i + 1) as u8).to_string()
        } else {
            documentation_ip(rng).to_string()
        };

        let hostname = if is_last {
            if rng.gen_bool(DESTINATION_REAL_PROBABILITY) { host.to_string() } else { String::new() }
        } else if rng.gen_bool(ROUTER_NAME_PROBABILITY) {
            format!("router-{}.example.com", i + 1)
        } else {
            String::new()
        };

        latency += rng.gen_range(HOP_INCREMENT_MS);
        hops.push(Hop { hop: i + 1, ip, hostname, rtt: round2(latency) });
    }

    debug!(host, hops = hops.len(), "traceroute simulé");
    Ok(hops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;
    use crate::sim::request_rng;
    use std::net::IpAddr;

    fn resolver() -> StaticResolver {
        StaticResolver::new().with_entry("example.com", IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)))
    }

    #[tokio::test]
    async fn test_hop_chain_shape_across_seeds() {
        let resolver = resolver();
        for seed in 0..300u64 {
            let mut rng = request_rng(Some(seed));
            let hops = simulate_traceroute(&mut rng, &resolver, "example.com").await.unwrap();

            assert!((5..=12).contains(&hops.len()), "len = {}", hops.len());
            for (i, hop) in hops.iter().enumerate() {
                assert_eq!(hop.hop as usize, i + 1);
            }
            for pair in hops.windows(2) {
                assert!(pair[0].rtt < pair[1].rtt, "{} !< {}", pair[0].rtt, pair[1].rtt);
            }
            assert!(hops[0].rtt >= 10.0 && hops[0].rtt <= 20.0);
        }
    }

    #[tokio::test]
    async fn test_address_plan() {
        let resolver = resolver();
        for seed in 0..200u64 {
            let mut rng = request_rng(Some(seed));
            let hops = simulate_traceroute(&mut rng, &resolver, "example.com").await.unwrap();
            let (last, intermediate) = hops.split_last().unwrap();

            for hop in intermediate {
                if hop.hop <= 3 {
                    assert_eq!(hop.ip, format!("10.0.0.{}", hop.hop));
                } else {
                    assert!(hop.ip.starts_with("203.0.113."), "ip = {}", hop.ip);
                }
                assert!(hop.hostname.is_empty() || hop.hostname == format!("router-{}.example.com", hop.hop));
            }
            assert!(last.ip == "93.184.216.34" || last.ip.starts_with("203.0.113."));
            assert!(last.hostname.is_empty() || last.hostname == "example.com");
        }
    }

    #[tokio::test]
    async fn test_real_destination_is_used_sometimes() {
        let resolver = resolver();
        let mut real = 0;
        for seed in 0..200u64 {
            let mut rng = request_rng(Some(seed));
            let hops = simulate_traceroute(&mut rng, &resolver, "example.com").await.unwrap();
            if hops.last().unwrap().ip == "93.184.216.34" {
                real += 1;
            }
        }
        assert!((100..=180).contains(&real), "real = {real}");
    }

    #[tokio::test]
    async fn test_hostname_rates() {
        let resolver = resolver();
        let (mut named_destinations, mut runs) = (0, 0);
        let (mut named_routers, mut routers) = (0, 0);
        for seed in 0..400u64 {
            let mut rng = request_rng(Some(seed));
            let hops = simulate_traceroute(&mut rng, &resolver, "example.com").await.unwrap();
            let (last, intermediate) = hops.split_last().unwrap();

            runs += 1;
            if last.hostname == "example.com" {
                named_destinations += 1;
            }
            routers += intermediate.len();
            named_routers += intermediate.iter().filter(|h| !h.hostname.is_empty()).count();
        }

        let destination_rate = named_destinations as f64 / runs as f64;
        let router_rate = named_routers as f64 / routers as f64;
        assert!((0.6..=0.8).contains(&destination_rate), "destination rate = {destination_rate}");
        assert!((0.25..=0.35).contains(&router_rate), "router rate = {router_rate}");
    }

    #[tokio::test]
    async fn test_resolver_failure_is_generic_error() {
        let resolver = StaticResolver::new();
        let mut saw_failure = false;
        for seed in 0..50u64 {
            let mut rng = request_rng(Some(seed));
            match simulate_traceroute(&mut rng, &resolver, "unknown.invalid").await {
                Ok(hops) => assert!(hops.last().unwrap().ip.starts_with("203.0.113.")),
                Err(e) => {
                    assert!(matches!(e, DiagnosticError::Internal(_)));
                    assert_eq!(e.public_message(), crate::error::GENERIC_FAILURE);
                    saw_failure = true;
                }
            }
        }
        assert!(saw_failure);
    }
}
