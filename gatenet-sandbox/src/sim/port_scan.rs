use super::probability;
use crate::config::PortScanConf;
use crate::error::DiagnosticError;
use crate::models::{PortResult, PortScanResult, PortStatus};
use rand::Rng;
use tracing::debug;

/// Constantes de démo : ports "probablement ouverts" et probabilités d'ouverture
#[derive(Debug, Clone, PartialEq)]
pub struct PortScanPolicy {
    pub likely_open: Vec<u16>,
    pub likely_open_probability: f64,
    pub other_open_probability: f64,
    pub max_ports: usize,
}

impl Default for PortScanPolicy {
    fn default() -> Self {
        PortScanPolicy::from(&PortScanConf::default())
    }
}

impl From<&PortScanConf> for PortScanPolicy {
    fn from(conf: &PortScanConf) -> Self {
        Self {
            likely_open: conf.likely_open.clone(),
            likely_open_probability: conf.likely_open_probability,
            other_open_probability: conf.other_open_probability,
            max_ports: conf.max_ports,
        }
    }
}

impl PortScanPolicy {
    fn open_probability(&self, port: u16) -> f64 {
        probability(if self.likely_open.contains(&port) {
            self.likely_open_probability
        } else {
            self.other_open_probability
        })
    }
}

/// Nom de service connu pour un port, chaîne vide sinon
pub fn service_name(port: u16) -> &'static str {
    match port {
        21 => "FTP",
        22 => "SSH",
        25 => "SMTP",
        80 => "HTTP",
        443 => "HTTPS",
        3306 => "MySQL",
        5432 => "PostgreSQL",
        _ => "",
    }
}

/// Découpe "80, 443,abc,,22" en [80, 443, 22]. Ordre et doublons conservés.
pub fn parse_ports(spec: &str, max_ports: usize) -> Result<Vec<u16>, DiagnosticError> {
    let ports: Vec<u16> = spec
        .split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty() && tok.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|tok| tok.parse::<u16>().ok())
        .collect();

    if ports.is_empty() {
        return Err(DiagnosticError::NoValidPorts);
    }
    if ports.len() > max_ports {
        return Err(DiagnosticError::TooManyPorts(max_ports));
    }
    Ok(ports)
}

pub fn simulate_port_scan<R: Rng + ?Sized>(
    rng: &mut R,
    host: &str,
    ports: &[u16],
    policy: &PortScanPolicy,
) -> PortScanResult {
    let ports: Vec<PortResult> = ports
        .iter()
        .map(|&port| {
            if rng.gen_bool(policy.open_probability(port)) {
                PortResult { port, status: PortStatus::Open, service: service_name(port).to_string() }
            } else {
                PortResult { port, status: PortStatus::Closed, service: String::new() }
            }
        })
        .collect();

    debug!(
        host,
        scanned = ports.len(),
        open = ports.iter().filter(|p| p.status == PortStatus::Open).count(),
        "port scan simulé"
    );

    PortScanResult { host: host.to_string(), ports }
}
