use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PingResult {
    pub host: String,
    pub success: bool,
    pub min_rtt: f64,
    pub max_rtt: f64,
    pub avg_rtt: f64,
    pub jitter: f64,
    pub packet_loss: u32,
    pub packets_sent: u32,
    pub packets_received: u32,
    pub rtts: Vec<f64>,
    pub raw_output: String,
}

/// Un saut de traceroute simulé, `rtt` cumulé en millisecondes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Hop {
    pub hop: u32,
    pub ip: String,
    pub hostname: String,
    pub rtt: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Open,
    Closed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PortResult {
    pub port: u16,
    pub status: PortStatus,
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PortScanResult {
    pub host: String,
    pub ports: Vec<PortResult>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DnsLookupResult {
    pub ip: String,
    pub host: String,
}

/// Paramètres de requête, tous optionnels pour que la validation passe par l'enveloppe
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DiagnosticQuery {
    pub host: Option<String>,
    pub count: Option<String>,
    pub ports: Option<String>,
}

impl DiagnosticQuery {
    /// Construit la requête depuis les paires brutes. Clé répétée : la première valeur gagne.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut q = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "host" => &mut q.host,
                "count" => &mut q.count,
                "ports" => &mut q.ports,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        q
    }
}
