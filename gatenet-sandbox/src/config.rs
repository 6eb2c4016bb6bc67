use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};
use tokio::fs;
use tracing::{info, warn};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    pub bind_addr: String,
    pub port: u16,
    pub static_dir: String,
    pub simulation: SimulationConf,
    pub port_scan: PortScanConf,
    pub dns: DnsConf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConf {
    pub delay_ms: u64,
    pub ping_failure_probability: f64,
    /// Si présent, chaque requête tire ses valeurs d'un StdRng seedé (réponses reproductibles)
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PortScanConf {
    pub likely_open: Vec<u16>,
    pub likely_open_probability: f64,
    pub other_open_probability: f64,
    pub max_ports: usize,
    pub default_ports: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DnsConf {
    pub timeout_ms: u64,
    pub static_hosts: HashMap<String, String>, // ex: "demo.local" -> "203.0.113.7"
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            port: 8000,
            static_dir: "static".into(),
            simulation: SimulationConf::default(),
            port_scan: PortScanConf::default(),
            dns: DnsConf::default(),
        }
    }
}

impl Default for SimulationConf {
    fn default() -> Self {
        Self { delay_ms: 500, ping_failure_probability: 0.10, rng_seed: None }
    }
}

impl Default for PortScanConf {
    fn default() -> Self {
        Self {
            likely_open: vec![22, 80, 443],
            likely_open_probability: 0.8,
            other_open_probability: 0.1,
            max_ports: 20,
            default_ports: "80,443,22,21,25".into(),
        }
    }
}

impl Default for DnsConf {
    fn default() -> Self {
        Self { timeout_ms: 2000, static_hosts: HashMap::new() }
    }
}

impl SandboxConfig {
    /// Ramène les probabilités dans [0,1]
    pub fn sanitize(mut self) -> Self {
        self.simulation.ping_failure_probability =
            clamp_probability("simulation.ping_failure_probability", self.simulation.ping_failure_probability);
        self.port_scan.likely_open_probability =
            clamp_probability("port_scan.likely_open_probability", self.port_scan.likely_open_probability);
        self.port_scan.other_open_probability =
            clamp_probability("port_scan.other_open_probability", self.port_scan.other_open_probability);
        self
    }

    /// Applique la variable PORT si elle est valide
    pub fn apply_port_override(mut self, port_var: Option<String>) -> Self {
        if let Some(raw) = port_var {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %raw, "PORT invalide, port configuré conservé"),
            }
        }
        self
    }
}

fn clamp_probability(name: &str, value: f64) -> f64 {
    if value.is_nan() {
        warn!(field = name, "probabilité NaN, remplacée par 0");
        return 0.0;
    }
    if !(0.0..=1.0).contains(&value) {
        warn!(field = name, value, "probabilité hors [0,1], bornée");
    }
    value.clamp(0.0, 1.0)
}

pub async fn load_config_from<P: AsRef<Path>>(path: P) -> SandboxConfig {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "pas de fichier de config, usage config par défaut");
        return SandboxConfig::default();
    }
    let txt = fs::read_to_string(path).await.unwrap_or_default();
    if txt.trim().is_empty() {
        return SandboxConfig::default();
    }
    serde_yaml::from_str::<SandboxConfig>(&txt)
        .map(SandboxConfig::sanitize)
        .unwrap_or_else(|e| {
            warn!(path = %path.display(), "config invalide: {e}");
            SandboxConfig::default()
        })
}

pub async fn load_config() -> SandboxConfig {
    let path = std::env::var("GATENET_CONFIG").unwrap_or_else(|_| "gatenet.yaml".into());
    load_config_from(&path)
        .await
        .apply_port_override(std::env::var("PORT").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let cfg = load_config_from("/definitely/not/here/gatenet.yaml").await;
        assert_eq!(cfg, SandboxConfig::default());
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.port_scan.likely_open, vec![22, 80, 443]);
    }

    #[tokio::test]
    async fn test_partial_yaml_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 9100\nsimulation:\n  delay_ms: 0\n  rng_seed: 7\ndns:\n  static_hosts:\n    demo.local: 203.0.113.7").unwrap();

        let cfg = load_config_from(file.path()).await;
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.simulation.delay_ms, 0);
        assert_eq!(cfg.simulation.rng_seed, Some(7));
        assert_eq!(cfg.simulation.ping_failure_probability, 0.10);
        assert_eq!(cfg.dns.static_hosts.get("demo.local").map(String::as_str), Some("203.0.113.7"));
        assert_eq!(cfg.port_scan.max_ports, 20);
    }

    #[tokio::test]
    async fn test_invalid_yaml_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: [not, a, port").unwrap();
        assert_eq!(load_config_from(file.path()).await, SandboxConfig::default());
    }

    #[tokio::test]
    async fn test_probabilities_are_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port_scan:\n  likely_open_probability: 1.7\n  other_open_probability: -0.2").unwrap();

        let cfg = load_config_from(file.path()).await;
        assert_eq!(cfg.port_scan.likely_open_probability, 1.0);
        assert_eq!(cfg.port_scan.other_open_probability, 0.0);
    }

    #[test]
    fn test_port_override() {
        let cfg = SandboxConfig::default().apply_port_override(Some("8123".into()));
        assert_eq!(cfg.port, 8123);
        let cfg = SandboxConfig::default().apply_port_override(Some("eighty".into()));
        assert_eq!(cfg.port, 8000);
        let cfg = SandboxConfig::default().apply_port_override(None);
        assert_eq!(cfg.port, 8000);
    }
}
