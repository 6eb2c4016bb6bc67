/**
 * RESOLVER DNS - Seule opération réelle du sandbox
 *
 * RÔLE :
 * Abstraction étroite nom d'hôte -> adresse IP. Le traceroute simulé
 * en dépend pour son dernier saut, le endpoint /api/dns_lookup l'expose.
 *
 * FONCTIONNEMENT :
 * - SystemResolver : résolveur de l'hôte via tokio, borné par un timeout
 * - StaticResolver : table en mémoire (tests, démos hors-ligne)
 * - LayeredResolver : table statique d'abord, puis le système
 */

use crate::error::DiagnosticError;
use crate::models::DnsLookupResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, host: &str) -> Result<IpAddr, DiagnosticError>;
}

pub type SharedResolver = Arc<dyn Resolver>;

/// Résolution via la pile réseau de l'hôte (IPv4 préférée)
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr, DiagnosticError> {
        let unresolvable = || DiagnosticError::Unresolvable(host.to_string());
        if host.trim().is_empty() {
            return Err(unresolvable());
        }

        let lookup = tokio::net::lookup_host((host, 0));
        let addrs: Vec<IpAddr> = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(addrs)) => addrs.map(|a| a.ip()).collect(),
            Ok(Err(e)) => {
                debug!(host, "lookup failed: {e}");
                return Err(unresolvable());
            }
            Err(_) => {
                debug!(host, timeout_ms = self.timeout.as_millis() as u64, "lookup timed out");
                return Err(unresolvable());
            }
        };

        addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(unresolvable)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, IpAddr>, // clé en minuscules
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, host: &str, ip: IpAddr) -> Self {
        self.entries.insert(host.to_ascii_lowercase(), ip);
        self
    }

    /// Construit la table depuis la config ; les adresses illisibles sont ignorées
    pub fn from_config(hosts: &HashMap<String, String>) -> Self {
        let mut resolver = Self::new();
        for (host, ip) in hosts {
            match ip.parse::<IpAddr>() {
                Ok(ip) => resolver = resolver.with_entry(host, ip),
                Err(_) => tracing::warn!(host = %host, ip = %ip, "static_hosts: adresse invalide ignorée"),
            }
        }
        resolver
    }

    pub fn lookup(&self, host: &str) -> Option<IpAddr> {
        self.entries.get(&host.to_ascii_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr, DiagnosticError> {
        self.lookup(host)
            .ok_or_else(|| DiagnosticError::Unresolvable(host.to_string()))
    }
}

/// Table statique consultée avant le résolveur de repli
pub struct LayeredResolver {
    overrides: StaticResolver,
    fallback: SharedResolver,
}

impl LayeredResolver {
    pub fn new(overrides: StaticResolver, fallback: SharedResolver) -> Self {
        Self { overrides, fallback }
    }
}

#[async_trait]
impl Resolver for LayeredResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr, DiagnosticError> {
        match self.overrides.lookup(host) {
            Some(ip) => Ok(ip),
            None => self.fallback.resolve(host).await,
        }
    }
}

pub async fn dns_lookup(resolver: &dyn Resolver, host: &str) -> Result<DnsLookupResult, DiagnosticError> {
    let ip = resolver.resolve(host).await?;
    Ok(DnsLookupResult { ip: ip.to_string(), host: host.to_string() })
}
