/*!
Test Harness pour l'API Gatenet

Facilite l'écriture de tests d'intégration avec:
- Router construit in-process, requêtes envoyées via `tower::ServiceExt::oneshot`
- Resolver statique par défaut (aucune dépendance au réseau)
- Assertions sur l'enveloppe JSON et accès aux champs imbriqués
*/

use crate::fixtures::{demo_resolver, test_config};
use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use gatenet_sandbox::config::SandboxConfig;
use gatenet_sandbox::http::{build_router, AppState};
use gatenet_sandbox::resolver::SharedResolver;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Harness de test complet pour l'API Gatenet
pub struct TestHarness {
    router: Router,
    pub config: SandboxConfig,
}

impl TestHarness {
    /// Crée un harness avec la config de test et le resolver de démo
    pub fn new() -> Self {
        Self::with_parts(test_config(), Arc::new(demo_resolver()))
    }

    pub fn with_config(config: SandboxConfig) -> Self {
        Self::with_parts(config, Arc::new(demo_resolver()))
    }

    pub fn with_parts(config: SandboxConfig, resolver: SharedResolver) -> Self {
        // Init logging pour tests (ignore si déjà fait)
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();

        let router = build_router(AppState::new(config.clone(), resolver));
        Self { router, config }
    }

    /// Envoie un GET et retourne (statut, corps JSON)
    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body: Value = serde_json::from_slice(&bytes)?;
        tracing::debug!(uri, %status, "réponse reçue");
        Ok((status, body))
    }

    /// GET qui exige HTTP 200 (l'API ne signale jamais ses erreurs par le statut)
    pub async fn get_json(&self, uri: &str) -> Result<Value> {
        let (status, body) = self.get(uri).await?;
        if status != StatusCode::OK {
            anyhow::bail!("{uri}: expected HTTP 200, got {status}");
        }
        Ok(body)
    }

    /// Assert une enveloppe de succès et retourne le payload sous `key`
    pub fn assert_ok<'a>(&self, body: &'a Value, key: &str) -> Result<&'a Value> {
        if body["ok"] != Value::Bool(true) {
            anyhow::bail!("expected ok:true, got {body}");
        }
        body.get(key)
            .ok_or_else(|| anyhow::anyhow!("envelope has no '{key}': {body}"))
    }

    /// Assert une enveloppe d'échec avec le message exact
    pub fn assert_error(&self, body: &Value, expected: &str) -> Result<()> {
        if body["ok"] != Value::Bool(false) {
            anyhow::bail!("expected ok:false, got {body}");
        }
        match body["error"].as_str() {
            Some(msg) if msg == expected => Ok(()),
            other => anyhow::bail!("error mismatch: expected {expected:?}, got {other:?}"),
        }
    }

    /// Accès à un champ imbriqué, ex: "result.ports"
    pub fn field<'a>(&self, value: &'a Value, path: &str) -> Option<&'a Value> {
        let mut current = value;
        for part in path.split('.') {
            match current {
                Value::Object(obj) => current = obj.get(part)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro pour créer facilement des tests d'API
#[macro_export]
macro_rules! api_test {
    ($name:ident, |$harness:ident| $body:block) => {
        #[tokio::test]
        async fn $name() {
            async fn run($harness: &$crate::test_utils::TestHarness) -> $crate::anyhow::Result<()> $body

            let harness = $crate::test_utils::TestHarness::new();
            if let Err(e) = run(&harness).await {
                panic!("Test '{}' failed: {}", stringify!($name), e);
            }
        }
    };
}
