/**
 * ERREURS DIAGNOSTICS - Taxonomie unique des échecs exposés par l'API
 *
 * RÔLE :
 * Chaque générateur retourne `Result<T, DiagnosticError>`. La couche HTTP
 * convertit ensuite l'erreur en enveloppe `{ok:false, error}` (statut 200).
 *
 * CATÉGORIES :
 * - Timeout : tirage d'échec du ping simulé
 * - Unresolvable : résolution DNS réelle en échec
 * - NoValidPorts / TooManyPorts : validation de la liste de ports
 * - InvalidParameter : paramètre de requête absent ou hors bornes
 * - Internal : toute autre faute, message opaque côté client
 */

/// Message renvoyé au client pour toute faute interne
pub const GENERIC_FAILURE: &str = "An error occurred while processing the request";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticError {
    #[error("Request timed out")]
    Timeout,
    #[error("Could not resolve hostname: {0}")]
    Unresolvable(String),
    #[error("No valid ports provided")]
    NoValidPorts,
    #[error("Maximum {0} ports allowed for scan")]
    TooManyPorts(usize),
    #[error("{0}")]
    InvalidParameter(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DiagnosticError {
    /// Message destiné au client. Le détail des fautes internes reste dans les logs.
    pub fn public_message(&self) -> String {
        match self {
            DiagnosticError::Internal(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn missing(param: &str) -> Self {
        DiagnosticError::InvalidParameter(format!("Missing required parameter: {param}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_messages() {
        assert_eq!(DiagnosticError::Timeout.public_message(), "Request timed out");
        assert_eq!(
            DiagnosticError::Unresolvable("nope.invalid".into()).public_message(),
            "Could not resolve hostname: nope.invalid"
        );
        assert_eq!(DiagnosticError::TooManyPorts(20).public_message(), "Maximum 20 ports allowed for scan");
        assert_eq!(DiagnosticError::missing("host").public_message(), "Missing required parameter: host");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = DiagnosticError::Internal("resolver exploded at 0xdead".into());
        assert_eq!(err.public_message(), GENERIC_FAILURE);
        assert!(err.to_string().contains("0xdead"));
    }
}
