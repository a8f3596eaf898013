use crate::url_builder::{Environment, Routes};

/// Settings for a [`Factory`](crate::Factory).
///
/// Every value is optional here; the factory reports a missing one as
/// [`WebToPayError::Configuration`](crate::WebToPayError::Configuration) when
/// a component that needs it is first requested.
#[derive(Clone, Default)]
pub struct WebToPayConfig {
    pub project_id: Option<String>,
    pub password: Option<String>,
    pub environment: Environment,
    /// Replaces the environment's routes when set.
    pub routes_override: Option<Routes>,
}

impl std::fmt::Debug for WebToPayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebToPayConfig")
            .field("project_id", &self.project_id)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .field("routes_override", &self.routes_override)
            .finish()
    }
}

impl WebToPayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `WEBTOPAY_PROJECT_ID`, `WEBTOPAY_PASSWORD` and `WEBTOPAY_SANDBOX`.
    /// Empty values count as unset.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let sandbox = non_empty("WEBTOPAY_SANDBOX")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        let config = Self {
            project_id: non_empty("WEBTOPAY_PROJECT_ID"),
            password: non_empty("WEBTOPAY_PASSWORD"),
            ..Self::default()
        }
        .with_sandbox(sandbox);

        if config.project_id.is_none() {
            tracing::warn!("WEBTOPAY_PROJECT_ID is not set");
        }
        config
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.environment = if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        };
        self
    }

    pub fn with_routes(mut self, routes: Routes) -> Self {
        self.routes_override = Some(routes);
        self
    }

    /// Routes in effect: the override if set, else the environment's.
    pub fn routes(&self) -> Routes {
        self.routes_override
            .clone()
            .unwrap_or_else(|| Routes::for_environment(self.environment))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let config = WebToPayConfig::new()
            .with_project_id("123")
            .with_password("hunter2");
        let debug = format!("{config:?}");
        assert!(debug.contains("123"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_sandbox_routes() {
        let config = WebToPayConfig::new().with_sandbox(true);
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.routes(), Routes::sandbox());
        assert_eq!(WebToPayConfig::new().routes(), Routes::production());
    }

    #[test]
    fn test_routes_override_wins() {
        let mut routes = Routes::production();
        routes.payment = "http://localhost/pay/".to_string();
        let config = WebToPayConfig::new().with_sandbox(true).with_routes(routes.clone());
        assert_eq!(config.routes(), routes);
    }

    #[test]
    fn test_is_truthy() {
        for v in ["1", "true", "TRUE", "yes", " Yes "] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["0", "false", "no", "sandbox"] {
            assert!(!is_truthy(v), "{v}");
        }
    }
}
