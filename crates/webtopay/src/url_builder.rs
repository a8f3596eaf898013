use crate::codec;
use crate::constants::*;
use crate::request::SignedRequest;

/// Gateway environment the URLs point to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

/// The fixed gateway endpoints for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub public_key: String,
    pub payment: String,
    pub payment_method_list: String,
    pub sms_answer: String,
}

impl Routes {
    pub fn production() -> Self {
        Self {
            public_key: PRODUCTION_PUBLIC_KEY_URL.to_string(),
            payment: PRODUCTION_PAYMENT_URL.to_string(),
            payment_method_list: PRODUCTION_PAYMENT_METHOD_LIST_URL.to_string(),
            sms_answer: PRODUCTION_SMS_ANSWER_URL.to_string(),
        }
    }

    pub fn sandbox() -> Self {
        Self {
            public_key: SANDBOX_PUBLIC_KEY_URL.to_string(),
            payment: SANDBOX_PAYMENT_URL.to_string(),
            payment_method_list: SANDBOX_PAYMENT_METHOD_LIST_URL.to_string(),
            sms_answer: SANDBOX_SMS_ANSWER_URL.to_string(),
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Sandbox => Self::sandbox(),
        }
    }
}

/// Builds the gateway URLs for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    routes: Routes,
    environment: Environment,
}

impl UrlBuilder {
    pub fn new(environment: Environment) -> Self {
        Self {
            routes: Routes::for_environment(environment),
            environment,
        }
    }

    /// Use custom routes, e.g. to point at a local gateway stub.
    pub fn with_routes(environment: Environment, routes: Routes) -> Self {
        Self {
            routes,
            environment,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Full redirect URL for a signed payment request.
    ///
    /// The gateway picks the page language from the `lang` field inside the
    /// signed data, so `language` does not change the route.
    pub fn build_for_request(&self, request: &SignedRequest, language: Option<&str>) -> String {
        if let Some(lang) = language {
            tracing::debug!(lang, "building payment URL");
        }
        format!(
            "{}?{}",
            self.routes.payment,
            codec::build_query(request.query_pairs())
        )
    }

    pub fn build_for_public_key(&self) -> &str {
        &self.routes.public_key
    }

    pub fn build_for_payment_method_list(&self, project_id: &str, currency: &str) -> String {
        format!(
            "{}{}/currency:{}",
            self.routes.payment_method_list, project_id, currency
        )
    }

    pub fn build_for_sms_answer(&self) -> &str {
        &self.routes.sms_answer
    }
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}
