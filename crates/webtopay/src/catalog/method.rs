use crate::constants::DEFAULT_LANGUAGE;
use crate::error::{Result, WebToPayError};
use std::collections::HashMap;

/// One payment method (bank, card processor, ...) offered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethod {
    key: String,
    min_amount: Option<u64>,
    max_amount: Option<u64>,
    currency: String,
    logo_urls: HashMap<String, String>,
    titles: HashMap<String, String>,
    default_language: String,
    is_iban: bool,
    base_currency: Option<String>,
}

impl PaymentMethod {
    pub fn new(key: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            min_amount: None,
            max_amount: None,
            currency: currency.into(),
            logo_urls: HashMap::new(),
            titles: HashMap::new(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            is_iban: false,
            base_currency: None,
        }
    }

    pub fn with_amount_range(mut self, min_amount: Option<u64>, max_amount: Option<u64>) -> Self {
        self.min_amount = min_amount;
        self.max_amount = max_amount;
        self
    }

    pub fn with_titles(mut self, titles: HashMap<String, String>) -> Self {
        self.titles = titles;
        self
    }

    pub fn with_logo_urls(mut self, logo_urls: HashMap<String, String>) -> Self {
        self.logo_urls = logo_urls;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn min_amount(&self) -> Option<u64> {
        self.min_amount
    }

    pub fn max_amount(&self) -> Option<u64> {
        self.max_amount
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn set_default_language(&mut self, language: impl Into<String>) -> &mut Self {
        self.default_language = language.into();
        self
    }

    /// Whether this method returns an IBAN after payment.
    pub fn is_iban(&self) -> bool {
        self.is_iban
    }

    pub fn set_is_iban(&mut self, is_iban: bool) -> &mut Self {
        self.is_iban = is_iban;
        self
    }

    pub fn base_currency(&self) -> Option<&str> {
        self.base_currency.as_deref()
    }

    pub fn set_base_currency(&mut self, base_currency: Option<String>) -> &mut Self {
        self.base_currency = base_currency;
        self
    }

    /// Logo for `language`, else for the default language, else `None`.
    pub fn logo_url(&self, language: Option<&str>) -> Option<&str> {
        language
            .and_then(|lang| self.logo_urls.get(lang))
            .or_else(|| self.logo_urls.get(&self.default_language))
            .map(String::as_str)
    }

    /// Title for `language`, else for the default language, else the key.
    pub fn title(&self, language: Option<&str>) -> &str {
        language
            .and_then(|lang| self.titles.get(lang))
            .or_else(|| self.titles.get(&self.default_language))
            .map(String::as_str)
            .unwrap_or(&self.key)
    }

    /// Whether `amount` lies within this method's bounds.
    ///
    /// Fails when `currency` is not the currency the catalog was fetched for.
    pub fn is_available_for_amount(&self, amount: u64, currency: &str) -> Result<bool> {
        if self.currency != currency {
            return Err(WebToPayError::Catalog(format!(
                "currencies do not match: given {currency}, available {}",
                self.currency
            )));
        }
        Ok(self.min_amount.is_none_or(|min| amount >= min)
            && self.max_amount.is_none_or(|max| amount <= max))
    }

    /// `"<min> <currency>"`, or empty when there is no lower bound.
    pub fn min_amount_as_string(&self) -> String {
        self.min_amount
            .map(|amount| format!("{amount} {}", self.currency))
            .unwrap_or_default()
    }

    /// `"<max> <currency>"`, or empty when there is no upper bound.
    pub fn max_amount_as_string(&self) -> String {
        self.max_amount
            .map(|amount| format!("{amount} {}", self.currency))
            .unwrap_or_default()
    }
}
