use super::method::PaymentMethod;
use crate::constants::DEFAULT_LANGUAGE;
use crate::error::Result;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Payment methods of one kind (e-banking, cards, ...) within a country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodGroup {
    key: String,
    titles: HashMap<String, String>,
    default_language: String,
    methods: IndexMap<String, PaymentMethod>,
}

impl PaymentMethodGroup {
    pub fn new(key: impl Into<String>, titles: HashMap<String, String>) -> Self {
        Self {
            key: key.into(),
            titles,
            default_language: DEFAULT_LANGUAGE.to_string(),
            methods: IndexMap::new(),
        }
    }

    fn empty_copy(&self) -> Self {
        Self {
            key: self.key.clone(),
            titles: self.titles.clone(),
            default_language: self.default_language.clone(),
            methods: IndexMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Title for `language`, else for the default language, else the key.
    pub fn title(&self, language: Option<&str>) -> &str {
        language
            .and_then(|lang| self.titles.get(lang))
            .or_else(|| self.titles.get(&self.default_language))
            .map(String::as_str)
            .unwrap_or(&self.key)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Set the title language here and in every method of the group.
    pub fn set_default_language(&mut self, language: &str) -> &mut Self {
        self.default_language = language.to_string();
        for method in self.methods.values_mut() {
            method.set_default_language(language);
        }
        self
    }

    pub fn payment_method(&self, key: &str) -> Option<&PaymentMethod> {
        self.methods.get(key)
    }

    pub fn payment_methods(&self) -> impl Iterator<Item = &PaymentMethod> {
        self.methods.values()
    }

    /// Add a method, replacing any earlier one with the same key.
    pub(crate) fn add_payment_method(&mut self, method: PaymentMethod) -> &mut PaymentMethod {
        let key = method.key().to_string();
        let (index, _) = self.methods.insert_full(key, method);
        &mut self.methods[index]
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// New group holding only the methods available for `amount`.
    pub fn filter_for_amount(&self, amount: u64, currency: &str) -> Result<Self> {
        let mut group = self.empty_copy();
        for method in self.methods.values() {
            if method.is_available_for_amount(amount, currency)? {
                group.add_payment_method(method.clone());
            }
        }
        Ok(group)
    }

    /// New group holding only the methods whose IBAN flag equals `is_iban`.
    pub fn filter_for_iban(&self, is_iban: bool) -> Self {
        let mut group = self.empty_copy();
        for method in self.methods.values().filter(|m| m.is_iban() == is_iban) {
            group.add_payment_method(method.clone());
        }
        group
    }
}
