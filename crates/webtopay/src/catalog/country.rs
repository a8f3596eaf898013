use super::group::PaymentMethodGroup;
use super::method::PaymentMethod;
use crate::constants::DEFAULT_LANGUAGE;
use crate::error::Result;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Payment method groups available in one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodCountry {
    code: String,
    titles: HashMap<String, String>,
    default_language: String,
    groups: IndexMap<String, PaymentMethodGroup>,
}

impl PaymentMethodCountry {
    pub fn new(code: impl Into<String>, titles: HashMap<String, String>) -> Self {
        Self {
            code: code.into(),
            titles,
            default_language: DEFAULT_LANGUAGE.to_string(),
            groups: IndexMap::new(),
        }
    }

    fn empty_copy(&self) -> Self {
        Self {
            code: self.code.clone(),
            titles: self.titles.clone(),
            default_language: self.default_language.clone(),
            groups: IndexMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Title for `language`, else for the default language, else the code.
    pub fn title(&self, language: Option<&str>) -> &str {
        language
            .and_then(|lang| self.titles.get(lang))
            .or_else(|| self.titles.get(&self.default_language))
            .map(String::as_str)
            .unwrap_or(&self.code)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Set the title language here and in every group and method below.
    pub fn set_default_language(&mut self, language: &str) -> &mut Self {
        self.default_language = language.to_string();
        for group in self.groups.values_mut() {
            group.set_default_language(language);
        }
        self
    }

    pub fn group(&self, key: &str) -> Option<&PaymentMethodGroup> {
        self.groups.get(key)
    }

    pub fn groups(&self) -> impl Iterator<Item = &PaymentMethodGroup> {
        self.groups.values()
    }

    /// Methods of all groups, in group order.
    pub fn payment_methods(&self) -> Vec<&PaymentMethod> {
        self.groups
            .values()
            .flat_map(PaymentMethodGroup::payment_methods)
            .collect()
    }

    /// Add a group, replacing any earlier one with the same key.
    pub(crate) fn add_group(&mut self, group: PaymentMethodGroup) -> &mut PaymentMethodGroup {
        let key = group.key().to_string();
        let (index, _) = self.groups.insert_full(key, group);
        &mut self.groups[index]
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// New country holding only methods available for `amount`; groups left
    /// empty are dropped.
    pub fn filter_for_amount(&self, amount: u64, currency: &str) -> Result<Self> {
        let mut country = self.empty_copy();
        for group in self.groups.values() {
            let group = group.filter_for_amount(amount, currency)?;
            if !group.is_empty() {
                country.add_group(group);
            }
        }
        Ok(country)
    }

    /// New country holding only methods whose IBAN flag equals `is_iban`;
    /// groups left empty are dropped.
    pub fn filter_for_iban(&self, is_iban: bool) -> Self {
        let mut country = self.empty_copy();
        for group in self.groups.values() {
            let group = group.filter_for_iban(is_iban);
            if !group.is_empty() {
                country.add_group(group);
            }
        }
        country
    }
}
