use super::country::PaymentMethodCountry;
use crate::constants::DEFAULT_LANGUAGE;
use crate::error::{Result, WebToPayError};
use indexmap::IndexMap;
use std::borrow::Cow;

/// All payment methods of a project for one currency, optionally narrowed to
/// a single amount.
///
/// Filtering never mutates a list; it returns a new one with empty countries
/// and groups pruned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodList {
    project_id: String,
    currency: String,
    default_language: String,
    amount: Option<u64>,
    countries: IndexMap<String, PaymentMethodCountry>,
}

impl PaymentMethodList {
    pub fn new(project_id: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            currency: currency.into(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            amount: None,
            countries: IndexMap::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Currency of all min/max amounts in this list.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Amount this list was filtered for, if any.
    pub fn amount(&self) -> Option<u64> {
        self.amount
    }

    pub fn is_filtered(&self) -> bool {
        self.amount.is_some()
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Set the title language for the whole hierarchy.
    pub fn set_default_language(&mut self, language: &str) -> &mut Self {
        self.default_language = language.to_string();
        for country in self.countries.values_mut() {
            country.set_default_language(language);
        }
        self
    }

    pub fn country(&self, code: &str) -> Option<&PaymentMethodCountry> {
        self.countries.get(code)
    }

    pub fn countries(&self) -> impl Iterator<Item = &PaymentMethodCountry> {
        self.countries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Add a country, replacing any earlier one with the same code.
    pub(crate) fn add_country(
        &mut self,
        country: PaymentMethodCountry,
    ) -> &mut PaymentMethodCountry {
        let code = country.code().to_string();
        let (index, _) = self.countries.insert_full(code, country);
        &mut self.countries[index]
    }

    fn empty_copy(&self, amount: Option<u64>) -> Self {
        Self {
            project_id: self.project_id.clone(),
            currency: self.currency.clone(),
            default_language: self.default_language.clone(),
            amount,
            countries: IndexMap::new(),
        }
    }

    /// List holding only the methods available for `amount`.
    ///
    /// A list already filtered for the same amount is returned as is
    /// (borrowed); filtering it for another amount is an error, as is a
    /// currency other than the list's.
    pub fn filter_for_amount(&self, amount: u64, currency: &str) -> Result<Cow<'_, Self>> {
        if currency != self.currency {
            return Err(WebToPayError::Catalog(format!(
                "currencies do not match: given {currency}, list currency {}",
                self.currency
            )));
        }
        match self.amount {
            Some(filtered) if filtered == amount => return Ok(Cow::Borrowed(self)),
            Some(filtered) => {
                return Err(WebToPayError::Catalog(format!(
                    "list is already filtered for amount {filtered}, use the unfiltered list instead"
                )));
            }
            None => {}
        }

        let mut list = self.empty_copy(Some(amount));
        for country in self.countries.values() {
            let country = country.filter_for_amount(amount, currency)?;
            if !country.is_empty() {
                list.add_country(country);
            }
        }
        Ok(Cow::Owned(list))
    }

    /// List holding only the methods whose IBAN flag equals `is_iban`.
    /// The amount filter, if any, is kept.
    pub fn filter_for_iban(&self, is_iban: bool) -> Self {
        let mut list = self.empty_copy(self.amount);
        for country in self.countries.values() {
            let country = country.filter_for_iban(is_iban);
            if !country.is_empty() {
                list.add_country(country);
            }
        }
        list
    }
}
