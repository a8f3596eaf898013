//! Loader for the payment-method catalog document.
//!
//! The document is read into a small element tree first, then walked into a
//! [`PaymentMethodList`]. Unknown elements are ignored.

use super::{PaymentMethod, PaymentMethodCountry, PaymentMethodGroup, PaymentMethodList};
use crate::error::{Result, WebToPayError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    attributes: HashMap<String, String>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// `language` attribute to text map of all children named `name`.
    fn translations(&self, name: &str) -> HashMap<String, String> {
        self.children_named(name)
            .map(|n| (n.attr("language").unwrap_or_default().to_string(), n.text.clone()))
            .collect()
    }
}

fn xml_error(e: impl std::fmt::Display) -> WebToPayError {
    WebToPayError::Catalog(format!("XML parse error: {e}"))
}

fn start_node(e: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode {
        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        ..XmlNode::default()
    };
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_error)?.into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

fn parse_tree(bytes: &[u8]) -> Result<XmlNode> {
    let mut reader = Reader::from_reader(bytes);
    let mut stack: Vec<XmlNode> = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => stack.push(start_node(&e)?),
            Event::Empty(e) => {
                let node = start_node(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::End(_) => {
                let Some(mut node) = stack.pop() else {
                    return Err(xml_error("unbalanced end tag"));
                };
                node.text = node.text.trim().to_string();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::Text(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&e.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => return Err(xml_error("document has no root element")),
            _ => {}
        }
    }
}

fn parse_amount(node: &XmlNode) -> Result<Option<u64>> {
    node.attr("amount")
        .filter(|a| !a.is_empty())
        .map(|a| {
            a.trim()
                .parse::<u64>()
                .map_err(|_| {
                    WebToPayError::Catalog(format!("invalid amount '{a}' in <{}>", node.name))
                })
        })
        .transpose()
}

fn load_payment_method(node: &XmlNode, list_currency: &str) -> Result<PaymentMethod> {
    let key = node.attr("key").unwrap_or_default();
    let min = node.child("min");
    let max = node.child("max");

    let min_amount = min.map(parse_amount).transpose()?.flatten();
    let max_amount = max.map(parse_amount).transpose()?.flatten();
    let currency = min
        .or(max)
        .and_then(|n| n.attr("currency"))
        .filter(|c| !c.is_empty())
        .unwrap_or(list_currency);

    let logo_urls = node
        .translations("logo_url")
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .collect();

    let mut method = PaymentMethod::new(key, currency)
        .with_amount_range(min_amount, max_amount)
        .with_titles(node.translations("title"))
        .with_logo_urls(logo_urls);
    if let Some(is_iban) = node.child("is_iban") {
        method.set_is_iban(is_iban.text == "1");
    }
    if let Some(base) = node.child("base_currency").filter(|n| !n.text.is_empty()) {
        method.set_base_currency(Some(base.text.clone()));
    }
    Ok(method)
}

/// Parse a catalog document fetched for `project_id` and `currency`.
pub fn parse_payment_method_list(
    project_id: &str,
    currency: &str,
    bytes: &[u8],
) -> Result<PaymentMethodList> {
    let root = parse_tree(bytes)?;
    let mut list = PaymentMethodList::new(project_id, currency);

    for country_node in root.children_named("country") {
        let code = country_node.attr("code").unwrap_or_default();
        let country = list.add_country(PaymentMethodCountry::new(
            code,
            country_node.translations("title"),
        ));
        for group_node in country_node.children_named("payment_group") {
            let group = country.add_group(PaymentMethodGroup::new(
                group_node.attr("key").unwrap_or_default(),
                group_node.translations("title"),
            ));
            for type_node in group_node.children_named("payment_type") {
                group.add_payment_method(load_payment_method(type_node, currency)?);
            }
        }
    }

    tracing::debug!(
        project_id,
        currency,
        countries = list.countries().count(),
        "Parsed payment method list"
    );
    Ok(list)
}
