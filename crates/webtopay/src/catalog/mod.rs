//! Payment-method catalog: list, countries, groups and methods, with amount
//! and IBAN filtering.

mod country;
mod group;
mod list;
mod method;
mod xml;

pub use country::PaymentMethodCountry;
pub use group::PaymentMethodGroup;
pub use list::PaymentMethodList;
pub use method::PaymentMethod;
pub use xml::parse_payment_method_list;
