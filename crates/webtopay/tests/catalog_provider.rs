mod common;

use common::{MockTransport, CATALOG};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use webtopay::{Environment, PaymentMethodListProvider, UrlBuilder, WebToPayError};

const EUR_URL: &str = "https://www.paysera.com/new/api/paymentMethods/123/currency:EUR";

fn provider(transport: Arc<MockTransport>) -> PaymentMethodListProvider<MockTransport> {
    PaymentMethodListProvider::new("123", transport, UrlBuilder::new(Environment::Production))
}

#[tokio::test]
async fn test_fetches_and_parses_catalog() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(EUR_URL, CATALOG);
    let provider = provider(Arc::clone(&transport));

    let list = provider.payment_method_list("EUR").await.unwrap();
    assert_eq!(list.project_id(), "123");
    assert_eq!(list.currency(), "EUR");
    assert_eq!(list.countries().count(), 2);

    let lt = list.country("lt").unwrap();
    assert_eq!(lt.title(Some("en")), "Lithuania");
    let hanza = lt.group("e-banking").unwrap().payment_method("hanza").unwrap();
    assert_eq!(hanza.min_amount_as_string(), "100 EUR");
    assert_eq!(hanza.max_amount_as_string(), "1000000 EUR");

    assert_eq!(transport.calls(), vec![EUR_URL.to_string()]);
}

#[tokio::test]
async fn test_catalog_is_cached_per_currency() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(EUR_URL, CATALOG);
    let provider = provider(Arc::clone(&transport));

    let first = provider.payment_method_list("EUR").await.unwrap();
    let second = provider.payment_method_list("EUR").await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(transport.call_count(), 1);

    // Another currency is a separate fetch (which fails here: no response set).
    let err = provider.payment_method_list("USD").await.unwrap_err();
    assert!(matches!(err, WebToPayError::Transport(_)));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(EUR_URL, "");
    let provider = provider(Arc::clone(&transport));

    let err = provider.payment_method_list("EUR").await.unwrap_err();
    assert!(matches!(err, WebToPayError::Catalog(_)));

    transport.respond(EUR_URL, CATALOG);
    let list = provider.payment_method_list("EUR").await.unwrap();
    assert_eq!(list.countries().count(), 2);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_malformed_catalog_is_catalog_error() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(EUR_URL, "<html><body>Maintenance</html>");
    let provider = provider(transport);

    let err = provider.payment_method_list("EUR").await.unwrap_err();
    assert!(matches!(err, WebToPayError::Catalog(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_one_fetch() {
    let transport = Arc::new(MockTransport::new().with_delay(Duration::from_millis(50)));
    transport.respond(EUR_URL, CATALOG);
    let provider = Arc::new(provider(Arc::clone(&transport)));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move { provider.payment_method_list("EUR").await })
        })
        .collect();

    let mut lists = Vec::new();
    for handle in handles {
        lists.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(transport.call_count(), 1);
    assert!(lists.iter().all(|l| Arc::ptr_eq(l, &lists[0])));
}

#[tokio::test]
async fn test_filtering_cached_catalog() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(EUR_URL, CATALOG);
    let provider = provider(transport);
    let list = provider.payment_method_list("EUR").await.unwrap();

    // 600: hanza only. SEB caps at 500 and the card needs 5000.
    let filtered = list.filter_for_amount(600, "EUR").unwrap();
    assert!(filtered.is_filtered());
    assert!(filtered.country("lv").is_none());
    let keys: Vec<_> = filtered
        .country("lt")
        .unwrap()
        .payment_methods()
        .iter()
        .map(|m| m.key())
        .collect();
    assert_eq!(keys, ["hanza"]);

    // Re-filtering for the same amount hands back the same list.
    let again = filtered.filter_for_amount(600, "EUR").unwrap();
    assert!(matches!(again, Cow::Borrowed(_)));

    assert!(matches!(
        filtered.filter_for_amount(300, "EUR"),
        Err(WebToPayError::Catalog(_))
    ));
    assert!(matches!(
        list.filter_for_amount(600, "USD"),
        Err(WebToPayError::Catalog(_))
    ));

    // The cached list itself is untouched.
    assert!(!list.is_filtered());
    assert_eq!(list.countries().count(), 2);

    let non_iban = list.filter_for_iban(false);
    let group = non_iban.country("lt").unwrap().group("e-banking").unwrap();
    assert!(group.payment_method("hanza").is_none());
    assert!(group.payment_method("vb2").is_some());
    assert!(non_iban.country("lv").is_some());
}
