#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use webtopay::http_client::with_query;
use webtopay::{Result, Transport, WebToPayError};

/// In-memory transport serving canned bodies by URL (query excluded).
/// Records every requested URL, query included.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
    count: AtomicUsize,
    delay: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every response for `delay`, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn respond(&self, url: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(with_query(url, query));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let body = self.responses.lock().unwrap().get(url).cloned();
        body.ok_or_else(|| WebToPayError::Transport(format!("no response for {url}")))
    }
}

pub const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<payment_types_document project_id="123">
  <country code="lt">
    <title language="lt">Lietuva</title>
    <title language="en">Lithuania</title>
    <payment_group key="e-banking">
      <title language="en">E-banking</title>
      <payment_type key="hanza">
        <title language="lt">Swedbank</title>
        <logo_url language="lt">https://example.com/hanza.png</logo_url>
        <min amount="100" currency="EUR"/>
        <max amount="1000000" currency="EUR"/>
        <is_iban>1</is_iban>
      </payment_type>
      <payment_type key="vb2">
        <title language="lt">SEB</title>
        <max amount="500" currency="EUR"/>
        <is_iban>0</is_iban>
      </payment_type>
    </payment_group>
  </country>
  <country code="lv">
    <title language="lv">Latvija</title>
    <payment_group key="cards">
      <payment_type key="card">
        <min amount="5000" currency="EUR"/>
      </payment_type>
    </payment_group>
  </country>
</payment_types_document>"#;
