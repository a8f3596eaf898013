mod common;

use common::MockTransport;
use std::sync::Arc;
use webtopay::constants::{PRODUCTION_SMS_ANSWER_URL, SANDBOX_SMS_ANSWER_URL};
use webtopay::security::md5_hex;
use webtopay::{Environment, SmsAnswerSender, UrlBuilder, WebToPayError};

fn sender(transport: Arc<MockTransport>) -> SmsAnswerSender<MockTransport> {
    SmsAnswerSender::new("secret", transport, UrlBuilder::new(Environment::Production))
}

#[tokio::test]
async fn test_answer_accepted() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(PRODUCTION_SMS_ANSWER_URL, "OK");
    sender(Arc::clone(&transport))
        .send_answer("55", "Thank you for your order")
        .await
        .unwrap();

    let transaction = md5_hex(&[b"secret|55"]);
    assert_eq!(
        transport.calls(),
        vec![format!(
            "{PRODUCTION_SMS_ANSWER_URL}?id=55&msg=Thank+you+for+your+order&transaction={transaction}"
        )]
    );
}

#[tokio::test]
async fn test_ok_prefix_is_enough() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(PRODUCTION_SMS_ANSWER_URL, "OK 1 message sent");
    assert!(sender(transport).send_answer("1", "hi").await.is_ok());
}

#[tokio::test]
async fn test_answer_rejected() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(PRODUCTION_SMS_ANSWER_URL, "ERROR: bad transaction");
    let err = sender(transport).send_answer("55", "hi").await.unwrap_err();
    match err {
        WebToPayError::SmsAnswer(body) => assert_eq!(body, "ERROR: bad transaction"),
        other => panic!("expected SmsAnswer, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    // Nothing registered for the production route.
    let transport = Arc::new(MockTransport::new());
    transport.respond(SANDBOX_SMS_ANSWER_URL, "OK");
    let err = sender(transport).send_answer("55", "hi").await.unwrap_err();
    assert!(matches!(err, WebToPayError::Transport(_)));
}
