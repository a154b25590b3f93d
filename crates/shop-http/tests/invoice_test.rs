//! Bot API invoice issuer against a mock Bot API

use serde_json::json;
use shop_core::Currency;
use shop_http::{
    BotConfig, InvoiceDraft, InvoiceError, InvoiceIssuer, LabeledPrice, TelegramInvoiceIssuer,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw";

fn issuer_for(server: &MockServer) -> TelegramInvoiceIssuer {
    let config = BotConfig::new(TOKEN, "284685063:TEST:provider")
        .unwrap()
        .with_api_base_url(server.uri());
    TelegramInvoiceIssuer::new(config).unwrap()
}

fn draft() -> InvoiceDraft {
    InvoiceDraft::new("Order 42", "Cake x2", "order-42", Currency::RUB)
        .with_price(LabeledPrice::new("Cake x2", 50000))
        .with_price(LabeledPrice::new("Delivery", 15000))
}

fn invoice_path() -> String {
    format!("/bot{TOKEN}/createInvoiceLink")
}

#[tokio::test]
async fn test_creates_invoice_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(invoice_path()))
        .and(body_json(json!({
            "title": "Order 42",
            "description": "Cake x2",
            "payload": "order-42",
            "provider_token": "284685063:TEST:provider",
            "currency": "RUB",
            "prices": [
                {"label": "Cake x2", "amount": 50000},
                {"label": "Delivery", "amount": 15000}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "result": "https://t.me/$AbCdEf"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = issuer_for(&server)
        .create_invoice_link(&draft())
        .await
        .unwrap();

    assert_eq!(handle.as_str(), "https://t.me/$AbCdEf");
}

#[tokio::test]
async fn test_api_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(invoice_path()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: CURRENCY_TOTAL_AMOUNT_INVALID"
        })))
        .mount(&server)
        .await;

    let err = issuer_for(&server)
        .create_invoice_link(&draft())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        InvoiceError::Api {
            status: 400,
            description: "Bad Request: CURRENCY_TOTAL_AMOUNT_INVALID".into()
        }
    );
}

#[tokio::test]
async fn test_undecodable_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(invoice_path()))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = issuer_for(&server)
        .create_invoice_link(&draft())
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::Malformed(_)));
}

#[tokio::test]
async fn test_invalid_draft_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let empty = InvoiceDraft::new("Order 42", "Nothing", "order-42", Currency::RUB);
    let err = issuer_for(&server)
        .create_invoice_link(&empty)
        .await
        .unwrap_err();

    assert!(matches!(err, InvoiceError::InvalidDraft(_)));
}
