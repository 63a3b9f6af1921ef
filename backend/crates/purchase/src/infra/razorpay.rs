//! Razorpay Orders API client
//!
//! `POST {base}/v1/orders` with HTTP Basic auth (key id / key secret).

use reqwest::StatusCode;

use crate::application::config::PurchaseConfig;
use crate::domain::gateway::{GatewayError, GatewayOrder, OrderDraft, PaymentGateway};
use crate::error::PurchaseResult;

/// HTTP payment gateway
#[derive(Clone)]
pub struct RazorpayGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(config: &PurchaseConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.gateway_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
            key_id: config.gateway_key_id.clone(),
            key_secret: config.gateway_key_secret.clone(),
        })
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.base_url)
    }
}

impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, draft: &OrderDraft) -> PurchaseResult<GatewayOrder> {
        let resp = self
            .client
            .post(self.orders_url())
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(draft)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let order = parse_order_response(status, &body)?;
        tracing::debug!(order_id = %order.id, receipt = %draft.receipt, "Gateway order created");
        Ok(order)
    }
}

/// Interpret the gateway's reply to an order creation request
fn parse_order_response(status: StatusCode, body: &str) -> Result<GatewayOrder, GatewayError> {
    if !status.is_success() {
        return Err(GatewayError::Api {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let order: GatewayOrder = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidResponse(format!("{e}; body={body}")))?;
    if order.id.is_empty() {
        return Err(GatewayError::InvalidResponse("empty order id".to_string()));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_order_body_shape() {
        let draft = OrderDraft {
            amount: 9900,
            currency: "INR".to_string(),
            receipt: "rcpt_1".to_string(),
            notes: BTreeMap::from([("user_id".to_string(), "u".to_string())]),
        };

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["amount"], 9900);
        assert_eq!(body["currency"], "INR");
        assert_eq!(body["receipt"], "rcpt_1");
        assert_eq!(body["notes"]["user_id"], "u");
    }

    #[test]
    fn test_parse_success() {
        let body = r#"{"id":"order_EKwxwAgItmmXdp","entity":"order","amount":9900,
            "amount_paid":0,"currency":"INR","receipt":"rcpt_1","status":"created"}"#;

        let order = parse_order_response(StatusCode::OK, body).unwrap();
        assert_eq!(order.id, "order_EKwxwAgItmmXdp");
        assert_eq!(order.amount, 9900);
        assert_eq!(order.status.as_deref(), Some("created"));
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"Authentication failed"}}"#;
        let err = parse_order_response(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 401, .. }));
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_order_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));

        let err = parse_order_response(
            StatusCode::OK,
            r#"{"id":"","amount":1,"currency":"INR"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = PurchaseConfig {
            gateway_base_url: "http://localhost:9000/".to_string(),
            ..PurchaseConfig::development()
        };
        let gateway = RazorpayGateway::new(&config).unwrap();
        assert_eq!(gateway.orders_url(), "http://localhost:9000/v1/orders");
    }
}
