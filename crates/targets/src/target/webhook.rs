// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::arn::Arn;
use crate::error::TargetError;
use crate::target::{DeliveryRequest, DestinationKind, DestinationTransport};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Arguments for configuring a webhook transport
#[derive(Debug, Clone)]
pub struct WebhookArgs {
    /// Base URL, messages go to `{endpoint}/{service}`
    pub endpoint: Url,
    /// The authorization token for the endpoint
    pub auth_token: String,
    pub timeout: Duration,
}

impl WebhookArgs {
    pub fn new(endpoint: &str) -> Result<Self, TargetError> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            auth_token: String::new(),
            timeout: Duration::from_secs(30),
        })
    }

    /// WebhookArgs verification method
    pub fn validate(&self) -> Result<(), TargetError> {
        match self.endpoint.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(TargetError::Configuration(format!("unsupported webhook scheme '{scheme}'")));
            }
        }
        if self.endpoint.host_str().is_none() {
            return Err(TargetError::Configuration("webhook endpoint has no host".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(TargetError::Configuration("webhook timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// Forwards every outbound message as JSON to an HTTP endpoint.
///
/// Existence checks are `HEAD {endpoint}/{service}/{arn}`; deliveries are
/// `POST {endpoint}/{service}` with a serialized [`DeliveryRequest`] body.
pub struct WebhookTransport {
    args: WebhookArgs,
    http_client: Client,
}

impl WebhookTransport {
    /// Creates a new WebhookTransport
    #[instrument(skip(args), fields(endpoint = %args.endpoint))]
    pub fn new(args: WebhookArgs) -> Result<Self, TargetError> {
        args.validate()?;
        let http_client = Client::builder()
            .timeout(args.timeout)
            .build()
            .map_err(|e| TargetError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        info!("Webhook transport created");
        Ok(Self { args, http_client })
    }

    /// URL for a service, optionally narrowed to one resource.
    pub fn service_url(&self, kind: DestinationKind, resource: Option<&str>) -> Result<Url, TargetError> {
        let mut url = self.args.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TargetError::Configuration(format!("{} cannot be a base URL", self.args.endpoint)))?;
            segments.pop_if_empty().push(kind.service_name());
            if let Some(resource) = resource {
                segments.push(resource);
            }
        }
        Ok(url)
    }

    fn authorize(&self, mut req_builder: RequestBuilder) -> RequestBuilder {
        if !self.args.auth_token.is_empty() {
            let tokens: Vec<&str> = self.args.auth_token.split_whitespace().collect();
            match tokens.len() {
                // Already include authentication type and token, such as "Bearer token123"
                2 => req_builder = req_builder.header("Authorization", &self.args.auth_token),
                1 => req_builder = req_builder.header("Authorization", format!("Bearer {}", self.args.auth_token)),
                _ => {}
            }
        }
        req_builder
    }

    fn check_status(resp: &Response, destination: &str) -> Result<(), TargetError> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::NOT_FOUND {
            Err(TargetError::NotFound(destination.to_string()))
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(TargetError::AccessDenied(format!("{destination} returned '{status}'")))
        } else {
            Err(TargetError::Request(format!("{destination} returned '{status}'")))
        }
    }
}

#[async_trait]
impl DestinationTransport for WebhookTransport {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn lookup(&self, kind: DestinationKind, arn: &Arn) -> Result<(), TargetError> {
        let destination = arn.to_arn_string();
        let url = self.service_url(kind, Some(&destination))?;
        debug!("Looking up destination {} at {}", destination, url);
        let resp = self.authorize(self.http_client.head(url)).send().await?;
        Self::check_status(&resp, &destination)
    }

    async fn send(&self, request: DeliveryRequest) -> Result<(), TargetError> {
        let kind = request.message.kind();
        let destination = request.message.destination();
        let url = self.service_url(kind, None)?;
        let body = serde_json::to_vec(&request)?;
        debug!("Sending {} message for {} to {}", kind, destination, url);

        let resp = self
            .authorize(self.http_client.post(url))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Self::check_status(&resp, &destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::OutboundMessage;

    #[test]
    fn test_args_validation() {
        assert!(WebhookArgs::new("http://localhost:4566").unwrap().validate().is_ok());
        assert!(WebhookArgs::new("ftp://localhost").unwrap().validate().is_err());
        assert!(WebhookArgs::new("not a url").is_err());

        let mut args = WebhookArgs::new("https://example.com/hooks").unwrap();
        args.timeout = Duration::ZERO;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_service_url() {
        let transport = WebhookTransport::new(WebhookArgs::new("http://localhost:4566/hooks/").unwrap()).unwrap();
        let url = transport.service_url(DestinationKind::Queue, None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4566/hooks/sqs");

        let url = transport
            .service_url(DestinationKind::Function, Some("arn:aws:lambda:us-east-1:0:function:f"))
            .unwrap();
        assert_eq!(url.path(), "/hooks/lambda/arn:aws:lambda:us-east-1:0:function:f");
    }

    #[tokio::test]
    async fn test_send_to_unreachable_endpoint_fails() {
        let mut args = WebhookArgs::new("http://127.0.0.1:1").unwrap();
        args.timeout = Duration::from_secs(2);
        let transport = WebhookTransport::new(args).unwrap();
        let request = DeliveryRequest::new(OutboundMessage::Topic {
            topic_arn: "arn:aws:sns:us-east-1:000000000000:t".to_string(),
            message: "{}".to_string(),
            subject: "s".to_string(),
        });
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, TargetError::Network(_) | TargetError::Timeout(_) | TargetError::Request(_)));
    }
}
