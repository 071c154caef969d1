//! SendMessage transport.

use async_trait::async_trait;
use chitchat_server::{
    domain::ClientId,
    infrastructure::dto::{http::ChatResponse, websocket::ChatMessage},
};
use reqwest::Url;

use crate::error::ClientError;

/// URLs of the two RPCs for one participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// StreamMessages (`ws://<addr>/ws?client_id=<id>`)
    pub stream: Url,
    /// SendMessage (`http://<addr>/api/messages`)
    pub messages: Url,
}

impl Endpoints {
    /// Build both endpoints from a `host:port` address
    pub fn new(server_addr: &str, client_id: &ClientId) -> Result<Self, ClientError> {
        let parse = |url: String| {
            Url::parse(&url).map_err(|e| ClientError::InvalidAddress {
                addr: server_addr.to_string(),
                reason: e.to_string(),
            })
        };

        let mut stream = parse(format!("ws://{server_addr}/ws"))?;
        stream
            .query_pairs_mut()
            .append_pair("client_id", client_id.as_str());
        let messages = parse(format!("http://{server_addr}/api/messages"))?;

        Ok(Self { stream, messages })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Post one chat message; a rejection comes back as `success: false`
    async fn send_message(&self, message: ChatMessage) -> Result<ChatResponse, ClientError>;
}

/// SendMessage over HTTP
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send_message(&self, message: ChatMessage) -> Result<ChatResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&message)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;
        Ok(response)
    }
}
