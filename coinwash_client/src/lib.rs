//! Client library of the Coinwash server.

use ::core::{fmt::Display, future::Future};

use ::coinwash_common::{
    machine::{
        BrowserNotification, Machine, MachineId, MachineStatus, NotificationAck,
        SetStatusRequest, StartMachineRequest, StartMachineResponse,
    },
    serde::{de::DeserializeOwned, Deserialize},
};
use ::reqwest::{Response, StatusCode};

pub mod coin;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of a call to the Coinwash server.
#[derive(Debug)]
pub enum ClientError {
    /// The request could not be sent or the response body could not be decoded.
    Http(reqwest::Error),
    /// The server answered with an error status.
    Api { status: StatusCode, message: String },
    /// The request was refused before being sent.
    Rejected(String),
}

impl ClientError {
    /// Http status of the failed call, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(e) => e.status(),
            Self::Api { status, .. } => Some(*status),
            Self::Rejected(_) => None,
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Http error: {}", e),
            Self::Api { status, message } => write!(f, "{}: {}", status, message),
            Self::Rejected(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// Body of error responses
#[derive(Deserialize)]
#[serde(crate = "coinwash_common::serde")]
struct ErrorBody {
    error: String,
}

/// Operations of the machine api.
pub trait MachineApi: Send + Sync + 'static {
    /// All machines ordered by id.
    fn list_machines(&self) -> impl Future<Output = Result<Vec<Machine>>> + Send;

    /// Create the default fleet if the store is empty.
    fn initialize_machines(&self) -> impl Future<Output = Result<Vec<Machine>>> + Send;

    /// Pay `amount` and start the machine.
    fn start_machine(
        &self,
        id: MachineId,
        amount: u32,
    ) -> impl Future<Output = Result<StartMachineResponse>> + Send;

    fn set_status(
        &self,
        id: MachineId,
        status: MachineStatus,
    ) -> impl Future<Output = Result<Machine>> + Send;

    /// Relay a notification to the server log.
    fn send_notification(
        &self,
        notification: &BrowserNotification,
    ) -> impl Future<Output = Result<NotificationAck>> + Send;
}

/// Client for the machine api of a Coinwash server.
#[derive(Clone)]
pub struct MachineClient {
    /// Base URL of the Coinwash server.
    base_url: String,
    /// HTTP client for making requests to the Coinwash server.
    client: reqwest::Client,
}

impl MachineClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        self.base_url.clone() + path
    }
}

impl MachineApi for MachineClient {
    async fn list_machines(&self) -> Result<Vec<Machine>> {
        let url = self.build_url("/machines");
        let response = self.client.get(url).send().await?;
        parse_response(response).await
    }

    async fn initialize_machines(&self) -> Result<Vec<Machine>> {
        let url = self.build_url("/machines");
        let response = self.client.post(url).send().await?;
        parse_response(response).await
    }

    async fn start_machine(&self, id: MachineId, amount: u32) -> Result<StartMachineResponse> {
        let url = self.build_url(&format!("/machines/{}/start", id));
        let response = self
            .client
            .post(url)
            .json(&StartMachineRequest { amount })
            .send()
            .await?;
        parse_response(response).await
    }

    async fn set_status(&self, id: MachineId, status: MachineStatus) -> Result<Machine> {
        let url = self.build_url(&format!("/machines/{}/status", id));
        let response = self
            .client
            .put(url)
            .json(&SetStatusRequest { status })
            .send()
            .await?;
        parse_response(response).await
    }

    async fn send_notification(
        &self,
        notification: &BrowserNotification,
    ) -> Result<NotificationAck> {
        let url = self.build_url("/notifications/browser");
        let response = self.client.post(url).json(notification).send().await?;
        parse_response(response).await
    }
}

/// Decode a successful response as `T`,
/// or turn an error response into [ClientError::Api] carrying the server message.
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody { error }) => error,
        Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_owned(),
    };
    Err(ClientError::Api { status, message })
}
