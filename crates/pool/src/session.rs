//! Network sessions used by workers to fetch URLs.
//!
//! A worker opens one session the first time it meets a URL and keeps it
//! until the worker finishes; dropping the session releases its connections
//! on every exit path, including failures.

use async_trait::async_trait;
use coop_core::HttpConfig;
use tracing::debug;

use crate::error::WorkError;

/// Opens sessions for the event-loop pool.
pub trait Connector: Send + Sync + 'static {
    type Session: Session + 'static;

    fn connect(&self) -> Result<Self::Session, WorkError>;
}

/// An open HTTP session that can GET a URL without blocking the executor.
#[async_trait]
pub trait Session: Send {
    /// GET `url`, consume the whole body and return its length in bytes.
    async fn get(&mut self, url: &str) -> Result<u64, WorkError>;
}

/// Opens sessions for the cooperative (step-driven) pool.
pub trait BlockingConnector {
    type Session: BlockingSession;

    fn open(&self) -> Result<Self::Session, WorkError>;
}

/// An open HTTP session whose GET blocks the calling thread.
pub trait BlockingSession {
    /// GET `url`, consume the whole body and return its length in bytes.
    fn get(&mut self, url: &str) -> Result<u64, WorkError>;
}

/// reqwest-backed connector for both pool flavours.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    config: HttpConfig,
}

impl HttpConnector {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl Connector for HttpConnector {
    type Session = HttpSession;

    fn connect(&self) -> Result<HttpSession, WorkError> {
        let mut builder = reqwest::Client::builder().user_agent(self.config.user_agent.as_str());
        if let Some(timeout) = self.config.timeout() {
            builder = builder.timeout(timeout);
        }
        debug!("opening HTTP session");
        Ok(HttpSession { client: builder.build()? })
    }
}

impl BlockingConnector for HttpConnector {
    type Session = BlockingHttpSession;

    fn open(&self) -> Result<BlockingHttpSession, WorkError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(self.config.timeout())
            .build()?;
        debug!("opening blocking HTTP session");
        Ok(BlockingHttpSession { client })
    }
}

/// Pooled async client; status codes are not treated as failures.
#[derive(Debug)]
pub struct HttpSession {
    client: reqwest::Client,
}

#[async_trait]
impl Session for HttpSession {
    async fn get(&mut self, url: &str) -> Result<u64, WorkError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(url, %status, bytes = body.len(), "fetched");
        Ok(body.len() as u64)
    }
}

/// Pooled blocking client; status codes are not treated as failures.
#[derive(Debug)]
pub struct BlockingHttpSession {
    client: reqwest::blocking::Client,
}

impl BlockingSession for BlockingHttpSession {
    fn get(&mut self, url: &str) -> Result<u64, WorkError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.bytes()?;
        debug!(url, %status, bytes = body.len(), "fetched");
        Ok(body.len() as u64)
    }
}
