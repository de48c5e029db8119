use crate::error::{DuplicateError, Result};
use crate::graph::Dispatch;
use crate::request::{Request, Response};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:4080";
pub const SESSION_HEADER: &str = "X-Session-Key";

pub struct ServerClient {
    base_url: String,
    session: String,
    client: reqwest::blocking::Client,
}

impl ServerClient {
    pub fn new(base_url: &str, session: &str, timeout_secs: f64) -> Result<Self> {
        let timeout = std::time::Duration::try_from_secs_f64(timeout_secs)
            .ok()
            .filter(|timeout| !timeout.is_zero())
            .ok_or(DuplicateError::InvalidTimeout)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session: session.to_string(),
            client,
        })
    }
}

impl Dispatch for ServerClient {
    fn submit(&self, request: &Request) -> Result<Response> {
        let url = format!("{}/api/cmd", self.base_url);
        tracing::debug!(%url, "posting graph request");
        let resp = self
            .client
            .post(&url)
            .header(SESSION_HEADER, &self.session)
            .json(request)
            .send()?;
        resp.error_for_status_ref()?;
        let payload: Response = resp.json()?;
        Ok(payload)
    }
}
