//! Connections to the CAM API
//!
//! [`CamConnection`] is the seam between the client and the transport. The
//! HTTP implementation POSTs a form-encoded body to the appliance's API page
//! with Basic authentication and decodes the HTML table it returns.

use crate::config::CamConfig;
use crate::content_type::ContentType;
use crate::decoder::decode_payload;
use crate::error::{CamError, ConnectionError, InvalidArgument};
use crate::request::CamRequest;
use crate::response::CamResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Proxy;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Path of the API page below the appliance base URL
pub const API_PATH: &str = "/admin/cisco_api.jsp";

/// User agent sent when none has been configured
pub const DEFAULT_USER_AGENT: &str = concat!("cam-client/", env!("CARGO_PKG_VERSION"));

/// Form field carrying the operation identifier
pub const OPERATION_FIELD: &str = "op";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for submitting requests to an appliance
///
/// One request is in flight at a time; implementations are not reentrant.
pub trait CamConnection {
    /// Perform one request/response exchange
    fn submit_request(&self, request: &CamRequest) -> Result<CamResponse, ConnectionError>;

    /// The User-Agent sent with every request
    fn user_agent(&self) -> &str;

    /// Replace the User-Agent; empty values are rejected
    fn set_user_agent(&mut self, user_agent: &str) -> Result<(), InvalidArgument>;
}

/// An HTTP request described as plain data, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

/// Blocking HTTP(S) connection to a single appliance
pub struct HttpCamConnection {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    user_agent: String,
}

impl HttpCamConnection {
    /// Create a new connection
    ///
    /// # Arguments
    /// * `base_url` - Appliance base URL (e.g., "https://cam.example.com")
    /// * `username` - API administrator name
    /// * `password` - API administrator password
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, CamError> {
        Self::build(base_url, username, password, DEFAULT_TIMEOUT, None)
    }

    /// Create a connection that reaches the appliance through `proxy_url`
    ///
    /// # Arguments
    /// * `proxy_url` - HTTP(S) proxy (e.g., "http://proxy.example.com:3128")
    pub fn with_proxy(base_url: &str, username: &str, password: &str, proxy_url: &str) -> Result<Self, CamError> {
        Self::build(base_url, username, password, DEFAULT_TIMEOUT, Some(proxy_url))
    }

    /// Create a connection from loaded configuration
    pub fn from_config(config: &CamConfig) -> Result<Self, CamError> {
        let mut conn = Self::build(
            &config.url,
            &config.username,
            &config.password,
            config.timeout(),
            config.proxy.as_deref(),
        )?;
        if let Some(user_agent) = &config.user_agent {
            conn.set_user_agent(user_agent)?;
        }
        Ok(conn)
    }

    fn build(
        base_url: &str,
        username: &str,
        password: &str,
        timeout: Duration,
        proxy_url: Option<&str>,
    ) -> Result<Self, CamError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(InvalidArgument::new("appliance URL cannot be empty").into());
        }
        reqwest::Url::parse(base_url)
            .map_err(|e| InvalidArgument::new(format!("invalid appliance URL {base_url}: {e}")))?;
        if timeout.is_zero() {
            return Err(InvalidArgument::new("timeout must be greater than zero").into());
        }

        // A 3xx must surface as a status error, never as the page it points to
        let mut builder = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none());
        if let Some(proxy_url) = proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| InvalidArgument::new(format!("invalid proxy URL {proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(ConnectionError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the API page
    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url, API_PATH)
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    /// Build the POST for `request` without sending it
    pub fn encode_request(&self, request: &CamRequest) -> EncodedRequest {
        EncodedRequest {
            url: self.api_url(),
            headers: vec![
                ("authorization", self.auth_header()),
                ("user-agent", self.user_agent.clone()),
                ("accept", "text/html".to_string()),
                ("content-type", FORM_CONTENT_TYPE.to_string()),
            ],
            body: encode_form(request),
        }
    }
}

impl fmt::Debug for HttpCamConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCamConnection")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl CamConnection for HttpCamConnection {
    fn submit_request(&self, request: &CamRequest) -> Result<CamResponse, ConnectionError> {
        let encoded = self.encode_request(request);
        debug!("POST {} op={}", encoded.url, request.operation());

        let mut builder = self.client.post(&encoded.url);
        for (name, value) in &encoded.headers {
            builder = builder.header(*name, value);
        }
        let response = builder.body(encoded.body).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ConnectionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .ok_or(ConnectionError::MissingContentType)?
            .to_str()
            .map_err(|e| {
                ConnectionError::InvalidContentType(InvalidArgument::new(format!(
                    "non-ASCII Content-Type header: {e}"
                )))
            })?;
        let content_type =
            ContentType::parse(content_type).map_err(ConnectionError::InvalidContentType)?;
        if !is_supported(&content_type) {
            return Err(ConnectionError::UnsupportedContentType(content_type));
        }

        let body = response.bytes()?;
        let rows = decode_payload(&body, &content_type)?;
        debug!("op={} returned {} rows", request.operation(), rows.len());

        Ok(CamResponse::from_rows(status.as_u16(), rows))
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn set_user_agent(&mut self, user_agent: &str) -> Result<(), InvalidArgument> {
        if user_agent.trim().is_empty() {
            return Err(InvalidArgument::new("user agent cannot be empty"));
        }
        self.user_agent = user_agent.to_string();
        Ok(())
    }
}

/// Form-encode `op` followed by the request parameters in declared order
pub fn encode_form(request: &CamRequest) -> String {
    std::iter::once((OPERATION_FIELD, request.operation().as_str().to_string()))
        .chain(
            request
                .parameters()
                .into_iter()
                .map(|(name, value)| (name.as_str(), value)),
        )
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(&v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Content types the payload decoder handles
pub fn is_supported(content_type: &ContentType) -> bool {
    content_type.is("text", "html") || content_type.is("application", "xhtml+xml")
}
