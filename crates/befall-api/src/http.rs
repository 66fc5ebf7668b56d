//! HTTP-backed testable routes

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use url::Url;

use befall_args::{map_to_json, ArgMap};
use befall_state::SessionState;

use crate::context::ExecContext;
use crate::error::ApiError;
use crate::route::{PreparedCall, Response, TestableRoute};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    /// Requests without a body carry their fields in the query string.
    fn sends_body(&self) -> bool {
        !matches!(self, Method::Get | Method::Delete)
    }
}

/// Blocking client bound to the API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(ApiError::InvalidUrl(format!(
                "unsupported scheme {}",
                base.scheme()
            )));
        }

        // Deadlines come from the execution context only.
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }
}

/// A testable route that maps onto one HTTP endpoint.
///
/// Decoded arguments are converted to JSON and deserialized into `Req`, so
/// the request type defines which names and types are accepted.
pub struct Endpoint<Req> {
    id: &'static str,
    description: &'static str,
    method: Method,
    path: &'static str,
    request_type: &'static str,
    response_type: &'static str,
    client: ApiClient,
    _req: PhantomData<fn() -> Req>,
}

impl<Req> Endpoint<Req> {
    pub fn new(
        client: ApiClient,
        id: &'static str,
        description: &'static str,
        method: Method,
        path: &'static str,
    ) -> Self {
        Self {
            id,
            description,
            method,
            path,
            request_type: id,
            response_type: id,
            client,
            _req: PhantomData,
        }
    }

    /// Set the type identifiers used when dumping request and response.
    pub fn with_types(mut self, request_type: &'static str, response_type: &'static str) -> Self {
        self.request_type = request_type;
        self.response_type = response_type;
        self
    }
}

impl<Req> TestableRoute for Endpoint<Req>
where
    Req: Serialize + DeserializeOwned + 'static,
{
    fn id(&self) -> &str {
        self.id
    }

    fn description(&self) -> &str {
        self.description
    }

    fn populate_with_args(&self, args: &ArgMap) -> Result<Box<dyn PreparedCall>> {
        let req: Req = serde_json::from_value(map_to_json(args))
            .map_err(|e| ApiError::Populate(e.to_string()))?;

        Ok(Box::new(HttpCall {
            url: self.client.endpoint_url(self.path)?,
            client: self.client.clone(),
            method: self.method,
            request_type: self.request_type,
            response_type: self.response_type,
            req,
        }))
    }
}

struct HttpCall<Req> {
    client: ApiClient,
    url: Url,
    method: Method,
    request_type: &'static str,
    response_type: &'static str,
    req: Req,
}

impl<Req: Serialize> PreparedCall for HttpCall<Req> {
    fn type_name(&self) -> &str {
        self.request_type
    }

    fn request(&self) -> Value {
        serde_json::to_value(&self.req).unwrap_or(Value::Null)
    }

    fn exec(&self, ctx: &ExecContext, state: &SessionState) -> Result<Response> {
        ctx.check()?;

        let mut builder = self
            .client
            .client
            .request(self.method.as_reqwest(), self.url.clone());
        builder = if self.method.sends_body() {
            builder.json(&self.req)
        } else {
            builder.query(&self.req)
        };
        if let Some(timeout) = ctx.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(
            url = %self.url,
            method = ?self.method,
            route = ?state.location().id,
            "Sending request"
        );

        let (status, text) = send_cancellable(builder, ctx)?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        tracing::debug!(status = status.as_u16(), "Received response");

        Ok(Response {
            type_name: self.response_type.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

/// How often a pending call looks at its cancel token.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Send on a worker thread so a cancelled call returns at once. An abandoned
/// worker runs to completion and its result is dropped.
fn send_cancellable(builder: RequestBuilder, ctx: &ExecContext) -> Result<(StatusCode, String)> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = builder.send().and_then(|resp| {
            let status = resp.status();
            resp.text().map(|text| (status, text))
        });
        let _ = tx.send(result);
    });

    loop {
        match rx.recv_timeout(CANCEL_POLL) {
            Ok(result) => {
                ctx.check()?;
                return result.map_err(|e| {
                    if e.is_timeout() {
                        ApiError::Timeout
                    } else {
                        ApiError::Http(e)
                    }
                });
            }
            Err(RecvTimeoutError::Timeout) => ctx.check()?,
            Err(RecvTimeoutError::Disconnected) => return Err(ApiError::WorkerLost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use befall_args::ArgValue;
    use serde::Deserialize;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Instant;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct LookupRequest {
        id: u64,
        #[serde(default)]
        verbose: Option<String>,
    }

    fn endpoint() -> Endpoint<LookupRequest> {
        endpoint_at("http://localhost:8080/api/")
    }

    fn endpoint_at(base: &str) -> Endpoint<LookupRequest> {
        let client = ApiClient::new(base).unwrap();
        Endpoint::new(client, "lookup", "Look up a thing", Method::Get, "/things")
            .with_types("LookupRequest", "Thing")
    }

    /// Accept one connection, wait `delay`, then send `reply` if any.
    fn serve_once(delay: Duration, reply: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            thread::sleep(delay);
            if let Some(reply) = reply {
                let _ = stream.write_all(reply.as_bytes());
            }
        });
        format!("http://{}/", addr)
    }

    fn lookup_call(base: &str) -> Box<dyn PreparedCall> {
        let mut args = ArgMap::new();
        args.insert("id".into(), ArgValue::Uint64(7));
        endpoint_at(base).populate_with_args(&args).unwrap()
    }

    const OK_REPLY: &str =
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 9\r\nConnection: close\r\n\r\n{\"id\": 7}";

    #[test]
    fn test_client_rejects_bad_urls() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(ApiClient::new("ftp://host/"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_url_joins_base_path() {
        let client = ApiClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            client.endpoint_url("/ping").unwrap().as_str(),
            "http://localhost:8080/api/ping"
        );
    }

    #[test]
    fn test_populate_from_args() {
        let mut args = ArgMap::new();
        args.insert("id".into(), ArgValue::Uint64(7));

        let call = endpoint().populate_with_args(&args).unwrap();
        assert_eq!(call.type_name(), "LookupRequest");
        assert_eq!(call.request(), serde_json::json!({"id": 7, "verbose": null}));
    }

    #[test]
    fn test_populate_mismatch() {
        let mut args = ArgMap::new();
        args.insert("id".into(), ArgValue::Str("seven".into()));
        assert!(matches!(
            endpoint().populate_with_args(&args),
            Err(ApiError::Populate(_))
        ));

        let mut args = ArgMap::new();
        args.insert("id".into(), ArgValue::Uint64(7));
        args.insert("extra".into(), ArgValue::Str("x".into()));
        let err = endpoint().populate_with_args(&args).err().unwrap();
        assert!(err.to_string().contains("extra"));
    }

    #[test]
    fn test_exec_honours_cancellation() {
        let mut args = ArgMap::new();
        args.insert("id".into(), ArgValue::Uint64(7));
        let call = endpoint().populate_with_args(&args).unwrap();

        let ctx = ExecContext::default();
        ctx.cancel.cancel();

        let state = SessionState::default();
        assert!(matches!(call.exec(&ctx, &state), Err(ApiError::Cancelled)));
    }

    #[test]
    fn test_exec_parses_json_body() {
        let base = serve_once(Duration::ZERO, Some(OK_REPLY));
        let resp = lookup_call(&base)
            .exec(&ExecContext::new(Some(Duration::from_secs(5))), &SessionState::default())
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.type_name, "Thing");
        assert_eq!(resp.body, serde_json::json!({"id": 7}));
    }

    #[test]
    fn test_exec_deadline_from_context() {
        let base = serve_once(Duration::from_secs(10), None);
        let ctx = ExecContext::new(Some(Duration::from_millis(200)));

        let result = lookup_call(&base).exec(&ctx, &SessionState::default());
        assert!(matches!(result, Err(ApiError::Timeout)));
    }

    #[test]
    fn test_exec_without_deadline_waits_past_client_default() {
        // Longer than reqwest's built-in 30s client timeout.
        let base = serve_once(Duration::from_secs(31), Some(OK_REPLY));
        let started = Instant::now();

        let resp = lookup_call(&base)
            .exec(&ExecContext::new(None), &SessionState::default())
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(31));
        assert_eq!(resp.status, 200);
    }

    #[test]
    fn test_cancel_interrupts_pending_call() {
        let base = serve_once(Duration::from_secs(10), None);
        let ctx = ExecContext::new(None);
        let handle = ctx.cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            handle.cancel();
        });

        let started = Instant::now();
        let result = lookup_call(&base).exec(&ctx, &SessionState::default());

        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
