//! Built-in testable routes

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::http::{ApiClient, Endpoint, Method};
use crate::route::TestableRoutes;
use crate::Result;

/// `GET /ping`, no fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PingRequest {}

/// `POST /echo`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EchoRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Routes available against any API speaking the ping/echo contract.
pub fn default_catalog(client: &ApiClient) -> Result<TestableRoutes> {
    let mut routes = TestableRoutes::new();

    routes.add(Arc::new(
        Endpoint::<PingRequest>::new(
            client.clone(),
            "ping",
            "Check that the API is reachable",
            Method::Get,
            "/ping",
        )
        .with_types("PingRequest", "PingResponse"),
    ))?;

    routes.add(Arc::new(
        Endpoint::<EchoRequest>::new(
            client.clone(),
            "echo",
            "Send a message and get it back (message, repeat::uint32, tags::[]string)",
            Method::Post,
            "/echo",
        )
        .with_types("EchoRequest", "EchoResponse"),
    ))?;

    Ok(routes)
}
