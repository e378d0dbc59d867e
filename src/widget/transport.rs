use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::form::FormPayload;
use crate::error::WidgetError;

pub const GENERATE_PATH: &str = "generate";

/// Raw HTTP reply, before any interpretation.
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends the form to the generate endpoint. One call, one request: no
/// retry, no timeout.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_form(&self, payload: FormPayload) -> Result<Reply, WidgetError>;
}

#[derive(Deserialize)]
struct Generated {
    download_url: String,
}

#[derive(Deserialize)]
struct Rejected {
    error: String,
}

/// Maps a reply onto the download link or the matching error.
pub fn interpret(reply: &Reply) -> Result<String, WidgetError> {
    let malformed = |e: serde_json::Error| WidgetError::MalformedResponse {
        status: reply.status,
        reason: e.to_string(),
    };
    if (200..300).contains(&reply.status) {
        let body: Generated = serde_json::from_slice(&reply.body).map_err(malformed)?;
        Ok(body.download_url)
    } else {
        let body: Rejected = serde_json::from_slice(&reply.body).map_err(malformed)?;
        Err(WidgetError::Server(body.error))
    }
}

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base: Url,
}

impl ReqwestTransport {
    pub fn new(server_url: &str) -> Result<Self, WidgetError> {
        let mut base =
            Url::parse(server_url).map_err(|e| WidgetError::Transport(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn endpoint(&self) -> Result<Url, WidgetError> {
        self.resolve(GENERATE_PATH)
    }

    /// Resolves a link returned by the server against the server URL.
    pub fn resolve(&self, link: &str) -> Result<Url, WidgetError> {
        self.base
            .join(link)
            .map_err(|e| WidgetError::Transport(e.to_string()))
    }

    /// Fetches a generated pack and writes it to `dest`.
    pub async fn download(&self, link: &str, dest: &Path) -> Result<u64, WidgetError> {
        let url = self.resolve(link)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| WidgetError::Transport(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| WidgetError::Transport(e.to_string()))?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(bytes.len() as u64)
    }
}

impl Transport for ReqwestTransport {
    async fn post_form(&self, payload: FormPayload) -> Result<Reply, WidgetError> {
        let url = self.endpoint()?;
        let part = Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.content_type)
            .map_err(|e| WidgetError::Transport(e.to_string()))?;
        let mut form = Form::new();
        for (name, value) in payload.fields {
            form = form.text(name, value);
        }
        let form = form.part(payload.file_field, part);

        debug!(%url, "posting upload form");
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| WidgetError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| WidgetError::Transport(e.to_string()))?;
        Ok(Reply {
            status,
            body: body.to_vec(),
        })
    }
}
