use async_trait::async_trait;
use chessboard_client::authority::Authority;
use chessboard_client::error::AuthorityError;
use chessboard_client::wire::{
    PromoteRequest, PromoteResponse, SquareClickRequest, SquareClickResponse, WireGameStatus,
};
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::client_config::ClientConfig;


// Talks to the rules authority over its JSON HTTP API.
pub struct HttpAuthority {
    client: reqwest::Client,
    base_url: Url,
}

// `{server_url}{api_prefix}/`, normalized so that endpoint names can be joined to it.
pub fn api_base_url(server_url: &str, api_prefix: &str) -> anyhow::Result<Url> {
    let prefix = api_prefix.trim_matches('/');
    let base = if prefix.is_empty() {
        format!("{}/", server_url.trim_end_matches('/'))
    } else {
        format!("{}/{}/", server_url.trim_end_matches('/'), prefix)
    };
    Ok(Url::parse(&base)?)
}

fn transport_error(err: reqwest::Error) -> AuthorityError { AuthorityError::Transport(err.to_string()) }

impl HttpAuthority {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.request_timeout).build()?;
        let base_url = api_base_url(&config.server_url, &config.api_prefix)?;
        Ok(HttpAuthority { client, base_url })
    }

    pub fn base_url(&self) -> &Url { &self.base_url }

    fn url(&self, endpoint: &str) -> Result<Url, AuthorityError> {
        self.base_url
            .join(endpoint)
            .map_err(|err| AuthorityError::Transport(format!("invalid URL for {endpoint}: {err}")))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AuthorityError> {
        let request = self.client.get(self.url(endpoint)?);
        read_json(request.send().await.map_err(transport_error)?).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self, endpoint: &str, body: &B,
    ) -> Result<T, AuthorityError> {
        let request = self.client.post(self.url(endpoint)?).json(body);
        read_json(request.send().await.map_err(transport_error)?).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, AuthorityError> {
    let status = response.status();
    if !status.is_success() {
        return Err(AuthorityError::HttpStatus(status.as_u16()));
    }
    response.text().await.map_err(transport_error)
}

// An empty body is treated like JSON `null`, which the wire types accept as "all defaults".
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthorityError> {
    let url = response.url().clone();
    let body = read_body(response).await?;
    debug!("{} answered: {}", url, body);
    let body = if body.trim().is_empty() { "null" } else { body.as_str() };
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl Authority for HttpAuthority {
    async fn new_game(&self) -> Result<(), AuthorityError> {
        let response = self.client.post(self.url("new-game")?).send().await.map_err(transport_error)?;
        read_body(response).await.map(|_| ())
    }

    async fn board(&self) -> Result<Vec<Value>, AuthorityError> {
        let board: Option<Vec<Value>> = self.get("board").await?;
        Ok(board.unwrap_or_default())
    }

    async fn status(&self) -> Result<WireGameStatus, AuthorityError> {
        let status: Option<WireGameStatus> = self.get("status").await?;
        Ok(status.unwrap_or_default())
    }

    async fn square_click(&self, request: &SquareClickRequest) -> Result<SquareClickResponse, AuthorityError> {
        let response: Option<SquareClickResponse> = self.post("square-click", request).await?;
        Ok(response.unwrap_or_default())
    }

    async fn promote(&self, request: &PromoteRequest) -> Result<PromoteResponse, AuthorityError> {
        let response: Option<PromoteResponse> = self.post("promote", request).await?;
        Ok(response.unwrap_or_default())
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn base_url_joins_endpoints() {
        let base = api_base_url("http://localhost:8080", "/api/v1/chess").unwrap();
        assert_eq!(base.join("square-click").unwrap().as_str(), "http://localhost:8080/api/v1/chess/square-click");
    }

    #[test]
    fn base_url_tolerates_slashes() {
        let base = api_base_url("http://localhost:8080/", "api/v1/chess/").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8080/api/v1/chess/");
        let base = api_base_url("https://example.org", "").unwrap();
        assert_eq!(base.join("board").unwrap().as_str(), "https://example.org/board");
    }

    #[test]
    fn invalid_server_url() {
        assert!(api_base_url("not a url", "/api").is_err());
    }
}
