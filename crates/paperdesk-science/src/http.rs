use std::time::Duration;

use crate::error::{Result, ScienceError};

/// Thin `reqwest` wrapper: one attempt per call, bounded by a client-wide timeout.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }

    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScienceError::ApiError(
                url.to_string(),
                format!("HTTP {}: {body}", status.as_u16()),
            ));
        }
        resp.text().await.map_err(ScienceError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client() -> HttpClient {
        HttpClient::new(Duration::from_secs(5), "paperdesk-test").unwrap()
    }

    #[tokio::test]
    async fn get_sends_query_and_returns_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/echo")
            .match_query(Matcher::UrlEncoded("q".into(), "a b".into()))
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let url = format!("{}/echo", server.url());
        let body = client().get(&url, &[("q", "a b".to_string())]).await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/fail")
            .with_status(503)
            .with_body("down")
            .create_async()
            .await;

        let url = format!("{}/fail", server.url());
        let err = client().get(&url, &[]).await.unwrap_err();
        match err {
            ScienceError::ApiError(_, msg) => assert_eq!(msg, "HTTP 503: down"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
