//! Best-effort download of the decorative Lottie animations.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Animation shown on the splash page.
pub const DEFAULT_SPLASH_ANIMATION: &str =
    "https://lottie.host/ce4eeaf6-e2bc-421f-98b7-2f8af195f0b7/obnXRuFFLl.json";
/// Animation shown beside the form header.
pub const DEFAULT_MAIN_ANIMATION: &str =
    "https://lottie.host/a2425c91-7630-4c68-aa51-7b88388fbb7c/NvaArmIdzH.json";

const USER_AGENT: &str = concat!("housecast/", env!("CARGO_PKG_VERSION"));

/// Animation documents that could be fetched; missing ones are simply not rendered.
#[derive(Clone, Debug, Default)]
pub struct AnimationSet {
    /// Splash page animation.
    pub splash: Option<Value>,
    /// Main page animation.
    pub main: Option<Value>,
}

impl AnimationSet {
    /// Fetches both animations concurrently. Never fails.
    pub async fn fetch(splash: Option<&Url>, main: Option<&Url>, timeout: Duration) -> Self {
        let client = match Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                debug!(error = %err, "animation client unavailable");
                return Self::default();
            }
        };
        let (splash, main) = tokio::join!(
            fetch_optional(&client, splash),
            fetch_optional(&client, main)
        );
        info!(
            splash = splash.is_some(),
            main = main.is_some(),
            "animations resolved"
        );
        Self { splash, main }
    }
}

async fn fetch_optional(client: &Client, url: Option<&Url>) -> Option<Value> {
    match url {
        Some(url) => fetch_animation(client, url).await,
        None => None,
    }
}

/// Downloads one animation; any non-200 status, transport error or bad body yields `None`.
pub async fn fetch_animation(client: &Client, url: &Url) -> Option<Value> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(err) => {
            debug!(%url, error = %err, "animation fetch failed");
            return None;
        }
    };
    if response.status() != reqwest::StatusCode::OK {
        debug!(%url, status = %response.status(), "animation fetch rejected");
        return None;
    }
    match response.json::<Value>().await {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(%url, error = %err, "animation body undecodable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status_line: &'static str, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        Url::parse(&format!("http://{addr}/anim.json")).expect("url")
    }

    #[tokio::test(flavor = "current_thread")]
    async fn fetches_json_documents() {
        let url = serve_once("HTTP/1.1 200 OK", r#"{"v":"5.7.4","layers":[]}"#).await;
        let set = AnimationSet::fetch(Some(&url), None, Duration::from_secs(5)).await;
        assert_eq!(set.splash.expect("splash")["v"], "5.7.4");
        assert!(set.main.is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn non_ok_status_is_suppressed() {
        let url = serve_once("HTTP/1.1 404 Not Found", r#"{"error":"gone"}"#).await;
        let client = Client::new();
        assert!(fetch_animation(&client, &url).await.is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn undecodable_body_is_suppressed() {
        let url = serve_once("HTTP/1.1 200 OK", "<html>not json</html>").await;
        let client = Client::new();
        assert!(fetch_animation(&client, &url).await.is_none());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unreachable_host_is_suppressed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        let url = Url::parse(&format!("http://{addr}/anim.json")).expect("url");
        let set = AnimationSet::fetch(Some(&url), Some(&url), Duration::from_secs(2)).await;
        assert!(set.splash.is_none() && set.main.is_none());
    }
}
