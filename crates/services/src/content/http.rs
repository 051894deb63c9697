use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use conjugator_core::model::{Course, DataSourceId};

use super::document::parse_course;
use super::source::ContentSource;
use crate::error::ContentError;

#[derive(Clone, Debug)]
pub struct ContentConfig {
    pub base_url: String,
}

impl ContentConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("CONJUGATOR_CONTENT_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self::new(base_url.trim()))
    }

    /// URL of the course document for `data_source`.
    #[must_use]
    pub fn course_url(&self, data_source: &DataSourceId) -> String {
        format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            data_source
        )
    }
}

/// Fetches course documents over HTTP.
#[derive(Clone)]
pub struct HttpContentSource {
    client: Client,
    config: Option<ContentConfig>,
}

impl HttpContentSource {
    /// A source without a config reports `ContentError::Disabled` for every fetch.
    #[must_use]
    pub fn new(config: Option<ContentConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_course(&self, data_source: &DataSourceId) -> Result<Course, ContentError> {
        let config = self.config.as_ref().ok_or(ContentError::Disabled)?;
        let url = config.course_url(data_source);
        debug!(target: "content", %url, "fetching course");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(ContentError::NotFound(data_source.to_string())),
            status if !status.is_success() => return Err(ContentError::HttpStatus(status)),
            _ => {}
        }

        let body = response.text().await?;
        parse_course(data_source, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers a single request with `status` and `body`; yields the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/courses", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            let request = String::from_utf8_lossy(&request).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });
        (base_url, handle)
    }

    #[test]
    fn course_url_joins_base_and_id() {
        let config = ContentConfig::new("https://content.example.org/courses/");
        let id: DataSourceId = "sheet-1".parse().unwrap();
        assert_eq!(
            config.course_url(&id),
            "https://content.example.org/courses/sheet-1.json"
        );
    }

    #[tokio::test]
    async fn disabled_source_reports_disabled() {
        let source = HttpContentSource::new(None);
        let id: DataSourceId = "sheet-1".parse().unwrap();
        assert!(matches!(
            source.fetch_course(&id).await,
            Err(ContentError::Disabled)
        ));
    }

    #[tokio::test]
    async fn fetches_and_parses_a_published_course() {
        let body = r#"{ "name": "Spanish 1", "levels": [{ "title": "Fácil", "challenges": [
            { "verb": "comer", "forms": ["como", "comes", "come", "comemos", "coméis", "comen"] },
            { "verb": "beber", "forms": ["bebo", "bebes", "bebe", "bebemos", "bebéis", "beben"] }
        ] }] }"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let source = HttpContentSource::new(Some(ContentConfig::new(base_url)));
        let id: DataSourceId = "sheet-1".parse().unwrap();

        let course = source.fetch_course(&id).await.unwrap();
        assert_eq!(course.display_name(), "Spanish 1");
        assert_eq!(course.data_source(), &id);
        assert_eq!(course.levels()[0].challenges()[1].verb(), "beber");
        assert_eq!(server.await.unwrap(), "GET /courses/sheet-1.json HTTP/1.1");
    }

    #[tokio::test]
    async fn missing_course_maps_to_not_found() {
        let (base_url, server) = serve_once("404 Not Found", "").await;
        let source = HttpContentSource::new(Some(ContentConfig::new(base_url)));
        let id: DataSourceId = "gone".parse().unwrap();

        assert!(matches!(
            source.fetch_course(&id).await,
            Err(ContentError::NotFound(missing)) if missing == "gone"
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn server_errors_keep_their_status() {
        let (base_url, server) = serve_once("503 Service Unavailable", "").await;
        let source = HttpContentSource::new(Some(ContentConfig::new(base_url)));
        let id: DataSourceId = "sheet-1".parse().unwrap();

        assert!(matches!(
            source.fetch_course(&id).await,
            Err(ContentError::HttpStatus(status)) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        server.await.unwrap();
    }
}
