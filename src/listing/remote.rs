// src/listing/remote.rs
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use super::ListingProvider;
use crate::core::error::FetchError;
use crate::core::service_client::{ApiClient, JobQuery};
use crate::types::job::Job;

/// Job postings fetched from the API on every load
#[derive(Clone)]
pub struct RemoteJobListing {
    client: Arc<ApiClient>,
    query: JobQuery,
}

impl RemoteJobListing {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            query: JobQuery::default(),
        }
    }

    /// Narrow the request server-side; local filtering still applies on top
    pub fn with_query(mut self, query: JobQuery) -> Self {
        self.query = query;
        self
    }
}

impl ListingProvider for RemoteJobListing {
    type Record = Job;

    fn load(&self) -> impl Future<Output = Result<Vec<Job>, FetchError>> + Send {
        async move {
            let result = self.client.get_all_jobs(&self.query).await;
            if let Err(e) = &result {
                warn!("Job listing load failed: {}", e);
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(
        status: u16,
        body: &'static str,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
            let reply = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        (format!("http://{}/api", addr), rx)
    }

    #[tokio::test]
    async fn test_loads_jobs() {
        let (base, _) =
            serve_once(200, r#"[{"id": 7, "title": "Midwife", "job_type": "part_time"}]"#).await;
        let listing = RemoteJobListing::new(Arc::new(ApiClient::new(base, 5).unwrap()));

        let jobs = listing.load().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "7");
        assert_eq!(jobs[0].job_type.as_deref(), Some("part_time"));
    }

    #[tokio::test]
    async fn test_surfaces_invalid_format() {
        let (base, _) = serve_once(200, r#"{"detail": "maintenance"}"#).await;
        let listing = RemoteJobListing::new(Arc::new(ApiClient::new(base, 5).unwrap()));
        assert!(matches!(listing.load().await, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_query_is_sent() {
        let (base, request) = serve_once(200, "[]").await;
        let listing = RemoteJobListing::new(Arc::new(ApiClient::new(base, 5).unwrap()))
            .with_query(JobQuery {
                job_type: Some("contract".into()),
                location: Some("Boston".into()),
                ..Default::default()
            });

        assert!(listing.load().await.unwrap().is_empty());
        let request = request.await.unwrap();
        assert!(request.starts_with("GET /api/jobs/jobs/?job_type=contract&location=Boston "));
    }
}
