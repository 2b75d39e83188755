//! Bounded download pool for album images.
//!
//! This module is internal -- users interact with it indirectly through
//! [`PhotoAlbumResolver`](crate::PhotoAlbumResolver).

use tokio::sync::Semaphore;
use url::Url;

use crate::error::{LinkSanitizerError, Result};
use crate::outcome::CachedImage;
use crate::storage::{ImageStore, cache_file_name};

/// Download every source with at most `max_in_flight` transfers at a time.
///
/// Waits for all downloads. Succeeds if at least one image was stored and
/// returns the stored images in `sources` order; otherwise fails with the
/// error of the earliest failed source.
pub(crate) async fn download_all<S: ImageStore>(
    client: &reqwest::Client,
    store: &S,
    sources: &[Url],
    max_in_flight: usize,
) -> Result<Vec<CachedImage>> {
    let semaphore = Semaphore::new(max_in_flight.max(1));
    tracing::debug!("Downloading {} images", sources.len());

    let futs = sources.iter().enumerate().map(|(index, source)| {
        let semaphore = &semaphore;
        async move {
            // The semaphore is never closed, so acquiring cannot fail.
            let _permit = semaphore.acquire().await.ok();
            let path = download_one(client, store, source).await?;
            Ok::<_, LinkSanitizerError>(CachedImage {
                index,
                source: source.clone(),
                path,
            })
        }
    });

    // join_all yields results in input order, whatever order they finish in.
    let results = futures::future::join_all(futs).await;
    settle(results)
}

async fn download_one<S: ImageStore>(
    client: &reqwest::Client,
    store: &S,
    source: &Url,
) -> Result<std::path::PathBuf> {
    let response = client.get(source.as_str()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LinkSanitizerError::Status {
            url: source.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await?;
    store.put(&cache_file_name(source), &body).await
}

fn settle(results: Vec<Result<CachedImage>>) -> Result<Vec<CachedImage>> {
    let mut images = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(image) => images.push(image),
            Err(e) => {
                tracing::debug!("Skipping album image: {e}");
                first_error.get_or_insert(e);
            }
        }
    }
    match (images.is_empty(), first_error) {
        (true, Some(e)) => Err(e),
        (true, None) => Err(LinkSanitizerError::EmptyManifest),
        (false, _) => Ok(images),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Store that records how many writes overlap.
    #[derive(Clone, Default)]
    struct GaugeStore {
        current: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl ImageStore for GaugeStore {
        async fn put(&self, name: &str, _content: &[u8]) -> Result<PathBuf> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(PathBuf::from(name))
        }
    }

    fn image(index: usize) -> CachedImage {
        CachedImage {
            index,
            source: Url::parse(&format!("https://cdn.example/{index}.jpg")).unwrap(),
            path: PathBuf::from(format!("{index}.jpg")),
        }
    }

    #[test]
    fn settle_keeps_successes_in_order() {
        let results = vec![
            Ok(image(0)),
            Err(LinkSanitizerError::EmptyManifest),
            Ok(image(2)),
        ];
        let images = settle(results).unwrap();
        let indices: Vec<usize> = images.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn settle_returns_first_error_when_nothing_succeeded() {
        let results = vec![
            Err(LinkSanitizerError::Status {
                url: "https://cdn.example/0.jpg".into(),
                status: 404,
            }),
            Err(LinkSanitizerError::Status {
                url: "https://cdn.example/1.jpg".into(),
                status: 500,
            }),
        ];
        match settle(results) {
            Err(LinkSanitizerError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn settle_with_no_sources_is_empty_manifest() {
        assert!(matches!(settle(vec![]), Err(LinkSanitizerError::EmptyManifest)));
    }

    #[tokio::test]
    async fn in_flight_downloads_are_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
            .mount(&server)
            .await;

        let sources: Vec<Url> = (0..12)
            .map(|i| Url::parse(&format!("{}/img/{i}.jpg", server.uri())).unwrap())
            .collect();
        let store = GaugeStore::default();
        let client = reqwest::Client::new();

        let images = download_all(&client, &store, &sources, 3).await.unwrap();

        assert_eq!(images.len(), 12);
        assert!(images.iter().enumerate().all(|(i, img)| img.index == i));
        let peak = store.peak.load(Ordering::SeqCst);
        assert!((1..=3).contains(&peak), "peak concurrency {peak}");
    }
}
