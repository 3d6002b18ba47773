use crate::decode::{decode_credits, decode_search_results, decode_strict};
use crate::error::ApiResult;
use crate::image::{image_url, ImageSize};
use crate::schema;
use crate::tmdb::api;
use crate::transport::{HttpTransport, ReqwestTransport};
use marquee_models::{Credits, MovieDetail, MovieSummary, Page, Review, VideoList};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone)]
pub struct TmdbSettings {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key: String,
}

impl TmdbSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }
}

/// Typed gateway to the TMDB v3 API.
///
/// Each operation issues one request and decodes the body. There is no retry
/// and no caching here; dropping a returned future simply abandons the result.
#[derive(Clone)]
pub struct TmdbClient {
    transport: Arc<dyn HttpTransport>,
    settings: TmdbSettings,
}

impl TmdbClient {
    pub fn new(settings: TmdbSettings) -> Self {
        Self::with_transport(settings, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(settings: TmdbSettings, transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport, settings }
    }

    pub fn settings(&self) -> &TmdbSettings {
        &self.settings
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> ApiResult<serde_json::Value> {
        let url = api::build_url(&self.settings.base_url, &self.settings.api_key, endpoint, params)?;
        api::fetch_json(self.transport.as_ref(), url, endpoint).await
    }

    /// Search movies by title. Adult titles are always excluded.
    pub async fn search_movies(&self, query: &str, page: u32) -> ApiResult<Page<MovieSummary>> {
        let raw = self
            .get(
                api::SEARCH_MOVIE,
                &[
                    ("query", query.trim().to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;
        let results = decode_search_results(&raw)?;
        info!(
            "Search for '{}' page {} returned {} results{}",
            query.trim(),
            results.page,
            results.results.len(),
            if results.recovered { " (partially recovered)" } else { "" }
        );
        Ok(results)
    }

    pub async fn movie_details(&self, movie_id: u64) -> ApiResult<MovieDetail> {
        let raw = self.get(&api::movie_details(movie_id), &[]).await?;
        decode_strict(schema::movie_detail(), &raw)
    }

    pub async fn movie_credits(&self, movie_id: u64) -> ApiResult<Credits> {
        let raw = self.get(&api::movie_credits(movie_id), &[]).await?;
        Ok(decode_credits(&raw))
    }

    pub async fn movie_videos(&self, movie_id: u64) -> ApiResult<VideoList> {
        let raw = self.get(&api::movie_videos(movie_id), &[]).await?;
        decode_strict(schema::video_list(), &raw)
    }

    pub async fn movie_reviews(&self, movie_id: u64, page: u32) -> ApiResult<Page<Review>> {
        let raw = self
            .get(&api::movie_reviews(movie_id), &[("page", page.to_string())])
            .await?;
        decode_strict(schema::review_list(), &raw)
    }

    pub fn poster_url(&self, path: Option<&str>) -> Option<String> {
        image_url(&self.settings.image_base_url, path, ImageSize::Poster)
    }

    pub fn backdrop_url(&self, path: Option<&str>) -> Option<String> {
        image_url(&self.settings.image_base_url, path, ImageSize::Backdrop)
    }

    pub fn profile_url(&self, path: Option<&str>) -> Option<String> {
        image_url(&self.settings.image_base_url, path, ImageSize::Profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::fixtures::{cast_json, detail_json, movie_json, search_json};
    use crate::transport::HttpResponse;
    use async_trait::async_trait;
    use reqwest::Url;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned responses by path and records every requested URL
    #[derive(Default)]
    struct StubTransport {
        responses: HashMap<String, HttpResponse>,
        requests: Mutex<Vec<Url>>,
    }

    impl StubTransport {
        fn respond(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
            self.responses.insert(path.to_string(), HttpResponse { status, body: body.into() });
            self
        }

        fn requests(&self) -> Vec<Url> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn get(&self, url: Url) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(url.clone());
            Ok(self
                .responses
                .get(url.path())
                .cloned()
                .unwrap_or(HttpResponse { status: 404, body: "{}".to_string() }))
        }
    }

    fn client(stub: StubTransport) -> (TmdbClient, Arc<StubTransport>) {
        let stub = Arc::new(stub);
        let settings = TmdbSettings {
            base_url: "https://api.example.test/3".to_string(),
            image_base_url: "https://img.example.test/t/p".to_string(),
            api_key: "test-key".to_string(),
        };
        (TmdbClient::with_transport(settings, stub.clone()), stub)
    }

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[tokio::test]
    async fn test_search_sends_required_params() {
        let body = search_json(vec![movie_json(603, "The Matrix")]).to_string();
        let (client, stub) = client(StubTransport::default().respond("/3/search/movie", 200, body));

        let page = client.search_movies("  matrix ", 2).await.unwrap();
        assert_eq!(page.results.len(), 1);

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let params = query_map(&requests[0]);
        assert_eq!(params["api_key"], "test-key");
        assert_eq!(params["query"], "matrix");
        assert_eq!(params["page"], "2");
        assert_eq!(params["include_adult"], "false");
    }

    #[tokio::test]
    async fn test_search_salvages_partial_page() {
        let mut broken = movie_json(2, "Broken");
        broken["vote_average"] = json!("high");
        let body = search_json(vec![movie_json(1, "One"), broken, movie_json(3, "Three")]).to_string();
        let (client, _) = client(StubTransport::default().respond("/3/search/movie", 200, body));

        let page = client.search_movies("one", 1).await.unwrap();
        assert_eq!(page.results.len(), 2);
        assert!(page.recovered);
    }

    #[tokio::test]
    async fn test_non_success_status_fails_before_decoding() {
        let (client, _) = client(StubTransport::default().respond("/3/search/movie", 401, "not json at all"));

        let err = client.search_movies("matrix", 1).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { status: 401 }));
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_schema_error());
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let (client, _) = client(StubTransport::default().respond("/3/movie/603", 200, "<html>"));
        let err = client.movie_details(603).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn test_details_strict() {
        let good = detail_json(603, "The Matrix").to_string();
        let mut bad = detail_json(604, "Reloaded");
        bad["budget"] = json!("a lot");
        let (client, stub) = client(
            StubTransport::default()
                .respond("/3/movie/603", 200, good)
                .respond("/3/movie/604", 200, bad.to_string()),
        );

        let detail = client.movie_details(603).await.unwrap();
        assert_eq!(detail.title, "The Matrix");
        assert_eq!(detail.budget, 63_000_000);

        let err = client.movie_details(604).await.unwrap_err();
        match err {
            ApiError::SchemaMismatch(mismatch) => {
                assert_eq!(mismatch.path, "$.budget");
                assert_eq!(mismatch.received, "string");
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }

        let params = query_map(&stub.requests()[0]);
        assert_eq!(params.len(), 1);
        assert_eq!(params["api_key"], "test-key");
    }

    #[tokio::test]
    async fn test_credits_never_fail_on_shape() {
        let body = json!({"cast": [cast_json(1, "Lead", 0), {"name": "No Id"}], "crew": "n/a"}).to_string();
        let (client, _) = client(StubTransport::default().respond("/3/movie/603/credits", 200, body));

        let credits = client.movie_credits(603).await.unwrap();
        assert_eq!(credits.cast.len(), 1);
        assert!(credits.crew.is_empty());
        assert!(credits.recovered);
    }

    #[tokio::test]
    async fn test_videos_and_trailer() {
        let body = json!({
            "id": 603,
            "results": [
                {"id": "v1", "key": "teaser", "name": "Teaser", "site": "YouTube", "type": "Teaser", "official": true, "published_at": "1999-01-01T00:00:00.000Z"},
                {"id": "v2", "key": "m8e-FF8MsqU", "name": "Trailer", "site": "YouTube", "type": "Trailer", "official": true, "published_at": "1999-01-02T00:00:00.000Z"}
            ]
        })
        .to_string();
        let (client, _) = client(StubTransport::default().respond("/3/movie/603/videos", 200, body));

        let videos = client.movie_videos(603).await.unwrap();
        assert_eq!(videos.results.len(), 2);
        assert_eq!(videos.trailer().map(|v| v.key.as_str()), Some("m8e-FF8MsqU"));
    }

    #[tokio::test]
    async fn test_reviews_send_page() {
        let body = json!({
            "id": 603,
            "page": 3,
            "results": [{
                "id": "r1",
                "author": "critic",
                "author_details": {"name": "", "username": "critic", "avatar_path": null, "rating": 9.0},
                "content": "Great.",
                "created_at": "2020-01-01T00:00:00.000Z",
                "updated_at": "2020-01-01T00:00:00.000Z",
                "url": "https://example.test/r1"
            }],
            "total_pages": 3,
            "total_results": 41
        })
        .to_string();
        let (client, stub) = client(StubTransport::default().respond("/3/movie/603/reviews", 200, body));

        let reviews = client.movie_reviews(603, 3).await.unwrap();
        assert_eq!(reviews.results[0].author_details.rating, Some(9.0));
        assert_eq!(reviews.next_page(), None);
        assert_eq!(query_map(&stub.requests()[0])["page"], "3");
    }

    #[test]
    fn test_image_helpers_use_configured_base() {
        let (client, _) = client(StubTransport::default());
        assert_eq!(
            client.poster_url(Some("/p.jpg")).as_deref(),
            Some("https://img.example.test/t/p/w500/p.jpg")
        );
        assert_eq!(
            client.backdrop_url(Some("/b.jpg")).as_deref(),
            Some("https://img.example.test/t/p/w1280/b.jpg")
        );
        assert_eq!(client.profile_url(None), None);
    }
}
