use crate::error::{ApiError, ApiResult};
use crate::transport::HttpTransport;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

pub const SEARCH_MOVIE: &str = "/search/movie";

pub fn movie_details(movie_id: u64) -> String {
    format!("/movie/{}", movie_id)
}

pub fn movie_credits(movie_id: u64) -> String {
    format!("/movie/{}/credits", movie_id)
}

pub fn movie_videos(movie_id: u64) -> String {
    format!("/movie/{}/videos", movie_id)
}

pub fn movie_reviews(movie_id: u64) -> String {
    format!("/movie/{}/reviews", movie_id)
}

/// Base URL + endpoint, with the API key first and then `params` in order
pub fn build_url(base_url: &str, api_key: &str, endpoint: &str, params: &[(&str, String)]) -> ApiResult<Url> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
    let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("api_key", api_key);
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Issue exactly one GET and parse the body as JSON.
///
/// A non-2xx status fails before the body is looked at.
pub async fn fetch_json(transport: &dyn HttpTransport, url: Url, endpoint: &str) -> ApiResult<Value> {
    debug!("Making request to {}", endpoint);

    let response = transport.get(url).await?;
    if !response.is_success() {
        debug!("Request to {} failed with HTTP {}", endpoint, response.status);
        return Err(ApiError::Transport { status: response.status });
    }

    serde_json::from_str(&response.body).map_err(ApiError::MalformedBody)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_appends_key_and_params() {
        let url = build_url(
            "https://api.themoviedb.org/3/",
            "secret",
            SEARCH_MOVIE,
            &[("query", "star wars".to_string()), ("page", "2".to_string())],
        )
        .unwrap();
        assert_eq!(url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("api_key".to_string(), "secret".to_string()),
                ("query".to_string(), "star wars".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_url_rejects_bad_base() {
        let err = build_url("not a url", "k", "/movie/1", &[]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_movie_paths() {
        assert_eq!(movie_details(603), "/movie/603");
        assert_eq!(movie_credits(603), "/movie/603/credits");
        assert_eq!(movie_videos(603), "/movie/603/videos");
        assert_eq!(movie_reviews(603), "/movie/603/reviews");
    }
}
