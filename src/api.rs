//! TMDB catalog API client

use std::time::Duration;

use serde::Deserialize;

use crate::artwork::ImageSource;
use crate::config::AppConfig;
use crate::models::{CatalogItem, MediaKind, QueryKey, ResultSet};

/// Why a catalog fetch did not produce a result set
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Neither an API key nor an access token is configured
    NotConfigured,
    Network(String),
    /// Non-2xx HTTP status
    Status(u16),
    /// Body was not a valid result page
    Malformed(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NotConfigured => write!(f, "No TMDB API key or access token configured"),
            FetchError::Network(msg) => write!(f, "Request failed: {}", msg),
            FetchError::Status(code) => write!(f, "HTTP error: {}", code),
            FetchError::Malformed(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<ureq::Error> for FetchError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Malformed(e.to_string())
    }
}

/// Anything that can answer a catalog query. Implementations block; callers
/// run them off the UI thread.
pub trait CatalogSource: Send + Sync {
    fn fetch(&self, key: &QueryKey) -> Result<ResultSet, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ResultPage {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    results: Vec<RawItem>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

/// Movie and show records share most fields; the title and date keys differ.
#[derive(Debug, Deserialize)]
struct RawItem {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    popularity: Option<f64>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: Option<u64>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
}

impl RawItem {
    fn into_item(self, kind: MediaKind) -> CatalogItem {
        let (title, date) = match kind {
            MediaKind::Movie => (self.title.or(self.name), self.release_date),
            MediaKind::Tv => (self.name.or(self.title), self.first_air_date),
        };
        CatalogItem {
            id: self.id,
            kind,
            title: title.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            backdrop_path: self.backdrop_path.filter(|p| !p.is_empty()),
            poster_path: self.poster_path.filter(|p| !p.is_empty()),
            popularity: self.popularity.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or_default(),
            vote_count: self.vote_count.unwrap_or_default(),
            release_or_air_date: date.unwrap_or_default(),
        }
    }
}

/// Parse one page of list or search results
pub fn parse_result_set(body: &str, kind: MediaKind) -> Result<ResultSet, FetchError> {
    let page: ResultPage = serde_json::from_str(body)?;
    Ok(ResultSet {
        items: page
            .results
            .into_iter()
            .map(|raw| raw.into_item(kind))
            .collect(),
        page: page.page,
        total_pages: page.total_pages,
        total_results: page.total_results,
    })
}

pub struct TmdbClient {
    base_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
    user_agent: String,
    agent: ureq::Agent,
}

impl TmdbClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            access_token: None,
            user_agent: format!("Nomflix/{}", env!("CARGO_PKG_VERSION")),
            agent: Self::create_agent(30, 10),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.api_base_url)
            .with_api_key(&config.api_key)
            .with_access_token(&config.access_token)
            .with_timeouts(config.request_timeout_secs, config.connect_timeout_secs)
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.trim().to_string()).filter(|k| !k.is_empty());
        self
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.trim().to_string()).filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeouts(mut self, request_secs: u64, connect_secs: u64) -> Self {
        self.agent = Self::create_agent(request_secs, connect_secs);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }

    fn create_agent(request_secs: u64, connect_secs: u64) -> ureq::Agent {
        ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(request_secs)))
            .timeout_connect(Some(Duration::from_secs(connect_secs)))
            .max_idle_connections_per_host(4)
            .build()
            .new_agent()
    }

    /// Endpoint URL without query parameters
    pub fn endpoint_url(&self, key: &QueryKey) -> String {
        format!("{}/{}", self.base_url, key.category.endpoint())
    }

    fn make_request(&self, key: &QueryKey) -> Result<String, FetchError> {
        let mut request = self
            .agent
            .get(&self.endpoint_url(key))
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "application/json")
            .query("page", "1");

        if let Some(api_key) = &self.api_key {
            request = request.query("api_key", api_key);
        }
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(keyword) = key.effective_keyword() {
            request = request.query("query", keyword);
        }

        let mut response = request.call()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Network(format!("Read failed: {}", e)))
    }
}

impl CatalogSource for TmdbClient {
    fn fetch(&self, key: &QueryKey) -> Result<ResultSet, FetchError> {
        // A blank search is answered locally and never reaches the network
        if key.is_noop() {
            return Ok(ResultSet::empty());
        }
        if !self.is_configured() {
            return Err(FetchError::NotConfigured);
        }
        let body = self.make_request(key)?;
        parse_result_set(&body, key.category.kind())
    }
}

impl ImageSource for TmdbClient {
    /// Image CDN requests carry no credentials
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .body_mut()
            .read_to_vec()
            .map_err(|e| FetchError::Network(format!("Read failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    const MOVIE_PAGE: &str = r#"{
        "dates": {"maximum": "2024-05-01", "minimum": "2024-03-20"},
        "page": 1,
        "results": [
            {
                "adult": false,
                "backdrop_path": "/fqv8v6AycXKsivp1T5yKtLbGXce.jpg",
                "genre_ids": [878, 12, 28],
                "id": 653346,
                "original_language": "en",
                "original_title": "Kingdom of the Planet of the Apes",
                "overview": "Several generations in the future...",
                "popularity": 4050.674,
                "poster_path": "/gKkl37BQuKTanygYQG1pyYgLVgf.jpg",
                "release_date": "2024-05-08",
                "title": "Kingdom of the Planet of the Apes",
                "video": false,
                "vote_average": 7.1,
                "vote_count": 1102
            },
            {
                "id": 12,
                "title": "No Art",
                "backdrop_path": null,
                "poster_path": null,
                "overview": null
            }
        ],
        "total_pages": 207,
        "total_results": 4129
    }"#;

    const TV_PAGE: &str = r#"{
        "page": 1,
        "results": [
            {
                "id": 1399,
                "name": "Game of Thrones",
                "first_air_date": "2011-04-17",
                "overview": "Seven noble families fight for control...",
                "backdrop_path": "/2OMB0ynKlyIenMJWI2Dy9IWT4c.jpg",
                "popularity": 369.594,
                "vote_average": 8.4,
                "vote_count": 21000
            }
        ],
        "total_pages": 1,
        "total_results": 1
    }"#;

    #[test]
    fn test_parse_movie_page() {
        let set = parse_result_set(MOVIE_PAGE, MediaKind::Movie).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_pages, 207);
        assert_eq!(set.total_results, 4129);

        let first = &set.items[0];
        assert_eq!(first.id, 653346);
        assert_eq!(first.title, "Kingdom of the Planet of the Apes");
        assert_eq!(first.release_or_air_date, "2024-05-08");
        assert_eq!(first.vote_count, 1102);
        assert_eq!(first.kind, MediaKind::Movie);
    }

    #[test]
    fn test_parse_nullable_fields() {
        let set = parse_result_set(MOVIE_PAGE, MediaKind::Movie).unwrap();
        let bare = &set.items[1];
        assert_eq!(bare.backdrop_path, None);
        assert_eq!(bare.overview, "");
        assert_eq!(bare.vote_average, 0.0);
        assert_eq!(bare.release_or_air_date, "");
    }

    #[test]
    fn test_parse_tv_page_uses_name_and_air_date() {
        let set = parse_result_set(TV_PAGE, MediaKind::Tv).unwrap();
        let show = &set.items[0];
        assert_eq!(show.title, "Game of Thrones");
        assert_eq!(show.release_or_air_date, "2011-04-17");
        assert_eq!(show.kind, MediaKind::Tv);
    }

    #[test]
    fn test_parse_preserves_order() {
        let set = parse_result_set(MOVIE_PAGE, MediaKind::Movie).unwrap();
        let ids: Vec<u64> = set.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![653346, 12]);
    }

    #[test]
    fn test_malformed_payload() {
        let err = parse_result_set("<html>oops</html>", MediaKind::Movie).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));

        let err = parse_result_set(r#"{"results": [{"title": "no id"}]}"#, MediaKind::Movie)
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_empty_results_page() {
        let set = parse_result_set(r#"{"page":1,"results":[]}"#, MediaKind::Tv).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_endpoint_url() {
        let client = TmdbClient::new("https://api.themoviedb.org/3/");
        assert_eq!(
            client.endpoint_url(&QueryKey::list(Category::TvAiringToday)),
            "https://api.themoviedb.org/3/tv/airing_today"
        );
        assert_eq!(
            client.endpoint_url(&QueryKey::search(Category::MovieSearch, Some("dune"))),
            "https://api.themoviedb.org/3/search/movie"
        );
    }

    #[test]
    fn test_blank_search_skips_request() {
        // Unroutable base URL: any real request would fail
        let client = TmdbClient::new("http://127.0.0.1:9").with_api_key("key");
        let set = client
            .fetch(&QueryKey::search(Category::TvSearch, None))
            .unwrap();
        assert!(set.is_empty());
        let set = client
            .fetch(&QueryKey::search(Category::MovieSearch, Some("  ")))
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_unconfigured_client() {
        let client = TmdbClient::new("http://127.0.0.1:9").with_api_key("   ");
        assert!(!client.is_configured());
        assert_eq!(
            client.fetch(&QueryKey::list(Category::MoviePopular)),
            Err(FetchError::NotConfigured)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::Status(401).to_string(), "HTTP error: 401");
        assert!(FetchError::NotConfigured.to_string().contains("API key"));
    }
}
