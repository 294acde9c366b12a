//! Route surface: `/`, `/movies/:movieId`, `/tv`, `/tv/:tvId`, `/search?keyword=`

use crate::models::ViewKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Movies { movie_id: Option<String> },
    Tv { tv_id: Option<String> },
    Search { keyword: Option<String> },
}

impl Default for Route {
    fn default() -> Self {
        Route::home()
    }
}

impl Route {
    pub fn home() -> Self {
        Route::Movies { movie_id: None }
    }

    pub fn search(keyword: &str) -> Self {
        Route::Search {
            keyword: Some(keyword.to_string()),
        }
    }

    /// Parse an address-bar path. `None` for paths outside the route surface.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (input, None),
        };

        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Route::Movies { movie_id: None }),
            ["movies", id] => Some(Route::Movies {
                movie_id: Some(percent_decode(id)),
            }),
            ["tv"] => Some(Route::Tv { tv_id: None }),
            ["tv", id] => Some(Route::Tv {
                tv_id: Some(percent_decode(id)),
            }),
            ["search"] => Some(Route::Search {
                keyword: query.and_then(|q| query_param(q, "keyword")),
            }),
            _ => None,
        }
    }

    /// Canonical path for the address bar
    pub fn path(&self) -> String {
        match self {
            Route::Movies { movie_id: None } => "/".to_string(),
            Route::Movies { movie_id: Some(id) } => format!("/movies/{}", encode_component(id)),
            Route::Tv { tv_id: None } => "/tv".to_string(),
            Route::Tv { tv_id: Some(id) } => format!("/tv/{}", encode_component(id)),
            Route::Search { keyword: None } => "/search".to_string(),
            Route::Search { keyword: Some(keyword) } => {
                format!("/search?keyword={}", encode_component(keyword))
            }
        }
    }

    pub fn view_kind(&self) -> ViewKind {
        match self {
            Route::Movies { .. } => ViewKind::Movies,
            Route::Tv { .. } => ViewKind::Tv,
            Route::Search { .. } => ViewKind::Search,
        }
    }

    /// Raw id segment of an overlay route
    pub fn focus_param(&self) -> Option<&str> {
        match self {
            Route::Movies { movie_id } => movie_id.as_deref(),
            Route::Tv { tv_id } => tv_id.as_deref(),
            Route::Search { .. } => None,
        }
    }

    pub fn keyword(&self) -> Option<&str> {
        match self {
            Route::Search { keyword } => keyword.as_deref(),
            _ => None,
        }
    }

    /// Target of a box click. Search results have no overlay route.
    pub fn with_focus(&self, id: u64) -> Route {
        match self {
            Route::Movies { .. } => Route::Movies {
                movie_id: Some(id.to_string()),
            },
            Route::Tv { .. } => Route::Tv {
                tv_id: Some(id.to_string()),
            },
            Route::Search { .. } => self.clone(),
        }
    }

    /// Target of an overlay backdrop click: the view's base path
    pub fn base(&self) -> Route {
        match self {
            Route::Movies { .. } => Route::Movies { movie_id: None },
            Route::Tv { .. } => Route::Tv { tv_id: None },
            Route::Search { .. } => self.clone(),
        }
    }

    /// True when moving to `other` needs a fresh view (different page or keyword)
    pub fn remounts(&self, other: &Route) -> bool {
        self.view_kind() != other.view_kind() || self.keyword() != other.keyword()
    }
}

/// First value of `name` in a `a=b&c=d` query string
pub fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| match pair.split_once('=') {
            Some((key, value)) => Some((key, value)),
            None if !pair.is_empty() => Some((pair, "")),
            None => None,
        })
        .find(|(key, _)| percent_decode(key) == name)
        .map(|(_, value)| percent_decode(value))
}

/// Decode `+` and `%XX` escapes. Malformed escapes are kept as-is.
pub fn percent_decode(input: &str) -> String {
    let spaced = input.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned(),
    }
}

/// Encode a path or query component; spaces become `+`
pub fn encode_component(input: &str) -> String {
    urlencoding::encode(input).replace("%20", "+")
}
