use crate::domain::model::Id;
use std::fmt;

/// Navigable locations of the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Branch(String),
    Subject(Id),
    /// `None` when the query is missing or empty.
    Search(Option<String>),
    Auth,
    Admin,
    Practice(Id),
    NotFound(String),
}

impl Route {
    /// Parse a path such as `/subject/12` or `/search?q=linked+lists`.
    pub fn parse(input: &str) -> Route {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (input, None),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["branch", slug] => Route::Branch((*slug).to_string()),
            ["subject", id] => id
                .parse()
                .map(Route::Subject)
                .unwrap_or_else(|_| Route::NotFound(input.to_string())),
            ["practice", id] => id
                .parse()
                .map(Route::Practice)
                .unwrap_or_else(|_| Route::NotFound(input.to_string())),
            ["search"] => Route::Search(query.and_then(search_term)),
            ["auth"] => Route::Auth,
            ["admin"] => Route::Admin,
            _ => Route::NotFound(input.to_string()),
        }
    }
}

fn search_term(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Branch(slug) => write!(f, "/branch/{}", slug),
            Route::Subject(id) => write!(f, "/subject/{}", id),
            Route::Search(None) => write!(f, "/search"),
            Route::Search(Some(term)) => {
                let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("q", term)
                    .finish();
                write!(f, "/search?{}", encoded)
            }
            Route::Auth => write!(f, "/auth"),
            Route::Admin => write!(f, "/admin"),
            Route::Practice(id) => write!(f, "/practice/{}", id),
            Route::NotFound(path) => write!(f, "{}", path),
        }
    }
}
