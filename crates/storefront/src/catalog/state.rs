//! Shareable filter state, encoded in the URL query string.
//!
//! | Parameter | Meaning                                             |
//! |-----------|-----------------------------------------------------|
//! | `q`       | search text                                         |
//! | `fcolor`  | color tokens, comma-separated and/or repeated       |
//! | `sort`    | sort key, kept verbatim even when not recognized    |
//!
//! Color tokens are trimmed and split on `,` when decoded, so a token cannot
//! carry a comma. Encoding such a token and decoding it again yields its
//! comma-separated pieces as separate tokens. Any state whose tokens are
//! trimmed, non-empty and comma-free survives `to_query` then `from_query`
//! unchanged.

use url::form_urlencoded;

use crate::catalog::SortKey;

const QUERY_PARAM: &str = "q";
const COLOR_PARAM: &str = "fcolor";
const SORT_PARAM: &str = "sort";

/// Search text, selected colors and sort key for one catalog view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub colors: Vec<String>,
    pub sort: Option<String>,
}

impl FilterState {
    /// Decode from a query string, with or without the leading `?`.
    ///
    /// Unknown parameters are ignored. When `q` or `sort` repeat, the last
    /// one wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                QUERY_PARAM => state.query = value.into_owned(),
                COLOR_PARAM => state.colors.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|token| !token.is_empty())
                        .map(str::to_string),
                ),
                SORT_PARAM => {
                    state.sort = Some(value.into_owned()).filter(|sort| !sort.is_empty());
                }
                _ => {}
            }
        }

        state
    }

    /// Encode as a query string (no leading `?`). Empty fields are omitted,
    /// so the default state encodes as `""`.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if !self.query.is_empty() {
            serializer.append_pair(QUERY_PARAM, &self.query);
        }
        if !self.colors.is_empty() {
            serializer.append_pair(COLOR_PARAM, &self.colors.join(","));
        }
        if let Some(sort) = &self.sort {
            serializer.append_pair(SORT_PARAM, sort);
        }

        serializer.finish()
    }

    /// The recognized sort key, if any.
    #[must_use]
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_deref().and_then(SortKey::parse)
    }

    /// Whether every stage of the pipeline is a no-op for this state.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.query.trim().is_empty() && self.colors.is_empty() && self.sort_key().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_all_params() {
        let state = FilterState::from_query("?q=red+hat&fcolor=red,Dark%20Blue&sort=price-desc");
        assert_eq!(state.query, "red hat");
        assert_eq!(state.colors, ["red", "Dark Blue"]);
        assert_eq!(state.sort.as_deref(), Some("price-desc"));
        assert_eq!(state.sort_key(), Some(SortKey::PriceDesc));
    }

    #[test]
    fn test_repeated_and_blank_color_tokens() {
        let state = FilterState::from_query("fcolor=red&fcolor=blue,,%20&fcolor=");
        assert_eq!(state.colors, ["red", "blue"]);
    }

    #[test]
    fn test_unrecognized_sort_preserved() {
        let state = FilterState::from_query("sort=popular");
        assert_eq!(state.sort.as_deref(), Some("popular"));
        assert_eq!(state.sort_key(), None);
        assert_eq!(state.to_query(), "sort=popular");
        assert!(state.is_identity());
    }

    #[test]
    fn test_empty_query_is_default() {
        assert_eq!(FilterState::from_query(""), FilterState::default());
        assert_eq!(FilterState::from_query("?sort="), FilterState::default());
        assert_eq!(FilterState::default().to_query(), "");
    }

    #[test]
    fn test_restored_verbatim() {
        let state = FilterState {
            query: "wool & silk".to_string(),
            colors: vec!["navy".to_string(), "off white".to_string()],
            sort: Some("newest".to_string()),
        };
        let encoded = state.to_query();
        assert_eq!(encoded, "q=wool+%26+silk&fcolor=navy%2Coff+white&sort=newest");
        assert_eq!(FilterState::from_query(&encoded), state);
    }

    #[test]
    fn test_comma_in_color_token_splits_on_decode() {
        let state = FilterState {
            colors: vec!["red,blue".to_string()],
            ..FilterState::default()
        };
        let decoded = FilterState::from_query(&state.to_query());
        assert_eq!(decoded.colors, ["red", "blue"]);
    }
}
