//! Ordered query-parameter builder.
//!
//! The provider takes everything as query parameters: `apiKey` always first,
//! arrays comma-joined, booleans/numbers stringified. Insertion order is
//! preserved so the serialized form doubles as a stable cache key.

/// Query parameters with stable insertion order
#[derive(Debug, Clone)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Start a parameter set; the API key always leads
    pub fn new(api_key: &str) -> Self {
        Self {
            pairs: vec![("apiKey".to_string(), api_key.to_string())],
        }
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    /// Comma-join a list parameter; empty lists are omitted entirely
    pub fn push_list(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.pairs.push((key.to_string(), values.join(",")));
        }
    }

    pub fn push_opt(&mut self, key: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Number of comma-joined elements in a list parameter, if present
    pub fn list_len(&self, key: &str) -> Option<usize> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.split(',').filter(|s| !s.is_empty()).count())
    }

    /// Cache key: endpoint path plus the serialized parameters
    pub fn cache_key(&self, path: &str) -> String {
        let query: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{path}?{}", query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_api_key_always_first() {
        let mut params = QueryParams::new("secret");
        params.push("regions", "us");
        assert_eq!(params.pairs()[0], ("apiKey".to_string(), "secret".to_string()));
    }

    #[test]
    fn test_lists_comma_joined_and_empty_omitted() {
        let mut params = QueryParams::new("k");
        params.push_list("markets", &strs(&["h2h", "spreads"]));
        params.push_list("bookmakers", &[]);
        params.push("all", true);

        assert_eq!(
            params.cache_key("/sports"),
            "/sports?apiKey=k&markets=h2h,spreads&all=true"
        );
        assert_eq!(params.list_len("markets"), Some(2));
        assert_eq!(params.list_len("bookmakers"), None);
    }

    #[test]
    fn test_cache_key_reflects_insertion_order() {
        let mut a = QueryParams::new("k");
        a.push("regions", "us");
        a.push("markets", "h2h");

        let mut b = QueryParams::new("k");
        b.push("markets", "h2h");
        b.push("regions", "us");

        assert_ne!(a.cache_key("/p"), b.cache_key("/p"));
        assert_eq!(a.cache_key("/p"), a.clone().cache_key("/p"));
    }
}
