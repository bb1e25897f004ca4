/// Transport-level status of a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportStatus {
    pub success: bool,
    pub code: Option<u16>,
}

impl TransportStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: None,
        }
    }

    pub fn failed(code: Option<u16>) -> Self {
        Self {
            success: false,
            code,
        }
    }

    /// Classify an HTTP status code: 2xx is success, everything else is failure
    pub fn from_http(code: u16) -> Self {
        Self {
            success: (200..300).contains(&code),
            code: Some(code),
        }
    }
}

/// Response headers with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value whose name matches `name` ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A completed response handed over by the transport
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: TransportStatus,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: TransportStatus, headers: Headers, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}
