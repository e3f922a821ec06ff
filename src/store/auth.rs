//! Store authentication methods

/// How requests to the document store are authenticated.
pub enum Auth {
    /// Use an API key authentication via headers
    Apikey(String),
    /// Use username and password authentication via Basic Auth headers
    Basic(String, String),
    /// Don't use any authentication
    None,
}

impl std::fmt::Display for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apikey(_) => write!(f, "Apikey"),
            Self::Basic(_, _) => write!(f, "Basic"),
            Self::None => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_never_leaks_credentials() {
        let auth = Auth::Basic("admin".to_string(), "hunter2".to_string());
        assert_eq!(auth.to_string(), "Basic");

        let auth = Auth::Apikey("c2VjcmV0".to_string());
        assert_eq!(auth.to_string(), "Apikey");

        assert_eq!(Auth::None.to_string(), "None");
    }
}
