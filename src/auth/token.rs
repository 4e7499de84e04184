/// A Jenkins API token. Never printed in full.
#[derive(Clone)]
pub struct Token(String);

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_str_creates_token() {
        let token = Token::from("11a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7");

        assert_eq!(token.as_str(), "11a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7");
    }

    #[test]
    fn test_token_from_owned_string() {
        let token = Token::from(String::from("owned_token"));

        assert_eq!(token.as_str(), "owned_token");
    }

    #[test]
    fn test_whitespace_token_is_empty() {
        assert!(Token::from("").is_empty());
        assert!(Token::from("  \t").is_empty());
        assert!(!Token::from("abc").is_empty());
    }

    #[test]
    fn test_token_debug_redacts_value() {
        let token = Token::from("11f0e9d8c7b6a5_very_secret");
        let debug_output = format!("{token:?}");

        assert_eq!(debug_output, "<redacted>");
        assert!(!debug_output.contains("secret"));
    }
}
