// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::{normalize, DEFAULT_LANG};

// Idioma preferido do cliente, usado nas mensagens de erro
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    pub fn from_header(value: Option<&str>) -> Self {
        let lang = value
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first()
                    // "ko-KR" -> "ko"
                    .map(|tag| tag.split('-').next().unwrap_or(tag).to_string())
            })
            .map(|primary| normalize(&primary).to_string())
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }

    pub fn from_parts(parts: &Parts) -> Self {
        let header_value = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        Locale::from_header(header_value)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_primary_tag_of_the_preferred_language() {
        assert_eq!(Locale::from_header(Some("ko-KR,ko;q=0.9,en;q=0.8")).0, "ko");
    }

    #[test]
    fn falls_back_to_default_when_missing_or_unsupported() {
        assert_eq!(Locale::from_header(None).0, "en");
        assert_eq!(Locale::from_header(Some("fr-FR")).0, "en");
    }
}
