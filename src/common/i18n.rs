// src/common/i18n.rs

// Catálogo de mensagens de erro por idioma.
// As chaves são os mesmos códigos devolvidos por AppError::code().

pub const DEFAULT_LANG: &str = "en";

/// Reduz qualquer tag recebida ("ko-KR", "pt", "fr") para um idioma suportado.
pub fn normalize(lang: &str) -> &'static str {
    match lang {
        "ko" => "ko",
        "pt" => "pt",
        _ => DEFAULT_LANG,
    }
}

/// Devolve o modelo da mensagem. `{0}` é substituído pelo parâmetro do erro, quando houver.
pub fn translate(lang: &str, code: &str) -> &'static str {
    match (code, normalize(lang)) {
        ("validation_failed", "ko") => "하나 이상의 필드가 올바르지 않습니다.",
        ("validation_failed", "pt") => "Um ou mais campos são inválidos.",
        ("validation_failed", _) => "One or more fields are invalid.",

        ("invalid_input", "ko") => "잘못된 요청입니다: {0}",
        ("invalid_input", "pt") => "Requisição inválida: {0}",
        ("invalid_input", _) => "Invalid request: {0}",

        ("email_already_exists", "ko") => "이미 사용 중인 이메일입니다.",
        ("email_already_exists", "pt") => "Este e-mail já está em uso.",
        ("email_already_exists", _) => "This e-mail is already in use.",

        ("invalid_credentials", "ko") => "이메일 또는 비밀번호가 올바르지 않습니다.",
        ("invalid_credentials", "pt") => "E-mail ou senha inválidos.",
        ("invalid_credentials", _) => "Invalid e-mail or password.",

        ("invalid_token", "ko") => "인증 토큰이 없거나 유효하지 않습니다.",
        ("invalid_token", "pt") => "Token de autenticação inválido ou ausente.",
        ("invalid_token", _) => "Missing or invalid authentication token.",

        ("forbidden", "ko") => "이 작업을 수행할 권한이 없습니다.",
        ("forbidden", "pt") => "Você não tem permissão para realizar esta ação.",
        ("forbidden", _) => "You are not allowed to perform this action.",

        ("user_not_found", "ko") => "사용자를 찾을 수 없습니다.",
        ("user_not_found", "pt") => "Usuário não encontrado.",
        ("user_not_found", _) => "User not found.",

        ("not_found", "ko") => "{0}을(를) 찾을 수 없습니다.",
        ("not_found", "pt") => "{0} não encontrado.",
        ("not_found", _) => "{0} not found.",

        ("invalid_state", "ko") => "현재 상태에서는 허용되지 않는 작업입니다: {0}",
        ("invalid_state", "pt") => "Operação não permitida no estado atual: {0}",
        ("invalid_state", _) => "Operation not allowed in the current state: {0}",

        ("insufficient_balance", "ko") => "포인트 잔액이 부족합니다.",
        ("insufficient_balance", "pt") => "Saldo de pontos insuficiente.",
        ("insufficient_balance", _) => "Insufficient points balance.",

        ("already_processed", "ko") => "이미 처리된 요청입니다.",
        ("already_processed", "pt") => "Esta solicitação já foi processada.",
        ("already_processed", _) => "This request has already been processed.",

        ("no_price_configured", "ko") => "'{0}' 상품에 설정된 단가가 없습니다.",
        ("no_price_configured", "pt") => "Nenhum preço configurado para '{0}'.",
        ("no_price_configured", _) => "No price configured for '{0}'.",

        ("internal_error", "ko") => "예기치 않은 오류가 발생했습니다.",
        ("internal_error", "pt") => "Ocorreu um erro inesperado.",
        _ => "An unexpected error occurred.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_languages_fall_back_to_english() {
        assert_eq!(normalize("fr"), "en");
        assert_eq!(translate("fr", "already_processed"), "This request has already been processed.");
    }

    #[test]
    fn korean_catalog_is_used_when_requested() {
        assert_eq!(translate("ko", "insufficient_balance"), "포인트 잔액이 부족합니다.");
    }

    #[test]
    fn unknown_codes_use_the_generic_message() {
        assert_eq!(translate("en", "something_else"), "An unexpected error occurred.");
    }
}
