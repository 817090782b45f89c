//! `Authorization` 헤더에서 Bearer 토큰 추출.

/// Bearer 스킴 접두사 (대소문자 구분, 공백 한 칸).
pub const BEARER_PREFIX: &str = "Bearer ";

/// Bearer 토큰 추출 에러.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Authorization 헤더가 없습니다")]
    MissingHeader,
    #[error("Bearer 스킴이 아닙니다")]
    MalformedScheme,
    #[error("Bearer 토큰이 비어 있습니다")]
    EmptyToken,
}

/// 헤더 값에서 원시 토큰 문자열을 꺼냅니다.
///
/// 헤더가 있어야 하고, 정확히 `"Bearer "`로 시작해야 하며, 나머지가 비어 있으면 안 됩니다.
/// 토큰 자체에 대한 다른 처리(trim 등)는 하지 않습니다.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, BearerError> {
    let header = header.ok_or(BearerError::MissingHeader)?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::MalformedScheme)?;

    if token.is_empty() {
        return Err(BearerError::EmptyToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_valid_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc")), Ok("abc"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer_token(None), Err(BearerError::MissingHeader));
    }

    #[test]
    fn test_malformed_scheme() {
        assert_eq!(
            extract_bearer_token(Some("Basic xyz")),
            Err(BearerError::MalformedScheme)
        );
        // 대소문자 구분
        assert_eq!(
            extract_bearer_token(Some("bearer abc")),
            Err(BearerError::MalformedScheme)
        );
        // 공백 없음
        assert_eq!(
            extract_bearer_token(Some("Bearerabc")),
            Err(BearerError::MalformedScheme)
        );
        assert_eq!(
            extract_bearer_token(Some("")),
            Err(BearerError::MalformedScheme)
        );
        assert_eq!(
            extract_bearer_token(Some("Bearer")),
            Err(BearerError::MalformedScheme)
        );
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(
            extract_bearer_token(Some("Bearer ")),
            Err(BearerError::EmptyToken)
        );
    }

    #[test]
    fn test_token_not_trimmed() {
        assert_eq!(extract_bearer_token(Some("Bearer  abc")), Ok(" abc"));
    }

    proptest! {
        #[test]
        fn prop_bearer_prefix_round_trip(token in "[A-Za-z0-9._-]{1,64}") {
            let header = format!("Bearer {}", token);
            prop_assert_eq!(extract_bearer_token(Some(&header)), Ok(token.as_str()));
        }

        #[test]
        fn prop_other_schemes_rejected(scheme in "[A-Za-z]{1,10}", token in "[A-Za-z0-9]{1,16}") {
            prop_assume!(scheme != "Bearer");
            let header = format!("{} {}", scheme, token);
            prop_assert_eq!(
                extract_bearer_token(Some(&header)),
                Err(BearerError::MalformedScheme)
            );
        }
    }
}
