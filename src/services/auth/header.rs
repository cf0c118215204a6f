/// Extracts the credential from an `Authorization: Bearer <token>` header value.
///
/// Scheme comparison is case-insensitive; anything that is not a bearer
/// scheme followed by a non-empty credential yields `None`.
pub fn token_from_header(authorization: Option<&str>) -> Option<&str> {
    let (scheme, token) = authorization?.split_once(' ')?;
    let token = token.trim();

    if token.is_empty() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_bearer_token_any_case() {
        for header in ["Bearer abc.def.ghi", "bearer abc.def.ghi", "BEARER abc.def.ghi"] {
            assert_eq!(token_from_header(Some(header)), Some("abc.def.ghi"));
        }
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(token_from_header(Some("Bearer   tok  ")), Some("tok"));
    }

    #[test]
    fn test_rejects_non_bearer_headers() {
        let cases = [
            None,
            Some(""),
            Some("Bearer"),
            Some("Bearer "),
            Some("Bearer    "),
            Some("Basic xyz"),
            Some("Bearerabc"),
            Some(" Bearer abc"),
        ];

        for header in cases {
            assert_eq!(token_from_header(header), None, "header: {:?}", header);
        }
    }
}
