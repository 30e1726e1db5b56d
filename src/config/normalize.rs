//! Name normalization shared by flag lookup and environment binding.
//!
//! Flags are spelled with hyphens (`api-rest-url`), environment variables
//! with underscores (`API_REST_URL`). Internally every option is keyed by
//! the underscored form so both spellings land on the same entry. The
//! user-visible flag keeps its hyphens.

/// Normalize an option name to its internal key.
///
/// Replaces every `-` with `_`. Pure, total and idempotent.
pub fn normalize(name: &str) -> String {
    name.replace('-', "_")
}

/// Build the environment variable name bound to `name` under `prefix`.
///
/// ```
/// use vulnmap_iac_capture::config::env_var_name;
///
/// assert_eq!(
///     env_var_name("VULNMAP_IAC_CAPTURE", "api-rest-url"),
///     "VULNMAP_IAC_CAPTURE_API_REST_URL"
/// );
/// ```
pub fn env_var_name(prefix: &str, name: &str) -> String {
    format!("{}_{}", prefix, normalize(name).to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_every_hyphen() {
        assert_eq!(normalize("api-rest-url"), "api_rest_url");
        assert_eq!(normalize("http-tls-skip-verify"), "http_tls_skip_verify");
        assert_eq!(normalize("--x--"), "__x__");
    }

    #[test]
    fn test_normalize_leaves_plain_names_alone() {
        assert_eq!(normalize("org"), "org");
        assert_eq!(normalize("api_rest_token"), "api_rest_token");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["debug", "api-rest-url", "a-b_c-d", "-", "already_done"] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_hyphen_and_underscore_spellings_converge() {
        assert_eq!(normalize("api-rest-token"), normalize("api_rest_token"));
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("VULNMAP_IAC_CAPTURE", "org"), "VULNMAP_IAC_CAPTURE_ORG");
        assert_eq!(
            env_var_name("VULNMAP_IAC_CAPTURE", "http-tls-skip-verify"),
            "VULNMAP_IAC_CAPTURE_HTTP_TLS_SKIP_VERIFY"
        );
    }
}
