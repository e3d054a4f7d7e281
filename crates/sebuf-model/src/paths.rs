//! Path and HTTP-method-string helpers (`spec.md` §4.1).

/// Extract `{name}` path parameter names from an HTTP path template, in the
/// order they appear. No regex crate needed — path templates are a narrow,
/// well-defined grammar (`/users/{user_id}/posts/{post_id}`).
#[must_use]
pub fn extract_path_params(path: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut chars = path.char_indices().peekable();
    while let Some((start, ch)) = chars.next() {
        if ch != '{' {
            continue;
        }
        let mut end = start + 1;
        for (idx, c) in chars.by_ref() {
            if c == '}' {
                end = idx;
                break;
            }
        }
        if end > start + 1 {
            params.push(path[start + 1..end].to_string());
        }
    }
    params
}

/// Ensure `path` starts with `/`. Empty input becomes `/`.
#[must_use]
pub fn ensure_leading_slash(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Concatenate a base path and a method path, ensuring exactly one `/`
/// between them and a leading `/` on the result.
#[must_use]
pub fn build_http_path(base: &str, method_path: &str) -> String {
    let base = ensure_leading_slash(base);
    let method_path = if method_path.is_empty() {
        String::new()
    } else {
        ensure_leading_slash(method_path)
    };

    if method_path.is_empty() {
        return base;
    }
    if base == "/" {
        return method_path;
    }
    format!("{}{}", base.trim_end_matches('/'), method_path)
}

/// Convert a proto method name (`GetUser`) into the snake-cased path segment
/// used as a default route when no explicit path is annotated (`get_user`).
#[must_use]
pub fn snake_case_method_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(ch);
            prev_lower_or_digit = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_param() {
        assert_eq!(
            extract_path_params("/users/{user_id}"),
            vec!["user_id".to_string()]
        );
    }

    #[test]
    fn extracts_multiple_params_in_order() {
        assert_eq!(
            extract_path_params("/users/{user_id}/posts/{post_id}"),
            vec!["user_id".to_string(), "post_id".to_string()]
        );
    }

    #[test]
    fn no_params_returns_empty() {
        assert!(extract_path_params("/users").is_empty());
    }

    #[test]
    fn ensures_leading_slash() {
        assert_eq!(ensure_leading_slash("users"), "/users");
        assert_eq!(ensure_leading_slash("/users"), "/users");
        assert_eq!(ensure_leading_slash(""), "/");
    }

    #[test]
    fn builds_path_without_double_slash() {
        assert_eq!(build_http_path("/v1/", "/users"), "/v1/users");
        assert_eq!(build_http_path("/v1", "users"), "/v1/users");
        assert_eq!(build_http_path("", "/users"), "/users");
        assert_eq!(build_http_path("/v1", ""), "/v1");
    }

    #[test]
    fn snake_cases_method_names() {
        assert_eq!(snake_case_method_name("GetUser"), "get_user");
        assert_eq!(snake_case_method_name("ListItems"), "list_items");
        assert_eq!(snake_case_method_name("get"), "get");
    }
}
