//! Naming convention utilities for code generation.
//!
//! Operation names are paths (`users/update`); target languages need
//! identifiers. These helpers do the conversions shared by all templates.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `word` | [`capitalize`] | `Word` |
//! | `users/get-by_id` | [`to_pascal_case`] | `UsersGetById` |
//! | `users/update` | [`operation_type_name`] | `Users_update` |
//! | `first name` | [`go_identifier`] | `First_name` |
//! | `first-name` | [`ts_property_key`] | `"first-name"` |

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use opsgen_codegen::naming::capitalize;
///
/// assert_eq!(capitalize("hello"), "Hello");
/// assert_eq!(capitalize("world"), "World");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert a string to PascalCase.
///
/// Splits on path separators, dashes, dots, and underscores.
///
/// # Examples
///
/// ```
/// use opsgen_codegen::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
/// assert_eq!(to_pascal_case("users/get-by-id"), "UsersGetById");
/// assert_eq!(to_pascal_case("hello"), "Hello");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['/', '-', '_', '.'])
        .map(capitalize)
        .collect()
}

/// Type name prefix for an operation.
///
/// Path separators, dots, and dashes become underscores and the first letter
/// is capitalized so the name is exported in Go.
///
/// # Examples
///
/// ```
/// use opsgen_codegen::naming::operation_type_name;
///
/// assert_eq!(operation_type_name("users/update"), "Users_update");
/// assert_eq!(operation_type_name("Weather"), "Weather");
/// ```
pub fn operation_type_name(operation: &str) -> String {
    capitalize(&operation.replace(['/', '.', '-'], "_"))
}

/// Exported Go identifier for a schema name.
///
/// Characters Go does not allow in identifiers become underscores; a leading
/// digit gets an `X` prefix.
pub fn go_identifier(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match sanitized.chars().next() {
        None => "X".to_string(),
        Some(first) if first.is_ascii_digit() => format!("X{sanitized}"),
        Some(_) => capitalize(&sanitized),
    }
}

/// Whether `name` can be used unquoted as a TypeScript property key
pub fn is_ts_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// TypeScript property key, quoted when needed
pub fn ts_property_key(name: &str) -> String {
    if is_ts_identifier(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Double-quoted string literal valid in both Go and TypeScript
pub fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use test_case::test_case;

    #[test]
    fn capitalize___capitalizes_first_letter() {
        assert_eq!(capitalize("hello"), "Hello");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn capitalize___preserves_rest_of_string() {
        assert_eq!(capitalize("helloWorld"), "HelloWorld");
        assert_eq!(capitalize("ALLCAPS"), "ALLCAPS");
    }

    #[test]
    fn to_pascal_case___converts_operation_paths() {
        assert_eq!(to_pascal_case("users/update"), "UsersUpdate");
        assert_eq!(to_pascal_case("nested/users/get-by_id"), "NestedUsersGetById");
    }

    #[test]
    fn to_pascal_case___handles_consecutive_separators() {
        assert_eq!(to_pascal_case("foo//bar"), "FooBar");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test_case("users/update", "Users_update")]
    #[test_case("users/get-by.id", "Users_get_by_id")]
    #[test_case("Weather", "Weather")]
    fn operation_type_name___replaces_separators(input: &str, expected: &str) {
        assert_eq!(operation_type_name(input), expected);
    }

    #[test_case("id", "Id")]
    #[test_case("first name", "First_name")]
    #[test_case("2fa", "X2fa")]
    #[test_case("", "X")]
    #[test_case("user-id", "User_id")]
    fn go_identifier___sanitizes_and_exports(input: &str, expected: &str) {
        assert_eq!(go_identifier(input), expected);
    }

    #[test_case("id", true)]
    #[test_case("_private", true)]
    #[test_case("$ref", true)]
    #[test_case("first-name", false)]
    #[test_case("2fa", false)]
    #[test_case("", false)]
    fn is_ts_identifier___classifies(input: &str, expected: bool) {
        assert_eq!(is_ts_identifier(input), expected);
    }

    #[test]
    fn ts_property_key___quotes_invalid_identifiers() {
        assert_eq!(ts_property_key("bio"), "bio");
        assert_eq!(ts_property_key("first-name"), "\"first-name\"");
    }

    #[test]
    fn quote___escapes_special_characters() {
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("http://localhost:9991"), "\"http://localhost:9991\"");
    }
}
