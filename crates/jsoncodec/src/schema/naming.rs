//! Accessor classification and logical property names.

use super::MethodDecl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AccessorKind {
    Getter,
    Setter,
}

/// Classifies a method as a getter or setter and derives its logical name.
///
/// - setter: non-static, `set` + suffix, exactly one parameter
/// - getter: non-static, no parameters, a return type, and `get` + suffix or
///   `is` + suffix
///
/// Setters are checked first, so a one-parameter `setX` with a return type is
/// still a setter.
pub(crate) fn classify<T>(method: &MethodDecl<T>) -> Option<(AccessorKind, String)> {
    if method.is_static {
        return None;
    }

    if method.params.len() == 1 {
        if let Some(name) = method.name.strip_prefix("set").and_then(logical_name) {
            return Some((AccessorKind::Setter, name));
        }
    }

    if method.params.is_empty() && method.returns.is_some() {
        let suffix = method
            .name
            .strip_prefix("get")
            .or_else(|| method.name.strip_prefix("is"));
        if let Some(name) = suffix.and_then(logical_name) {
            return Some((AccessorKind::Getter, name));
        }
    }

    None
}

/// `Name` -> `name`, `_name` -> `name`. Only the first character is
/// lower-cased, so `URL` becomes `uRL`.
pub(crate) fn logical_name(suffix: &str) -> Option<String> {
    let suffix = suffix.strip_prefix('_').unwrap_or(suffix);
    let mut chars = suffix.chars();
    let first = chars.next()?;
    let mut name = String::with_capacity(suffix.len());
    name.extend(first.to_lowercase());
    name.push_str(chars.as_str());
    Some(name)
}
