use mes_core::{AppError, AppResult};

/// Shortest accepted role or permission code.
pub const CODE_MIN_LENGTH: usize = 2;

/// Longest accepted role or permission code.
pub const CODE_MAX_LENGTH: usize = 64;

/// Returns whether `value` is upper snake case, e.g. `USER_CREATE`.
///
/// Segments are separated by single underscores, the first character is an
/// ASCII uppercase letter and every other character is uppercase or a digit.
#[must_use]
pub fn is_upper_snake_case(value: &str) -> bool {
    let mut segments = value.split('_');
    let Some(first) = segments.next() else {
        return false;
    };

    if !first.starts_with(|character: char| character.is_ascii_uppercase()) {
        return false;
    }

    std::iter::once(first).chain(segments).all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|character| character.is_ascii_uppercase() || character.is_ascii_digit())
    })
}

pub(crate) fn validate_code(value: impl Into<String>, field: &str) -> AppResult<String> {
    let value = value.into();
    let trimmed = value.trim();

    let length = trimmed.chars().count();
    if !(CODE_MIN_LENGTH..=CODE_MAX_LENGTH).contains(&length) {
        return Err(AppError::Validation(format!(
            "{field} must be between {CODE_MIN_LENGTH} and {CODE_MAX_LENGTH} characters"
        )));
    }

    if !is_upper_snake_case(trimmed) {
        return Err(AppError::Validation(format!(
            "{field} '{trimmed}' must be upper snake case, e.g. USER_CREATE"
        )));
    }

    Ok(trimmed.to_owned())
}
