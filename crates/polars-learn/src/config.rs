pub use polars_core::config::verbose;

pub(crate) const ERROR_DETAIL_LIMIT: &str = "POLARS_LEARN_ERROR_DETAIL_LIMIT";

const DEFAULT_ERROR_DETAIL_LIMIT: usize = 4096;

/// Maximum length in bytes of an error message handed to the caller.
///
/// `None` when verbose logging is enabled; messages are then passed on in full.
pub fn error_detail_limit() -> Option<usize> {
    if verbose() {
        return None;
    }
    let limit = std::env::var(ERROR_DETAIL_LIMIT)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ERROR_DETAIL_LIMIT);
    Some(limit)
}

/// Clamp `msg` to at most `limit` bytes without splitting a character.
pub fn truncate_detail(msg: &str, limit: Option<usize>) -> &str {
    match limit {
        Some(limit) if msg.len() > limit => {
            let mut end = limit;
            while !msg.is_char_boundary(end) {
                end -= 1;
            }
            &msg[..end]
        },
        _ => msg,
    }
}
