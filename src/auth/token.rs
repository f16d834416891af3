use time::OffsetDateTime;

/// Session tokens are opaque strings of the form `token_<userId>_<millis>`.
/// They are not signed; possession of the persisted token is the proof of
/// session validity.
pub fn issue(user_id: &str, now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    format!("token_{}_{}", user_id, millis)
}

/// Split a token back into its user id and issue instant (epoch millis).
/// Used for diagnostics only; a token is never validated beyond its shape.
pub fn parse(token: &str) -> Option<(&str, i64)> {
    let rest = token.strip_prefix("token_")?;
    let (user_id, millis) = rest.rsplit_once('_')?;
    if user_id.is_empty() {
        return None;
    }
    Some((user_id, millis.parse().ok()?))
}
