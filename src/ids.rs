use std::sync::atomic::{AtomicI64, Ordering};

use time::OffsetDateTime;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond-clock identifier, unique for the lifetime of the process.
/// Rapid successive calls within the same millisecond bump past the last
/// issued value, so ids are strictly increasing.
pub fn next_id() -> String {
    let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    let mut prev = LAST_ID.load(Ordering::SeqCst);
    loop {
        let next = now_ms.max(prev + 1);
        match LAST_ID.compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return next.to_string(),
            Err(actual) => prev = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let ids: Vec<i64> = (0..1000).map(|_| next_id().parse().unwrap()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn ids_look_like_epoch_millis() {
        let id: i64 = next_id().parse().unwrap();
        // Sometime after 2020-01-01 in milliseconds.
        assert!(id > 1_577_836_800_000);
    }
}
