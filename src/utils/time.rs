use chrono::{DateTime, Duration, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Unix timestamp `ttl` from now, as JWT `exp` expects it.
pub fn expiry_from_now(ttl: Duration) -> usize {
    (now() + ttl).timestamp().max(0) as usize
}
