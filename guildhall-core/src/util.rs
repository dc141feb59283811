use chrono::Utc;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

pub fn random_string(length: usize) -> String {
    let mut rng = thread_rng();

    std::iter::repeat(())
        .map(|_| rng.sample(Alphanumeric) as char)
        .take(length)
        .collect()
}

/// Millisecond timestamp used as a record id within a collection.
///
/// Two records created within the same millisecond collide. That is accepted
/// for an admin-driven deployment and not defended against.
pub fn timestamp_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn random_string_has_requested_length() {
        let value = random_string(32);

        assert_eq!(value.len(), 32);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn timestamp_id_is_numeric() {
        let id = timestamp_id();

        assert!(id.parse::<i64>().is_ok());
    }
}
