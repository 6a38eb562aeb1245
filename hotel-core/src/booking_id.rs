use rand::Rng;

use crate::{CoreError, CoreResult};

pub const BOOKING_ID_LEN: usize = 7;

/// Number of distinct identifiers (`0000000` through `9999999`).
const BOOKING_ID_SPACE: u32 = 10_000_000;

/// Attempts `assign_booking_id` makes before giving up on a free identifier.
pub const MAX_ID_ATTEMPTS: usize = 16;

pub trait BookingIdGenerator: Send + Sync {
    /// Produce a candidate identifier. Uniqueness is not this trait's concern.
    fn next_id(&self) -> String;
}

/// Draws identifiers from the thread-local CSPRNG, seeded once by the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomBookingIds;

impl BookingIdGenerator for RandomBookingIds {
    fn next_id(&self) -> String {
        let n = rand::thread_rng().gen_range(0..BOOKING_ID_SPACE);
        format!("{:07}", n)
    }
}

/// Draw identifiers until one is not taken.
///
/// Collisions are redrawn up to [`MAX_ID_ATTEMPTS`] times; past that the
/// identifier space is treated as exhausted.
pub fn assign_booking_id(
    ids: &dyn BookingIdGenerator,
    is_taken: impl Fn(&str) -> bool,
) -> CoreResult<String> {
    for attempt in 1..=MAX_ID_ATTEMPTS {
        let id = ids.next_id();
        if !is_taken(&id) {
            return Ok(id);
        }
        tracing::debug!("Booking id {} already in use (attempt {})", id, attempt);
    }

    Err(CoreError::IdentifierSpaceExhausted { attempts: MAX_ID_ATTEMPTS })
}

pub fn is_valid_booking_id(id: &str) -> bool {
    id.len() == BOOKING_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct Sequence(Mutex<Vec<&'static str>>);

    impl Sequence {
        fn new(ids: &[&'static str]) -> Self {
            let mut ids = ids.to_vec();
            ids.reverse();
            Self(Mutex::new(ids))
        }
    }

    impl BookingIdGenerator for Sequence {
        fn next_id(&self) -> String {
            self.0.lock().unwrap().pop().unwrap_or("9999999").to_string()
        }
    }

    #[test]
    fn random_ids_are_seven_digits() {
        let ids = RandomBookingIds;
        for _ in 0..1_000 {
            let id = ids.next_id();
            assert!(is_valid_booking_id(&id), "bad id {id}");
        }
    }

    #[test]
    fn random_ids_vary_between_rapid_calls() {
        let ids = RandomBookingIds;
        let drawn: HashSet<String> = (0..100).map(|_| ids.next_id()).collect();
        assert!(drawn.len() > 90);
    }

    #[test]
    fn validates_booking_id_shape() {
        assert!(is_valid_booking_id("0000000"));
        assert!(is_valid_booking_id("0123456"));
        assert!(!is_valid_booking_id("123456"));
        assert!(!is_valid_booking_id("12345678"));
        assert!(!is_valid_booking_id("12a4567"));
        assert!(!is_valid_booking_id(""));
    }

    #[test]
    fn assign_redraws_on_collision() {
        let ids = Sequence::new(&["0000001", "0000001", "0000002"]);
        let taken = ["0000001"];

        let id = assign_booking_id(&ids, |id| taken.contains(&id)).unwrap();
        assert_eq!(id, "0000002");
    }

    #[test]
    fn assign_gives_up_after_max_attempts() {
        let ids = Sequence::new(&[]);

        let err = assign_booking_id(&ids, |_| true).unwrap_err();
        assert!(matches!(
            err,
            CoreError::IdentifierSpaceExhausted { attempts: MAX_ID_ATTEMPTS }
        ));
    }
}
