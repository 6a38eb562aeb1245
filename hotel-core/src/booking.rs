use serde::{Deserialize, Serialize};

/// A single reservation, as persisted to the bookings file.
///
/// Field order here is the key order on disk. Files written before `email`
/// and `booking_id` existed still load; the missing keys become empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub name: String,
    #[serde(rename = "checkin")]
    pub check_in: String,
    #[serde(rename = "checkout")]
    pub check_out: String,
    #[serde(rename = "roomtype")]
    pub room_type: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub booking_id: String,
}

/// Raw booking submission. Absent fields are empty strings; nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub checkin: String,
    pub checkout: String,
    pub roomtype: String,
    pub email: String,
}

impl BookingForm {
    /// Build a form from submitted key/value pairs.
    ///
    /// The first value of a repeated key wins and unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        let mut seen = [false; 5];

        for (key, value) in pairs {
            let (slot, field) = match key.as_ref() {
                "name" => (0, &mut form.name),
                "checkin" => (1, &mut form.checkin),
                "checkout" => (2, &mut form.checkout),
                "roomtype" => (3, &mut form.roomtype),
                "email" => (4, &mut form.email),
                _ => continue,
            };
            if !seen[slot] {
                seen[slot] = true;
                *field = value.into();
            }
        }

        form
    }

    pub fn into_booking(self, booking_id: String) -> Booking {
        Booking {
            name: self.name,
            check_in: self.checkin,
            check_out: self.checkout,
            room_type: self.roomtype,
            email: self.email,
            booking_id,
        }
    }
}

/// Plain-text confirmation mail sent to the guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Confirmation {
    pub const SUBJECT: &'static str = "Booking Confirmation";

    pub fn for_booking(booking: &Booking) -> Self {
        let body = format!(
            "Dear {},\n\nYour booking has been confirmed!\n\n\
             Booking ID: {}\nCheck-in: {}\nCheck-out: {}\nRoom Type: {}\n\n\
             Thank you for choosing our service!",
            booking.name, booking.booking_id, booking.check_in, booking.check_out, booking.room_type,
        );

        Self {
            to: booking.email.clone(),
            subject: Self::SUBJECT.to_string(),
            body,
        }
    }
}
