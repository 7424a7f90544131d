mod adherence;
mod date;
mod dose;
mod reminder;
mod shared;

pub use adherence::{compute_adherence, AdherenceSnapshot, NextReminder};
pub use date::{minutes_since_midnight_of, Day, InvalidDayError, InvalidTimeError, TimeOfDay};
pub use dose::{Dose, DoseStatus, InvalidDoseStatusError};
pub use reminder::{
    Category, InvalidCategoryError, InvalidWeekDayError, Reminder, RepeatRule, WeekDay,
};
pub use shared::entity::{Entity, ID};
