pub mod history;
pub mod transform;
pub mod uploads;
