//! Configuration keys and value validation.

mod daily_hours;

pub use daily_hours::{
    DEFAULT_DAILY_WORK_HOURS, GLOBAL_DAILY_WORK_HOURS, SettingsDomainError, parse_daily_hours,
};
