use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_DATABASE_FILENAME: &str = "goals.sqlite3";
pub const DEFAULT_USER_ID: &str = "local";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Crossing this share of the target (from below) fires a progress notification.
pub const PROGRESS_MILESTONE_PERCENT: i64 = 75;
pub const PROGRESS_BAR_WIDTH: usize = 20;

pub const DATABASE_FILE_ARG: &str = "database-file";
pub const DATABASE_FILE_ENV: &str = "GOALS_DATABASE_FILE";
pub const USER_ID_ARG: &str = "user";
pub const USER_ID_ENV: &str = "GOALS_USER_ID";
pub const CURRENCY_SYMBOL_ARG: &str = "currency-symbol";
pub const CURRENCY_SYMBOL_ENV: &str = "GOALS_CURRENCY_SYMBOL";

pub const LIST_COMMAND: &str = "list";
pub const ADD_COMMAND: &str = "add";
pub const UPDATE_COMMAND: &str = "update";
pub const DELETE_COMMAND: &str = "delete";
pub const DEPOSITS_COMMAND: &str = "deposits";

pub const GOAL_ID_ARG: &str = "GOAL_ID";
pub const AMOUNT_ARG: &str = "AMOUNT";
pub const NAME_ARG: &str = "NAME";
pub const TARGET_ARG: &str = "TARGET";
pub const DEADLINE_ARG: &str = "deadline";
pub const DESCRIPTION_ARG: &str = "description";
pub const YES_ARG: &str = "yes";

lazy_static! {
    pub static ref AMOUNT_REGEX: Regex =
        Regex::new(r"^\d+(\.\d{1,2})?$").expect("AMOUNT_REGEX should be valid");
}
