#![warn(clippy::all)]

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate error_chain;

pub mod amount_formatter;
mod cli;
mod constants;
pub mod database;
pub mod goal_tracker;
pub mod notifications;
pub mod progress;
mod schema;
pub mod types;
mod utilities;

pub mod errors {
    use crate::types::GoalId;

    error_chain! {
        errors {
            GoalAlreadyAchieved(goal_name: String) {
                description("savings goal already achieved")
                display("Goal \"{}\" has already been achieved; no more savings can be added", goal_name)
            }
            GoalNotFound(goal_id: GoalId) {
                description("savings goal not found")
                display("Savings goal not found: {}", goal_id)
            }
            InvalidGoal(reason: String) {
                description("invalid savings goal")
                display("Invalid savings goal: {}", reason)
            }
        }
    }
}

pub use cli::run;
