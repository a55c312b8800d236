use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;
use log::debug;
use std::fs;
use std::path;

use crate::errors::*;
use crate::schema;
use crate::types::*;

pub mod models;

use self::models::*;

embed_migrations!("migrations");

no_arg_sql_function!(
    last_insert_rowid,
    diesel::sql_types::Integer,
    "Row ID of the most recent successful INSERT on this connection"
);

/// Row-scoped storage for goals and their deposits. Every call is filtered by
/// the owning user.
pub trait GoalStore {
    /// Newest-created first.
    fn load_goals(&self, user: &UserId) -> Result<Vec<SavingsGoal>>;

    fn create_goal(&self, user: &UserId, new_goal: &NewSavingsGoal) -> Result<SavingsGoal>;

    /// Fails with `ErrorKind::GoalNotFound` if no row was written.
    fn set_goal_amount(&self, user: &UserId, goal: GoalId, amount: Amount) -> Result<()>;

    fn insert_deposit(&self, deposit: &NewDeposit) -> Result<()>;

    /// Oldest first.
    fn load_deposits(&self, user: &UserId, goal: GoalId) -> Result<Vec<Deposit>>;

    fn delete_deposits(&self, user: &UserId, goal: GoalId) -> Result<usize>;

    /// Fails with `ErrorKind::GoalNotFound` if no row was deleted.
    fn delete_goal(&self, user: &UserId, goal: GoalId) -> Result<()>;
}

pub struct Database {
    connection: SqliteConnection,
}

type SavingsGoalRow = (
    i32,
    String,
    String,
    i64,
    i64,
    Option<i32>,
    Option<String>,
    i64,
);

type DepositRow = (i32, String, i32, i64, i32);

impl Database {
    pub fn establish_connection(database_file: &str) -> Result<Database> {
        let parent = path::Path::new(database_file).parent().chain_err(|| {
            format!(
                "Failed to determine parent directory of database file path: {}",
                database_file
            )
        })?;
        fs::create_dir_all(parent)
            .chain_err(|| format!("Failed to create database directory: {}", parent.display()))?;
        debug!("Using database file: {}", database_file);
        Database::open(database_file)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Database> {
        Database::open(":memory:")
    }

    fn open(database_url: &str) -> Result<Database> {
        let connection = SqliteConnection::establish(database_url)
            .chain_err(|| "Failed to establish SQLite database connection")?;
        embedded_migrations::run(&connection)
            .chain_err(|| "Failed to perform database schema migrations")?;
        Ok(Database { connection })
    }
}

impl GoalStore for Database {
    fn load_goals(&self, user: &UserId) -> Result<Vec<SavingsGoal>> {
        use schema::savings_goals::dsl::*;
        Ok(schema::savings_goals::table
            .select((
                id,
                user_id,
                name,
                target_amount_cents,
                current_amount_cents,
                deadline,
                description,
                created_at,
            ))
            .filter(user_id.eq(&user.0))
            .order((created_at.desc(), id.desc()))
            .load::<SavingsGoalRow>(&self.connection)
            .chain_err(|| "Failed to load savings goals from database")?
            .into_iter()
            .map(savings_goal_from_row)
            .collect())
    }

    fn create_goal(&self, user: &UserId, new_goal: &NewSavingsGoal) -> Result<SavingsGoal> {
        use schema::savings_goals::dsl::*;
        let created_at_ = chrono::Utc::now().timestamp();
        let current_amount_ = Amount::zero();
        diesel::insert_into(schema::savings_goals::table)
            .values((
                user_id.eq(&user.0),
                name.eq(&new_goal.name),
                target_amount_cents.eq(new_goal.target_amount.to_scaled_i64()?),
                current_amount_cents.eq(current_amount_.to_scaled_i64()?),
                deadline.eq(new_goal.deadline.map(|date| date.num_days_from_ce())),
                description.eq(new_goal.description.as_deref()),
                created_at.eq(created_at_),
            ))
            .execute(&self.connection)
            .chain_err(|| "Failed to save new savings goal to database")?;
        let goal_id = diesel::select(last_insert_rowid)
            .get_result::<i32>(&self.connection)
            .chain_err(|| "Failed to read savings goal record ID from database")?;
        debug!("Created savings goal {} for user {}", goal_id, user);
        Ok(SavingsGoal {
            id: GoalId(goal_id),
            user_id: user.clone(),
            name: new_goal.name.clone(),
            target_amount: new_goal.target_amount,
            current_amount: current_amount_,
            deadline: new_goal.deadline,
            description: new_goal.description.clone(),
            created_at: created_at_,
        })
    }

    fn set_goal_amount(&self, user: &UserId, goal: GoalId, amount: Amount) -> Result<()> {
        use schema::savings_goals::dsl::*;
        let updated_rows = diesel::update(
            schema::savings_goals::table
                .filter(id.eq(goal.0))
                .filter(user_id.eq(&user.0)),
        )
        .set(current_amount_cents.eq(amount.to_scaled_i64()?))
        .execute(&self.connection)
        .chain_err(|| "Failed to save savings goal amount in database")?;
        if updated_rows == 0 {
            bail!(ErrorKind::GoalNotFound(goal));
        }
        Ok(())
    }

    fn insert_deposit(&self, deposit: &NewDeposit) -> Result<()> {
        use schema::deposits::dsl::*;
        diesel::insert_into(schema::deposits::table)
            .values((
                user_id.eq(&deposit.user_id.0),
                goal_id.eq(deposit.goal_id.0),
                amount_cents.eq(deposit.amount.to_scaled_i64()?),
                deposit_date.eq(deposit.deposit_date.num_days_from_ce()),
            ))
            .execute(&self.connection)
            .chain_err(|| "Failed to save new deposit to database")?;
        Ok(())
    }

    fn load_deposits(&self, user: &UserId, goal: GoalId) -> Result<Vec<Deposit>> {
        use schema::deposits::dsl::*;
        Ok(schema::deposits::table
            .select((id, user_id, goal_id, amount_cents, deposit_date))
            .filter(user_id.eq(&user.0))
            .filter(goal_id.eq(goal.0))
            .order((deposit_date.asc(), id.asc()))
            .load::<DepositRow>(&self.connection)
            .chain_err(|| "Failed to load deposits from database")?
            .into_iter()
            .map(deposit_from_row)
            .collect())
    }

    fn delete_deposits(&self, user: &UserId, goal: GoalId) -> Result<usize> {
        use schema::deposits::dsl::*;
        diesel::delete(schema::deposits::table)
            .filter(user_id.eq(&user.0))
            .filter(goal_id.eq(goal.0))
            .execute(&self.connection)
            .chain_err(|| "Failed to delete deposits in database")
    }

    fn delete_goal(&self, user: &UserId, goal: GoalId) -> Result<()> {
        use schema::savings_goals::dsl::*;
        let deleted_rows = diesel::delete(schema::savings_goals::table)
            .filter(id.eq(goal.0))
            .filter(user_id.eq(&user.0))
            .execute(&self.connection)
            .chain_err(|| "Failed to delete savings goal in database")?;
        if deleted_rows == 0 {
            bail!(ErrorKind::GoalNotFound(goal));
        }
        Ok(())
    }
}

fn savings_goal_from_row(
    (id, user_id, name, target_cents, current_cents, deadline_days, description, created_at): SavingsGoalRow,
) -> SavingsGoal {
    SavingsGoal {
        id: GoalId(id),
        user_id: UserId(user_id),
        name,
        target_amount: Amount::from_scaled_i64(target_cents),
        current_amount: Amount::from_scaled_i64(current_cents),
        deadline: deadline_days.map(NaiveDate::from_num_days_from_ce),
        description,
        created_at,
    }
}

fn deposit_from_row((id, user_id, goal_id, amount_cents, deposit_days): DepositRow) -> Deposit {
    Deposit {
        id: DepositId(id),
        user_id: UserId(user_id),
        goal_id: GoalId(goal_id),
        amount: Amount::from_scaled_i64(amount_cents),
        deposit_date: NaiveDate::from_num_days_from_ce(deposit_days),
    }
}
