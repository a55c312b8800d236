use chrono::NaiveDate;

use crate::progress::progress;
use crate::types::*;

#[derive(Clone, Debug, PartialEq)]
pub struct SavingsGoal {
    pub id: GoalId,
    pub user_id: UserId,
    pub name: String,
    pub target_amount: Amount,
    pub current_amount: Amount,
    pub deadline: Option<NaiveDate>,
    pub description: Option<String>,
    /// Unix seconds, assigned by the store on insert.
    pub created_at: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Amount,
    pub deadline: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Deposit {
    pub id: DepositId,
    pub user_id: UserId,
    pub goal_id: GoalId,
    pub amount: Amount,
    pub deposit_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewDeposit {
    pub user_id: UserId,
    pub goal_id: GoalId,
    pub amount: Amount,
    pub deposit_date: NaiveDate,
}

impl SavingsGoal {
    pub fn is_achieved(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Display progress, capped at 100%.
    pub fn progress(&self) -> Percentage {
        progress(self.current_amount, self.target_amount)
    }
}
