use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::amount_formatter::*;
use crate::database::models::*;
use crate::database::*;
use crate::errors::*;
use crate::notifications::*;
use crate::progress::*;
use crate::types::*;
use crate::utilities::*;

/// Runs goal operations for one user against a store, emitting milestone
/// notifications on the given channel.
pub struct GoalTracker<'a, S: GoalStore> {
    store: &'a S,
    notifications: &'a NotificationSender,
    user_id: &'a UserId,
    formatter: &'a AmountFormatter<'a>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// The goal is not among the user's goals; nothing was done.
    NotFound,
    Updated {
        milestone: Option<Milestone>,
        deposit: DepositOutcome,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DepositOutcome {
    NotRequired,
    Recorded(Amount),
    /// The amount change stands but its ledger entry could not be written.
    Dropped(Amount),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeleteOutcome {
    /// `None` if deleting the deposits failed and some may be left behind.
    pub deposits_deleted: Option<usize>,
}

impl<'a, S: GoalStore> GoalTracker<'a, S> {
    pub fn new(
        store: &'a S,
        notifications: &'a NotificationSender,
        user_id: &'a UserId,
        formatter: &'a AmountFormatter<'a>,
    ) -> GoalTracker<'a, S> {
        GoalTracker {
            store,
            notifications,
            user_id,
            formatter,
        }
    }

    pub fn list_goals(&self) -> Result<Vec<SavingsGoal>> {
        self.store.load_goals(self.user_id)
    }

    pub fn list_deposits(&self, goal_id: GoalId) -> Result<Vec<Deposit>> {
        self.store.load_deposits(self.user_id, goal_id)
    }

    pub fn create_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        let name = new_goal.name.trim().to_string();
        if name.is_empty() {
            bail!(ErrorKind::InvalidGoal("name may not be empty".to_string()));
        }
        if !new_goal.target_amount.is_positive() {
            bail!(ErrorKind::InvalidGoal(
                "target amount must be greater than zero".to_string()
            ));
        }
        let goal = self.store.create_goal(
            self.user_id,
            &NewSavingsGoal {
                name,
                ..new_goal
            },
        )?;
        info!("Created savings goal {} ({})", goal.id, goal.name);
        Ok(goal)
    }

    /// Sets the goal's saved total to `new_amount`, dated today.
    pub fn update_amount(&self, goal_id: GoalId, new_amount: Amount) -> Result<UpdateOutcome> {
        self.update_amount_on(goal_id, new_amount, today_local_date())
    }

    pub fn update_amount_on(
        &self,
        goal_id: GoalId,
        new_amount: Amount,
        today: NaiveDate,
    ) -> Result<UpdateOutcome> {
        let opt_goal = self
            .store
            .load_goals(self.user_id)?
            .into_iter()
            .find(|goal| goal.id == goal_id);
        match opt_goal {
            Some(goal) => self.apply_update(&goal, new_amount, today),
            None => {
                debug!(
                    "Savings goal {} not found for user {}; ignoring update",
                    goal_id, self.user_id
                );
                Ok(UpdateOutcome::NotFound)
            }
        }
    }

    /// Applies an update to an already loaded goal snapshot.
    pub fn apply_update(
        &self,
        goal: &SavingsGoal,
        new_amount: Amount,
        today: NaiveDate,
    ) -> Result<UpdateOutcome> {
        let plan = plan_update(goal, new_amount, today, self.formatter)?;
        debug!("Update plan for savings goal {}: {:#?}", goal.id, &plan);
        let mut deposit = DepositOutcome::NotRequired;
        for effect in &plan.effects {
            match (effect.policy(), self.perform(effect)) {
                (_, Ok(())) => {
                    if let SideEffect::InsertDeposit(new_deposit) = effect {
                        deposit = DepositOutcome::Recorded(new_deposit.amount);
                    }
                }
                (EffectPolicy::Fatal, Err(err)) => return Err(err),
                (_, Err(err)) => {
                    warn!(
                        "Ignoring failed side effect of savings goal {} update: {}",
                        goal.id, err
                    );
                    if let SideEffect::InsertDeposit(new_deposit) = effect {
                        deposit = DepositOutcome::Dropped(new_deposit.amount);
                    }
                }
            }
        }
        info!(
            "Savings goal {} amount set to {} (change {})",
            goal.id,
            new_amount.to_decimal(),
            plan.delta.to_decimal()
        );
        Ok(UpdateOutcome::Updated {
            milestone: plan.milestone,
            deposit,
        })
    }

    /// Deletes the goal's deposits, then the goal. Only the goal delete can
    /// fail the operation.
    pub fn delete_goal(&self, goal_id: GoalId) -> Result<DeleteOutcome> {
        let deposits_deleted = match self.store.delete_deposits(self.user_id, goal_id) {
            Ok(count) => Some(count),
            Err(err) => {
                warn!(
                    "Failed to delete deposits of savings goal {}; continuing: {}",
                    goal_id, err
                );
                None
            }
        };
        self.store.delete_goal(self.user_id, goal_id)?;
        info!("Deleted savings goal {}", goal_id);
        Ok(DeleteOutcome { deposits_deleted })
    }

    fn perform(&self, effect: &SideEffect) -> Result<()> {
        match effect {
            SideEffect::PersistGoalAmount { goal_id, amount } => {
                self.store.set_goal_amount(self.user_id, *goal_id, *amount)
            }
            SideEffect::Notify(notification) => {
                self.notifications.send(notification.clone());
                Ok(())
            }
            SideEffect::InsertDeposit(new_deposit) => self.store.insert_deposit(new_deposit),
        }
    }
}
