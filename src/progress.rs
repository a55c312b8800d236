use chrono::NaiveDate;

use crate::amount_formatter::*;
use crate::constants::*;
use crate::database::models::*;
use crate::errors::*;
use crate::notifications::*;
use crate::types::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Milestone {
    GoalAchieved,
    Progress,
}

/// How the executor treats a failure of one side effect.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EffectPolicy {
    /// Abort the operation; later effects do not run.
    Fatal,
    /// Log and continue; the earlier committed effects stand.
    BestEffort,
    /// Emit and never look back.
    FireAndForget,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SideEffect {
    PersistGoalAmount { goal_id: GoalId, amount: Amount },
    Notify(Notification),
    InsertDeposit(NewDeposit),
}

/// Everything an amount update should do, in execution order.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatePlan {
    pub next_goal: SavingsGoal,
    /// Signed difference between the new and old totals.
    pub delta: Amount,
    pub milestone: Option<Milestone>,
    pub effects: Vec<SideEffect>,
}

impl SideEffect {
    pub fn policy(&self) -> EffectPolicy {
        match self {
            SideEffect::PersistGoalAmount { .. } => EffectPolicy::Fatal,
            SideEffect::Notify(_) => EffectPolicy::FireAndForget,
            SideEffect::InsertDeposit(_) => EffectPolicy::BestEffort,
        }
    }
}

/// Display progress: `current / target * 100`, capped at 100.
pub fn progress(current: Amount, target: Amount) -> Percentage {
    current.percentage_of(target).clamped()
}

/// Which milestone, if any, an update from `old_amount` to `new_amount` crosses.
/// Achieving the goal takes priority over the progress milestone.
pub fn detect_milestone(
    old_amount: Amount,
    new_amount: Amount,
    target_amount: Amount,
) -> Option<Milestone> {
    if new_amount >= target_amount && old_amount < target_amount {
        return Some(Milestone::GoalAchieved);
    }
    let threshold = Percentage::from_whole(PROGRESS_MILESTONE_PERCENT);
    if new_amount.percentage_of(target_amount) >= threshold
        && old_amount.percentage_of(target_amount) < threshold
    {
        Some(Milestone::Progress)
    } else {
        None
    }
}

/// Decides the side effects of setting `goal`'s saved total to `new_amount`.
/// Nothing is written; the caller runs `effects` in order.
pub fn plan_update(
    goal: &SavingsGoal,
    new_amount: Amount,
    today: NaiveDate,
    formatter: &AmountFormatter,
) -> Result<UpdatePlan> {
    ensure!(
        !new_amount.is_negative(),
        format!("Saved amount may not be negative: {}", new_amount.to_decimal())
    );
    let old_amount = goal.current_amount;
    if goal.is_achieved() && new_amount > old_amount {
        bail!(ErrorKind::GoalAlreadyAchieved(goal.name.clone()));
    }
    let delta = new_amount - old_amount;

    let mut effects = vec![SideEffect::PersistGoalAmount {
        goal_id: goal.id,
        amount: new_amount,
    }];

    let milestone = detect_milestone(old_amount, new_amount, goal.target_amount);
    match milestone {
        Some(Milestone::GoalAchieved) => effects.push(SideEffect::Notify(
            Notification::goal_achieved(
                &goal.name,
                &formatter.format_amount(goal.target_amount),
            ),
        )),
        Some(Milestone::Progress) => effects.push(SideEffect::Notify(Notification::progress(
            &goal.name,
            new_amount.percentage_of(goal.target_amount),
        ))),
        None => {}
    }

    if delta.is_positive() {
        effects.push(SideEffect::InsertDeposit(NewDeposit {
            user_id: goal.user_id.clone(),
            goal_id: goal.id,
            amount: delta,
            deposit_date: today,
        }));
    }

    Ok(UpdatePlan {
        next_goal: SavingsGoal {
            current_amount: new_amount,
            ..goal.clone()
        },
        delta,
        milestone,
        effects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(whole: i64) -> Amount {
        Amount::from_scaled_i64(whole * 100)
    }

    fn goal(current: i64, target: i64) -> SavingsGoal {
        SavingsGoal {
            id: GoalId(7),
            user_id: UserId::new("alice"),
            name: "Emergency fund".to_string(),
            target_amount: amount(target),
            current_amount: amount(current),
            deadline: None,
            description: None,
            created_at: 1_700_000_000,
        }
    }

    fn plan_for(goal: &SavingsGoal, new_amount: Amount) -> Result<UpdatePlan> {
        let format = CurrencyFormat::with_symbol("$");
        plan_update(
            goal,
            new_amount,
            NaiveDate::from_ymd(2026, 10, 18),
            &AmountFormatter::new(&format),
        )
    }

    fn notifications(plan: &UpdatePlan) -> Vec<&Notification> {
        plan.effects
            .iter()
            .filter_map(|effect| match effect {
                SideEffect::Notify(notification) => Some(notification),
                _ => None,
            })
            .collect()
    }

    fn deposits(plan: &UpdatePlan) -> Vec<&NewDeposit> {
        plan.effects
            .iter()
            .filter_map(|effect| match effect {
                SideEffect::InsertDeposit(deposit) => Some(deposit),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(progress(amount(600), amount(1000)), Percentage::from_whole(60));
        assert_eq!(progress(amount(1200), amount(1000)), Percentage::complete());
        assert_eq!(progress(amount(0), amount(1000)), Percentage::from_whole(0));
    }

    #[test]
    fn test_detect_milestone() {
        let target = amount(1000);
        assert_eq!(detect_milestone(amount(0), amount(600), target), None);
        assert_eq!(
            detect_milestone(amount(600), amount(800), target),
            Some(Milestone::Progress)
        );
        assert_eq!(
            detect_milestone(amount(600), amount(750), target),
            Some(Milestone::Progress)
        );
        assert_eq!(detect_milestone(amount(750), amount(900), target), None);
        assert_eq!(
            detect_milestone(amount(800), amount(1000), target),
            Some(Milestone::GoalAchieved)
        );
        assert_eq!(
            detect_milestone(amount(0), amount(1500), target),
            Some(Milestone::GoalAchieved)
        );
        assert_eq!(detect_milestone(amount(1000), amount(700), target), None);
        assert_eq!(detect_milestone(amount(800), amount(600), target), None);
    }

    #[test]
    fn test_no_tier_between_progress_and_achieved() {
        assert_eq!(detect_milestone(amount(800), amount(950), amount(1000)), None);
    }

    #[test]
    fn test_plan_orders_effects() {
        let plan = plan_for(&goal(600, 1000), amount(800)).unwrap();
        assert_eq!(plan.delta, amount(200));
        assert_eq!(plan.milestone, Some(Milestone::Progress));
        assert_eq!(plan.next_goal.current_amount, amount(800));
        assert_eq!(
            plan.effects
                .iter()
                .map(SideEffect::policy)
                .collect::<Vec<_>>(),
            vec![
                EffectPolicy::Fatal,
                EffectPolicy::FireAndForget,
                EffectPolicy::BestEffort
            ]
        );
        assert_eq!(
            plan.effects[0],
            SideEffect::PersistGoalAmount {
                goal_id: GoalId(7),
                amount: amount(800)
            }
        );
        assert_eq!(
            deposits(&plan),
            vec![&NewDeposit {
                user_id: UserId::new("alice"),
                goal_id: GoalId(7),
                amount: amount(200),
                deposit_date: NaiveDate::from_ymd(2026, 10, 18),
            }]
        );
        assert_eq!(
            notifications(&plan)[0].body,
            "You are 80% of the way to \"Emergency fund\". Keep going!"
        );
    }

    #[test]
    fn test_plan_achieved_beats_progress() {
        let plan = plan_for(&goal(100, 1000), amount(1000)).unwrap();
        assert_eq!(plan.milestone, Some(Milestone::GoalAchieved));
        let sent = notifications(&plan);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].category, NotificationCategory::GoalAchieved);
        assert_eq!(
            sent[0].body,
            "Congratulations! You reached your goal \"Emergency fund\" of $1,000.00."
        );
        assert_eq!(deposits(&plan)[0].amount, amount(900));
    }

    #[test]
    fn test_plan_rejects_increase_of_achieved_goal() {
        match plan_for(&goal(1000, 1000), amount(1200)) {
            Err(Error(ErrorKind::GoalAlreadyAchieved(name), _)) => {
                assert_eq!(name, "Emergency fund")
            }
            other => panic!("Expected GoalAlreadyAchieved, got {:?}", other),
        }
        assert!(plan_for(&goal(1100, 1000), amount(1101)).is_err());
    }

    #[test]
    fn test_plan_allows_decrease_of_achieved_goal() {
        let plan = plan_for(&goal(1000, 1000), amount(700)).unwrap();
        assert_eq!(plan.delta, amount(-300));
        assert_eq!(plan.milestone, None);
        assert_eq!(plan.effects.len(), 1);
    }

    #[test]
    fn test_plan_decrease_has_no_deposit_or_notification() {
        let plan = plan_for(&goal(600, 1000), amount(400)).unwrap();
        assert!(deposits(&plan).is_empty());
        assert!(notifications(&plan).is_empty());
        assert_eq!(plan.next_goal.current_amount, amount(400));
    }

    #[test]
    fn test_plan_same_amount_is_idempotent() {
        let plan = plan_for(&goal(800, 1000), amount(800)).unwrap();
        assert!(plan.delta.is_zero());
        assert_eq!(plan.milestone, None);
        assert_eq!(
            plan.effects,
            vec![SideEffect::PersistGoalAmount {
                goal_id: GoalId(7),
                amount: amount(800)
            }]
        );
    }

    #[test]
    fn test_plan_rejects_negative_amount() {
        assert!(plan_for(&goal(600, 1000), amount(-1)).is_err());
    }
}
