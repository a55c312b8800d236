use log::debug;
use std::fmt;
use std::sync::mpsc;

use crate::types::*;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NotificationCategory {
    GoalAchieved,
    Progress,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub category: NotificationCategory,
    pub title: String,
    pub body: String,
}

/// Sending half of the notification channel. Sending never fails from the
/// caller's point of view: if nobody is listening the message is dropped.
#[derive(Clone, Debug)]
pub struct NotificationSender {
    sender: mpsc::Sender<Notification>,
}

#[derive(Debug)]
pub struct NotificationInbox {
    receiver: mpsc::Receiver<Notification>,
}

pub fn notification_channel() -> (NotificationSender, NotificationInbox) {
    let (sender, receiver) = mpsc::channel();
    (
        NotificationSender { sender },
        NotificationInbox { receiver },
    )
}

impl NotificationCategory {
    pub fn tag(self) -> &'static str {
        match self {
            NotificationCategory::GoalAchieved => "goal-achieved",
            NotificationCategory::Progress => "goal-progress",
        }
    }
}

impl Notification {
    /// `target_amount` is shown as given, so pass it through the user's
    /// `AmountFormatter`.
    pub fn goal_achieved(goal_name: &str, target_amount: &str) -> Notification {
        Notification {
            category: NotificationCategory::GoalAchieved,
            title: "Goal achieved!".to_string(),
            body: format!(
                "Congratulations! You reached your goal \"{}\" of {}.",
                goal_name, target_amount
            ),
        }
    }

    pub fn progress(goal_name: &str, percentage: Percentage) -> Notification {
        Notification {
            category: NotificationCategory::Progress,
            title: "Savings milestone".to_string(),
            body: format!(
                "You are {} of the way to \"{}\". Keep going!",
                percentage, goal_name
            ),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.category.tag(), self.title, self.body)
    }
}

impl NotificationSender {
    pub fn send(&self, notification: Notification) {
        if let Err(mpsc::SendError(dropped)) = self.sender.send(notification) {
            debug!("No notification receiver; dropped: {}", dropped);
        }
    }
}

impl NotificationInbox {
    /// Takes every notification sent so far without blocking.
    pub fn drain(&self) -> Vec<Notification> {
        self.receiver.try_iter().collect()
    }
}
