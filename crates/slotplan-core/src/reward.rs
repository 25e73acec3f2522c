//! Gamified feedback for task progress.
//!
//! The tracker consumes [`Event::ProgressUpdated`] events drained from the
//! task store. It is independent of the scheduler: rewards never influence
//! allocation, and allocation never produces rewards.

use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Points granted the first time a task reaches 100%.
pub const COMPLETION_POINTS: u32 = 10;

/// Which encouragement band a progress value falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Completed,
    AlmostDone,
    Halfway,
    Started,
    NotStarted,
}

impl RewardKind {
    fn classify(old_progress: u8, new_progress: u8) -> Self {
        if new_progress == 100 && old_progress < 100 {
            RewardKind::Completed
        } else if new_progress >= 80 {
            RewardKind::AlmostDone
        } else if new_progress >= 50 {
            RewardKind::Halfway
        } else if new_progress > 0 {
            RewardKind::Started
        } else {
            RewardKind::NotStarted
        }
    }

    pub fn message(&self) -> String {
        match self {
            RewardKind::Completed => {
                format!("Congratulations, task complete! +{COMPLETION_POINTS} points!")
            }
            RewardKind::AlmostDone => "Amazing! You're almost there!".to_string(),
            RewardKind::Halfway => "Halfway done, great pace!".to_string(),
            RewardKind::Started => "You've started. Keep it going!".to_string(),
            RewardKind::NotStarted => "Not started yet. Take the first step!".to_string(),
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            RewardKind::Completed => COMPLETION_POINTS,
            _ => 0,
        }
    }
}

/// Feedback produced for one progress transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub task_id: String,
    pub kind: RewardKind,
    pub points_awarded: u32,
    pub message: String,
}

/// Running point total and the latest message shown to the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardTracker {
    points: u32,
    last_message: Option<String>,
}

impl RewardTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// React to one store event. Only progress updates produce a reward.
    pub fn observe(&mut self, event: &Event) -> Option<Reward> {
        let Event::ProgressUpdated {
            task_id,
            old_progress,
            new_progress,
            ..
        } = event
        else {
            return None;
        };

        let kind = RewardKind::classify(*old_progress, *new_progress);
        let reward = Reward {
            task_id: task_id.clone(),
            kind,
            points_awarded: kind.points(),
            message: kind.message(),
        };

        self.points += reward.points_awarded;
        self.last_message = Some(reward.message.clone());
        tracing::debug!(
            task_id = %task_id,
            ?kind,
            points = self.points,
            "progress reward"
        );
        Some(reward)
    }

    /// Observe a batch of drained events in order.
    pub fn observe_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> Vec<Reward> {
        events.into_iter().filter_map(|e| self.observe(e)).collect()
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn progress(old: u8, new: u8) -> Event {
        Event::ProgressUpdated {
            task_id: "t".to_string(),
            old_progress: old,
            new_progress: new,
            at: Utc::now(),
        }
    }

    #[test]
    fn completion_awards_points_once() {
        let mut tracker = RewardTracker::new();
        let reward = tracker.observe(&progress(40, 100)).unwrap();
        assert_eq!(reward.kind, RewardKind::Completed);
        assert_eq!(reward.points_awarded, COMPLETION_POINTS);
        assert_eq!(tracker.points(), COMPLETION_POINTS);

        // Already complete: re-reporting 100 is just "almost done" feedback.
        let again = tracker.observe(&progress(100, 100)).unwrap();
        assert_eq!(again.kind, RewardKind::AlmostDone);
        assert_eq!(tracker.points(), COMPLETION_POINTS);
    }

    #[test]
    fn bands_follow_new_progress() {
        assert_eq!(RewardKind::classify(0, 85), RewardKind::AlmostDone);
        assert_eq!(RewardKind::classify(0, 80), RewardKind::AlmostDone);
        assert_eq!(RewardKind::classify(0, 50), RewardKind::Halfway);
        assert_eq!(RewardKind::classify(0, 1), RewardKind::Started);
        assert_eq!(RewardKind::classify(30, 0), RewardKind::NotStarted);
    }

    #[test]
    fn other_events_are_ignored() {
        let mut tracker = RewardTracker::new();
        let added = Event::TaskAdded {
            task_id: "t".to_string(),
            at: Utc::now(),
        };
        assert!(tracker.observe(&added).is_none());
        assert!(tracker.last_message().is_none());
    }

    #[test]
    fn observe_all_accumulates() {
        let mut tracker = RewardTracker::new();
        let events = vec![progress(0, 50), progress(50, 100), progress(0, 100)];
        let rewards = tracker.observe_all(&events);
        assert_eq!(rewards.len(), 3);
        assert_eq!(tracker.points(), 2 * COMPLETION_POINTS);
        assert_eq!(tracker.last_message(), Some(RewardKind::Completed.message().as_str()));
    }
}
