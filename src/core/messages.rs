//! Message Center
//!
//! The visible set of stakeholder messages awaiting the trainee. Messages
//! leave the set when responded to, dismissed, or auto-dismissed once their
//! 120-second window lapses untouched. Starting a reply cancels the window.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::core::events::{MessageStatus, StakeholderMessage};

/// Untouched messages disappear this long after arrival.
pub const AUTO_DISMISS_SECS: i64 = 120;

#[derive(Debug, Default)]
pub struct MessageCenter {
    messages: Vec<StakeholderMessage>,
}

impl MessageCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the visible set, arming its auto-dismiss window.
    pub fn deliver(&mut self, mut message: StakeholderMessage, now: DateTime<Utc>) -> Uuid {
        message.dismiss_at = Some(now + Duration::seconds(AUTO_DISMISS_SECS));
        let id = message.id;
        self.messages.push(message);
        id
    }

    pub fn visible(&self) -> &[StakeholderMessage] {
        &self.messages
    }

    pub fn get(&self, id: Uuid) -> Option<&StakeholderMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn mark_read(&mut self, id: Uuid) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            if message.status == MessageStatus::Unread {
                message.status = MessageStatus::Read;
            }
        }
    }

    /// The trainee opened a reply editor: disarm the auto-dismiss so the
    /// message cannot vanish mid-composition.
    pub fn begin_reply(&mut self, id: Uuid) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.dismiss_at = None;
            if message.status == MessageStatus::Unread {
                message.status = MessageStatus::Read;
            }
        }
    }

    /// Remove a message as responded; returns it for interaction recording.
    pub fn respond(&mut self, id: Uuid) -> Option<StakeholderMessage> {
        let pos = self.messages.iter().position(|m| m.id == id)?;
        let mut message = self.messages.remove(pos);
        message.status = MessageStatus::Responded;
        Some(message)
    }

    /// Remove a message as explicitly dismissed; returns it so the caller
    /// can record the declined interaction.
    pub fn dismiss(&mut self, id: Uuid) -> Option<StakeholderMessage> {
        let pos = self.messages.iter().position(|m| m.id == id)?;
        let mut message = self.messages.remove(pos);
        message.status = MessageStatus::Dismissed;
        Some(message)
    }

    /// Drop every message whose auto-dismiss deadline has passed. Returns
    /// the removed messages, newest last.
    pub fn flush_expired(&mut self, now: DateTime<Utc>) -> Vec<StakeholderMessage> {
        let mut expired = Vec::new();
        self.messages.retain_mut(|message| {
            match message.dismiss_at {
                Some(deadline) if deadline <= now => {
                    message.status = MessageStatus::Dismissed;
                    expired.push(message.clone());
                    false
                }
                _ => true,
            }
        });
        expired
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
