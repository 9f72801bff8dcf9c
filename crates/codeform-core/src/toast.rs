//! Transient notices ("toasts") with TTL and dedupe.

use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a notice stays visible unless configured otherwise.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(3000);

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Confirmation of a user action.
    Success,
    /// Validation, upstream or transport failure.
    Error,
}

/// Identifier for a notice entry.
pub type NoticeId = u64;

#[derive(Debug, Clone)]
struct Notice {
    id: NoticeId,
    kind: NoticeKind,
    message: String,
    ttl: Duration,
    created: Instant,
}

/// Rendering-friendly view of a notice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeView {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub message: String,
    /// 1.0 -> just created, 0.0 -> expired.
    pub progress: f32,
}

/// In-memory notice queue.
#[derive(Debug, Clone)]
pub struct Toaster {
    queue: VecDeque<Notice>,
    max: usize,
    ttl: Duration,
    dedupe_window: Duration,
    next_id: NoticeId,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(8, DEFAULT_NOTICE_TTL)
    }
}

impl Toaster {
    /// Create a queue holding at most `max` notices, each living for `ttl`.
    pub fn new(max: usize, ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            ttl,
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a notice. An identical notice pushed within the dedupe window is refreshed
    /// and moved to the back instead of duplicated.
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) -> NoticeId {
        let message = message.into();

        let duplicate = self.queue.iter().position(|n| {
            n.kind == kind
                && n.message == message
                && now.saturating_duration_since(n.created) <= self.dedupe_window
        });
        if let Some(mut existing) = duplicate.and_then(|i| self.queue.remove(i)) {
            existing.created = now;
            let id = existing.id;
            self.queue.push_back(existing);
            return id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            id,
            kind,
            message,
            ttl: self.ttl,
            created: now,
        });
        id
    }

    /// Drop expired notices.
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue
            .retain(|n| now.saturating_duration_since(n.created) < n.ttl);
    }

    /// Notices still alive at `now`, oldest first.
    pub fn visible(&self, now: Instant) -> Vec<NoticeView> {
        self.queue
            .iter()
            .filter(|n| now.saturating_duration_since(n.created) < n.ttl)
            .map(|n| {
                let age = now.saturating_duration_since(n.created).as_secs_f32();
                let ttl = n.ttl.as_secs_f32().max(f32::EPSILON);
                NoticeView {
                    id: n.id,
                    kind: n.kind,
                    message: n.message.clone(),
                    progress: (1.0 - age / ttl).clamp(0.0, 1.0),
                }
            })
            .collect()
    }

    /// Most recently pushed notice, expired or not.
    pub fn last(&self) -> Option<(NoticeKind, &str)> {
        self.queue.back().map(|n| (n.kind, n.message.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
