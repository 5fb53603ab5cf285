/// How long a notice stays on screen, in seconds
pub const NOTICE_LIFETIME_SECS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Destructive,
}

/// A short-lived message for the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
    /// Time the notice was raised, on the UI clock
    pub raised_at: f64,
}

impl Notice {
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.raised_at >= NOTICE_LIFETIME_SECS
    }
}

/// Notices currently on screen, oldest first
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn push(&mut self, kind: NoticeKind, title: &str, description: &str, now: f64) {
        log::debug!("Notice: {} - {}", title, description);
        self.notices.push(Notice {
            kind,
            title: title.to_owned(),
            description: description.to_owned(),
            raised_at: now,
        });
    }

    /// Drop expired notices
    pub fn prune(&mut self, now: f64) {
        self.notices.retain(|notice| !notice.is_expired(now));
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
