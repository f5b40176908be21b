//! Pure pager state machine: one user paging through pre-split results.

use thiserror::Error;
use tokio::time::Instant;

use crate::split::MAX_MESSAGE_LENGTH;

/// Composite identity of a pager session.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SessionKey {
    /// Interaction that opened the session.
    pub interaction_id: u64,
    /// User that owns the session.
    pub user_id: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PagerState {
    Awaiting,
    Showing(usize),
    Expired,
}

/// Button actions a session reacts to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PagerAction {
    More,
    Share,
}

/// Which controls accompany a rendered page.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PagerControls {
    pub share: bool,
    pub more: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PagerOutcome {
    /// Render `content` as page `index` (0-based) of `total`.
    Page {
        index: usize,
        total: usize,
        content: String,
        controls: PagerControls,
    },
    /// Post these messages to the originating channel.
    Share { messages: Vec<String> },
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PagerRejection {
    #[error("session belongs to another user")]
    WrongUser,
    #[error("session expired")]
    Expired,
    #[error("session has not started")]
    NotStarted,
    #[error("already on the last page")]
    LastPage,
}

#[derive(Debug)]
pub struct PagerSession {
    key: SessionKey,
    command: String,
    query: String,
    pages: Vec<String>,
    state: PagerState,
    deadline: Instant,
    surfaces: Vec<String>,
}

impl PagerSession {
    /// A session in `Awaiting`. An empty page list is treated as one blank page.
    pub fn new(
        key: SessionKey,
        command: impl Into<String>,
        query: impl Into<String>,
        mut pages: Vec<String>,
        deadline: Instant,
    ) -> Self {
        if pages.is_empty() {
            pages.push(String::new());
        }

        Self {
            key,
            command: command.into(),
            query: query.into(),
            pages,
            state: PagerState::Awaiting,
            deadline,
            surfaces: Vec::new(),
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Tokens of follow-up replies that carry this session's controls.
    pub fn surfaces(&self) -> &[String] {
        &self.surfaces
    }

    pub fn add_surface(&mut self, token: impl Into<String>) {
        self.surfaces.push(token.into());
    }

    /// Move from `Awaiting` to the first page.
    pub fn start(&mut self) -> Result<PagerOutcome, PagerRejection> {
        match self.state {
            PagerState::Awaiting => {
                self.state = PagerState::Showing(0);
                Ok(self.render(0))
            }
            PagerState::Showing(index) => Ok(self.render(index)),
            PagerState::Expired => Err(PagerRejection::Expired),
        }
    }

    /// Apply a button action from `actor` at `now`.
    ///
    /// Non-owners never change state. Once the deadline passes the session
    /// is `Expired` and rejects everything.
    pub fn apply(
        &mut self,
        actor: u64,
        action: PagerAction,
        now: Instant,
    ) -> Result<PagerOutcome, PagerRejection> {
        if actor != self.key.user_id {
            return Err(PagerRejection::WrongUser);
        }

        if now >= self.deadline {
            self.state = PagerState::Expired;
        }

        let index = match self.state {
            PagerState::Awaiting => return Err(PagerRejection::NotStarted),
            PagerState::Expired => return Err(PagerRejection::Expired),
            PagerState::Showing(index) => index,
        };

        match action {
            PagerAction::More => {
                let next = index + 1;
                if next >= self.pages.len() {
                    return Err(PagerRejection::LastPage);
                }
                self.state = PagerState::Showing(next);
                Ok(self.render(next))
            }
            PagerAction::Share => Ok(PagerOutcome::Share {
                messages: self.share_messages(actor, index),
            }),
        }
    }

    /// Terminal transition. Returns the static content the original reply
    /// should be left showing.
    pub fn expire(&mut self) -> String {
        self.state = PagerState::Expired;
        self.pages[0].clone()
    }

    fn render(&self, index: usize) -> PagerOutcome {
        PagerOutcome::Page {
            index,
            total: self.pages.len(),
            content: self.pages[index].clone(),
            controls: PagerControls {
                share: true,
                more: index + 1 < self.pages.len(),
            },
        }
    }

    fn share_messages(&self, actor: u64, index: usize) -> Vec<String> {
        let header = format!("<@{actor}> used `/{} {}`:", self.command, self.query);
        let page = &self.pages[index];
        let combined = format!("{header}\n{page}");

        if combined.chars().count() <= MAX_MESSAGE_LENGTH {
            vec![combined]
        } else {
            vec![header, page.clone()]
        }
    }
}
