//! Pagination module
//!
//! The sans-IO core of the feed: an explicit phase machine that decides when
//! a fetch is warranted, merges fetched pages into a duplicate-free
//! collection and derives the next cursor.
//!
//! # Overview
//!
//! [`FeedState`] never performs I/O. Each lifecycle call (`load_initial`,
//! `load_more`, `refresh`, `retry`) either returns a [`FetchRequest`] the
//! caller must execute, or `None` when the call is a no-op. The caller hands
//! the outcome back through [`FeedState::complete`], which discards
//! completions that belong to a superseded generation.
//!
//! ```text
//!            load_initial            ok / empty page
//!   Idle ───────────────▶ LoadingInitial ──────────▶ Idle
//!    │  ▲                      │ err
//!    │  │ ok                   ▼
//!    │  └──── LoadingMore ◀── Error ──retry──▶ LoadingInitial / LoadingMore
//!    └──load_more──┘   │ err    ▲
//!                      └────────┘
//!   any phase but Refreshing ──refresh──▶ Refreshing ──ok──▶ Idle
//! ```

mod merge;
mod state;
mod types;

pub use merge::Collection;
pub use state::FeedState;
pub use types::{Completion, FeedView, FetchKind, FetchRequest, MergeOutcome, Phase};
