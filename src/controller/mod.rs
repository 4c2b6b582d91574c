//! Feed controller
//!
//! Runs the pagination core on a single task. The presentation layer talks
//! to it through a [`FeedHandle`]: lifecycle calls are fire-and-forget
//! commands, and state is observed through the published [`FeedView`].
//!
//! # Overview
//!
//! - Commands arrive over an unbounded channel and are applied in order
//! - Fetches run concurrently with command handling but are polled on the
//!   same task, so [`FeedState`] is never shared
//! - Every state change publishes a fresh view on a watch channel
//! - Responses superseded by a refresh are discarded by the core

use crate::error::FetchError;
use crate::fetcher::ListingFetcher;
use crate::pagination::{FeedState, FeedView, FetchRequest};
use crate::types::{FilterParams, Page};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Lifecycle command sent by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    LoadInitial,
    LoadMore,
    Refresh,
    Retry,
    Shutdown,
}

/// View plus the number of commands applied before it was built
#[derive(Debug, Clone, Default)]
struct Published {
    commands_applied: u64,
    view: FeedView,
}

type InFlight = BoxFuture<'static, (FetchRequest, Result<Page, FetchError>)>;

/// Owns the feed state and drives fetches
pub struct FeedController<F: ListingFetcher + 'static> {
    fetcher: Arc<F>,
    state: FeedState,
    commands: mpsc::UnboundedReceiver<Command>,
    published: watch::Sender<Published>,
    commands_applied: u64,
}

impl<F: ListingFetcher + 'static> FeedController<F> {
    /// Create a controller and the handle that drives it
    pub fn new(fetcher: Arc<F>, filters: FilterParams) -> (Self, FeedHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let state = FeedState::new(filters);
        let (published_tx, published_rx) = watch::channel(Published {
            commands_applied: 0,
            view: state.view(),
        });

        let controller = Self {
            fetcher,
            state,
            commands: command_rx,
            published: published_tx,
            commands_applied: 0,
        };
        let handle = FeedHandle {
            commands: command_tx,
            published: published_rx,
            commands_sent: 0,
        };
        (controller, handle)
    }

    /// Spawn a controller on the tokio runtime
    pub fn spawn(fetcher: Arc<F>, filters: FilterParams) -> (FeedHandle, JoinHandle<()>) {
        let (controller, handle) = Self::new(fetcher, filters);
        (handle, tokio::spawn(controller.run()))
    }

    /// Run until shut down or every handle is dropped
    pub async fn run(mut self) {
        info!("Feed controller started");
        let mut in_flight: FuturesUnordered<InFlight> = FuturesUnordered::new();

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let command = match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => command,
                    };
                    if let Some(request) = self.apply(command) {
                        in_flight.push(self.start_fetch(request));
                    }
                    self.commands_applied += 1;
                    self.publish();
                }
                Some((request, result)) = in_flight.next(), if !in_flight.is_empty() => {
                    if !self.state.complete(&request, result).is_stale() {
                        self.publish();
                    }
                }
            }
        }

        if !in_flight.is_empty() {
            debug!("Dropping {} outstanding fetches", in_flight.len());
        }
        info!(
            "Feed controller stopped with {} listings",
            self.state.listings().len()
        );
    }

    fn apply(&mut self, command: Command) -> Option<FetchRequest> {
        let request = match command {
            Command::LoadInitial => self.state.load_initial(),
            Command::LoadMore => self.state.load_more(),
            Command::Refresh => self.state.refresh(),
            Command::Retry => self.state.retry(),
            Command::Shutdown => None,
        };
        if request.is_none() {
            debug!("{command:?} ignored in phase {:?}", self.state.phase());
        }
        request
    }

    fn start_fetch(&self, request: FetchRequest) -> InFlight {
        let fetcher = Arc::clone(&self.fetcher);
        async move {
            let result = fetcher.fetch(&request.cursor, &request.filters).await;
            (request, result)
        }
        .boxed()
    }

    fn publish(&self) {
        self.published.send_replace(Published {
            commands_applied: self.commands_applied,
            view: self.state.view(),
        });
    }
}

/// Presentation-side handle to a running [`FeedController`]
///
/// Dropping the handle stops the controller.
#[derive(Debug)]
pub struct FeedHandle {
    commands: mpsc::UnboundedSender<Command>,
    published: watch::Receiver<Published>,
    commands_sent: u64,
}

impl FeedHandle {
    /// Load the first page (screen mounted)
    pub fn load_initial(&mut self) {
        self.send(Command::LoadInitial);
    }

    /// Load the next page (end of list reached)
    pub fn load_more(&mut self) {
        self.send(Command::LoadMore);
    }

    /// Start over from the first page (pull-to-refresh)
    pub fn refresh(&mut self) {
        self.send(Command::Refresh);
    }

    /// Re-issue the failed request
    pub fn retry(&mut self) {
        self.send(Command::Retry);
    }

    /// Stop the controller
    pub fn shutdown(&mut self) {
        self.send(Command::Shutdown);
    }

    /// Latest published view
    pub fn view(&self) -> FeedView {
        self.published.borrow().view.clone()
    }

    /// Wait for the next published view
    ///
    /// Returns `false` once the controller has stopped.
    pub async fn changed(&mut self) -> bool {
        self.published.changed().await.is_ok()
    }

    /// Wait until every command sent so far has been applied
    ///
    /// Fetches started by those commands may still be in flight.
    pub async fn flush(&mut self) -> FeedView {
        let sent = self.commands_sent;
        let applied = self
            .published
            .wait_for(|p| p.commands_applied >= sent)
            .await
            .map(|published| published.view.clone());
        applied.unwrap_or_else(|_| self.view())
    }

    /// Wait until every command sent so far has been applied and no fetch
    /// is in flight
    pub async fn wait_until_settled(&mut self) -> FeedView {
        let sent = self.commands_sent;
        let settled = self
            .published
            .wait_for(|p| p.commands_applied >= sent && !p.view.is_loading())
            .await
            .map(|published| published.view.clone());
        settled.unwrap_or_else(|_| self.view())
    }

    /// Whether the controller is still running
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    fn send(&mut self, command: Command) {
        if self.commands.send(command).is_ok() {
            self.commands_sent += 1;
        } else {
            debug!("{command:?} dropped, controller stopped");
        }
    }
}

#[cfg(test)]
mod tests;
