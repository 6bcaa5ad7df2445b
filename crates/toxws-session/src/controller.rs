//! Interactive session: user lines in, daemon calls and transcript out.
//!
//! Lines starting with the command prefix are parsed by the [`Commander`];
//! anything else is chat text for the active friend, if one is selected with
//! `chat`. Replies are shown by a single background task that awaits them in
//! the order the requests were sent, so the session keeps taking input while
//! calls are in flight and the transcript never shows replies out of order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use toxws_client::{CorrelationClient, PendingResponse, SubscriptionId};
use toxws_core::{FriendNumber, MessageKind};
use toxws_settings::SessionSettings;

use crate::commander::{Action, Commander};
use crate::display::DisplaySink;

/// Prefix for an echoed outgoing chat line.
pub const OUTGOING_PREFIX: &str = "> ";

/// Prefix for the daemon's reply to a chat line.
pub const REPLY_PREFIX: &str = "< ";

/// Session behaviour knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    /// Marks a line as a command.
    pub command_prefix: char,
    /// Echo chat lines before sending them.
    pub echo_outgoing: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&SessionSettings::default())
    }
}

impl From<&SessionSettings> for SessionOptions {
    fn from(settings: &SessionSettings) -> Self {
        Self {
            command_prefix: settings.command_prefix,
            echo_outgoing: settings.echo_outgoing,
        }
    }
}

/// A reply waiting its turn to be shown.
struct QueuedReply {
    pending: PendingResponse,
    prefix: &'static str,
}

/// Drives the daemon from user input and writes the transcript.
pub struct SessionController {
    client: Arc<CorrelationClient>,
    commander: Commander,
    display: Arc<dyn DisplaySink>,
    options: SessionOptions,
    active_friend: Option<FriendNumber>,
    replies: mpsc::UnboundedSender<QueuedReply>,
    printer: JoinHandle<()>,
}

impl SessionController {
    /// Create a session with default options and no active friend.
    ///
    /// Must be called from within a `tokio` runtime.
    pub fn new(client: Arc<CorrelationClient>, display: Arc<dyn DisplaySink>) -> Self {
        Self::with_options(client, display, SessionOptions::default())
    }

    /// Create a session with explicit options.
    pub fn with_options(
        client: Arc<CorrelationClient>,
        display: Arc<dyn DisplaySink>,
        options: SessionOptions,
    ) -> Self {
        let (replies, queue) = mpsc::unbounded_channel();
        let printer = tokio::spawn(show_replies(queue, Arc::clone(&display)));
        Self {
            client,
            commander: Commander::new(),
            display,
            options,
            active_friend: None,
            replies,
            printer,
        }
    }

    /// Friend that chat text currently goes to.
    pub fn active_friend(&self) -> Option<FriendNumber> {
        self.active_friend
    }

    /// Show every daemon notification in the transcript, whatever the
    /// active friend.
    pub fn forward_notifications(&self) -> SubscriptionId {
        let display = Arc::clone(&self.display);
        self.client
            .on_notification(move |notification| display.display(&notification.to_json()))
    }

    /// Handle one submitted line. Returns whether a request was sent.
    pub fn handle_user_line(&mut self, line: &str) -> bool {
        if let Some(command) = line.strip_prefix(self.options.command_prefix) {
            return self.run_command(command);
        }

        let Some(friend) = self.active_friend else {
            debug!("no active friend, discarding chat line");
            return false;
        };
        if self.options.echo_outgoing {
            self.display.display(&format!("{OUTGOING_PREFIX}{line}"));
        }
        let pending = self
            .client
            .send_friend_message(friend, MessageKind::Normal, line);
        self.queue_reply(pending, REPLY_PREFIX);
        true
    }

    /// Run a command line (without the prefix). Returns whether a request
    /// was sent.
    ///
    /// Invalid commands are ignored without feedback.
    pub fn run_command(&mut self, line: &str) -> bool {
        let Some(action) = self.commander.evaluate(line) else {
            debug!(line, "ignoring invalid command");
            return false;
        };

        match action {
            Action::Help => {
                for text in help_lines(self.options.command_prefix) {
                    self.display.display(&text);
                }
                false
            }
            Action::Info { friend } => {
                // The daemon's Info request only describes ourselves.
                if let Some(friend) = friend {
                    debug!(%friend, "friend info not supported by daemon, showing own info");
                }
                self.queue_reply(self.client.info(), "");
                true
            }
            Action::Add { tox_id, message } => {
                let pending = match message {
                    Some(message) => self.client.add_friend(tox_id, message),
                    None => self.client.add_friend_norequest(tox_id),
                };
                self.queue_reply(pending, "");
                true
            }
            Action::Chat { friend } => {
                self.display.display(&format!("Chat with: {friend}"));
                self.active_friend = Some(friend);
                false
            }
        }
    }

    /// Stop taking input and wait until every reply already queued has been
    /// shown, or rejected because the connection closed.
    pub async fn finish(self) {
        let Self {
            replies, printer, ..
        } = self;
        drop(replies);
        if let Err(e) = printer.await {
            warn!(error = %e, "reply task failed");
        }
    }

    fn queue_reply(&self, pending: PendingResponse, prefix: &'static str) {
        if self.replies.send(QueuedReply { pending, prefix }).is_err() {
            warn!("reply task has stopped, reply will not be shown");
        }
    }
}

/// Show replies one at a time, in the order they were queued.
async fn show_replies(
    mut queue: mpsc::UnboundedReceiver<QueuedReply>,
    display: Arc<dyn DisplaySink>,
) {
    while let Some(QueuedReply { pending, prefix }) = queue.recv().await {
        match pending.await {
            Ok(response) => display.display(&format!("{prefix}{}", response.to_json())),
            Err(e) => warn!(error = %e, "request got no response"),
        }
    }
}

/// Usage text, one entry per transcript line.
pub fn help_lines(prefix: char) -> Vec<String> {
    vec![
        "Available commands:".to_string(),
        format!("{prefix}help : shows this help message"),
        format!("{prefix}info : get your name and Tox ID"),
        format!(
            "{prefix}add toxId [message] : add a friend. If no message, the friend will be added without a friend request"
        ),
        format!("{prefix}chat num : start chat with the friend with the id `num`"),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
