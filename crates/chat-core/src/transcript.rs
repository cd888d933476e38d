//! Transcript of the active dialog and the two-phase send transition.
//!
//! A send moves `Idle → Pending`, appending the user's message optimistically,
//! and then resolves exactly once:
//! - `commit`: the server history replaces the transcript wholesale;
//! - `fail`: a synthetic assistant message marks the failed turn;
//! - `settle`: the response belongs to a dialog that is no longer shown,
//!   so the transcript is left alone.

use chat_types::{
    ChatError, Result,
    dialog::{DialogTurnRequest, ResourceId},
    message::Message,
    validation::is_blank,
};

/// Assistant-side marker appended when a turn fails. Never exists server-side.
pub const SEND_FAILURE_TEXT: &str = "Sorry, an error occurred while processing your message.";

#[derive(Debug, Clone, PartialEq)]
pub enum SendState {
    Idle,
    Pending(PendingTurn),
}

/// A send that has been applied locally but not yet confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub text: String,
    /// `None` asks the server to create a dialog
    pub dialog_id: Option<ResourceId>,
    /// Transcript as it was before the optimistic append
    pub context: Vec<Message>,
    /// Session generation the send was started under
    pub generation: u64,
}

impl PendingTurn {
    pub fn request(&self) -> DialogTurnRequest {
        DialogTurnRequest {
            message: self.text.clone(),
            dialog_id: self.dialog_id.clone(),
            conversation_history: self.context.clone(),
        }
    }

    pub fn creates_dialog(&self) -> bool {
        self.dialog_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Server history is now the transcript
    Committed { dialog_id: ResourceId, created: bool },
    /// Failed under the dialog it was sent from; failure marker appended
    Failed(ChatError),
    /// Resolved, successfully or not, after the session moved to another
    /// dialog; nothing applied. `dialog_id` is set when the server accepted the turn.
    Stale { dialog_id: Option<ResourceId> },
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    send: SendState,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            send: SendState::Idle,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn state(&self) -> &SendState {
        &self.send
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.send, SendState::Pending(_))
    }

    /// Enter the pending phase. Rejects blank input and a second in-flight send
    /// without touching the transcript.
    pub fn begin(
        &mut self,
        text: &str,
        dialog_id: Option<ResourceId>,
        generation: u64,
    ) -> Result<PendingTurn> {
        if self.is_pending() {
            return Err(ChatError::SendInFlight);
        }
        if is_blank(text) {
            return Err(ChatError::Validation("message must not be empty".to_string()));
        }

        let turn = PendingTurn {
            text: text.to_string(),
            dialog_id,
            context: self.messages.clone(),
            generation,
        };
        self.messages.push(Message::user(text));
        self.send = SendState::Pending(turn.clone());
        Ok(turn)
    }

    /// Server confirmed the turn; its history is authoritative.
    pub fn commit(&mut self, history: Vec<Message>) {
        self.messages = history;
        self.send = SendState::Idle;
    }

    /// Keep the optimistic message and mark the failure in-line.
    pub fn fail(&mut self) {
        self.messages.push(Message::assistant(SEND_FAILURE_TEXT));
        self.send = SendState::Idle;
    }

    /// Leave the pending phase without applying anything.
    pub fn settle(&mut self) {
        self.send = SendState::Idle;
    }

    /// Load a fetched history. Does not affect an in-flight send.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
