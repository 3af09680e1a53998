//! Conversation session controller.
//!
//! One controller exists per process. It owns the message history, the
//! selected program context and the loading flag; views and the backend are
//! injected at construction.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::api::{ApiError, ChatBackend, ChatRequest};
use crate::models::{HistoryEntry, Message};

use super::view::{ChatView, RenderedMessage};

/// Number of trailing history entries sent to the backend per turn.
pub const CONTEXT_WINDOW: usize = 12;

/// What a call to [`SessionController::send`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input, or a reply is still pending. Nothing changed.
    Ignored,
    /// The assistant replied and the reply was appended to history.
    Replied,
    /// The request failed; an error bubble was shown but not recorded.
    Failed,
}

#[derive(Debug, Default)]
struct SessionState {
    history: Vec<Message>,
    selected_program_id: String,
    is_loading: bool,
    tokens_saved: i64,
}

/// Clears the loading flag when a send finishes, however it finishes.
struct LoadingGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading = false;
    }
}

pub struct SessionController<B> {
    backend: B,
    view: Arc<dyn ChatView>,
    state: Mutex<SessionState>,
}

impl<B: ChatBackend> SessionController<B> {
    pub fn new(backend: B, view: Arc<dyn ChatView>) -> Self {
        Self {
            backend,
            view,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scope subsequent requests to `program_id`; empty means general.
    pub fn select_program(&self, program_id: &str) {
        debug!(program_id, "selected program context");
        self.lock().selected_program_id = program_id.to_string();
    }

    pub fn selected_program_id(&self) -> String {
        self.lock().selected_program_id.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// Full local history (user messages and successful replies).
    pub fn history(&self) -> Vec<Message> {
        self.lock().history.clone()
    }

    /// Running total of tokens saved by context compression this session.
    pub fn tokens_saved(&self) -> i64 {
        self.lock().tokens_saved
    }

    /// Send one user turn and wait for the reply.
    ///
    /// Rejected without effect while a previous send is in flight or when
    /// the trimmed text is empty.
    pub async fn send(&self, raw_text: &str) -> SendOutcome {
        let text = raw_text.trim();

        // The loading flag is set in the same critical section that checks
        // it, before any await point.
        let (user, request) = {
            let mut state = self.lock();
            if state.is_loading || text.is_empty() {
                return SendOutcome::Ignored;
            }
            state.is_loading = true;

            let user = Message::user(text);
            state.history.push(user.clone());

            let start = state.history.len().saturating_sub(CONTEXT_WINDOW);
            let request = ChatRequest {
                message: text.to_string(),
                history: state.history[start..].iter().map(HistoryEntry::from).collect(),
                program_id: Some(state.selected_program_id.clone()).filter(|id| !id.is_empty()),
            };
            (user, request)
        };
        let _loading = LoadingGuard { state: &self.state };

        self.view.show_message(&RenderedMessage::from_message(&user));
        self.view.set_typing(true);

        let result = self.backend.chat(&request).await;
        self.view.set_typing(false);

        match result {
            Ok(response) => {
                let reply = Message::assistant(response.reply, response.compression_stats);
                let total_saved = {
                    let mut state = self.lock();
                    if let Some(saved) = reply
                        .compression
                        .as_ref()
                        .map(|stats| stats.tokens_saved)
                        .filter(|saved| *saved > 0)
                    {
                        state.tokens_saved += saved;
                    }
                    state.history.push(reply.clone());
                    state.tokens_saved
                };

                if let Some(stats) = &reply.compression {
                    self.view.show_compression(stats, total_saved);
                }
                self.view.show_message(&RenderedMessage::from_message(&reply));
                SendOutcome::Replied
            }
            Err(err) => {
                warn!(error = %err, "chat request failed");
                let notice = Message::assistant(error_summary(&err), None);
                self.view.show_message(&RenderedMessage::from_message(&notice));
                SendOutcome::Failed
            }
        }
    }
}

fn error_summary(err: &ApiError) -> String {
    format!("⚠️ Error: {err}. Please check that the backend is running and its API keys are configured.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::api::ChatResponse;
    use crate::models::{CompressionStats, MessageRole};

    #[derive(Default)]
    struct RecordingView {
        shown: Mutex<Vec<RenderedMessage>>,
        compression_totals: Mutex<Vec<i64>>,
    }

    impl RecordingView {
        fn shown(&self) -> Vec<RenderedMessage> {
            self.shown.lock().unwrap().clone()
        }
    }

    impl ChatView for RecordingView {
        fn show_message(&self, message: &RenderedMessage) {
            self.shown.lock().unwrap().push(message.clone());
        }

        fn show_compression(&self, _stats: &CompressionStats, total_saved: i64) {
            self.compression_totals.lock().unwrap().push(total_saved);
        }
    }

    #[derive(Default)]
    struct MockBackend {
        requests: Mutex<Vec<ChatRequest>>,
        fail: bool,
        tokens_saved: Option<i64>,
        gate: Option<Arc<Notify>>,
    }

    impl MockBackend {
        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for MockBackend {
        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(ApiError::Status {
                    status: 500,
                    message: "model unavailable".to_string(),
                });
            }
            Ok(ChatResponse {
                reply: format!("re: {}", request.message),
                compression_stats: self.tokens_saved.map(|saved| CompressionStats {
                    original_tokens: 100,
                    compressed_tokens: 100 - saved,
                    tokens_saved: saved,
                    compression_ratio: 0.4,
                    provider: "fallback".to_string(),
                }),
                model_used: None,
            })
        }
    }

    impl<B: ChatBackend> SessionController<B> {
        fn backend(&self) -> &B {
            &self.backend
        }
    }

    fn controller(backend: MockBackend) -> (SessionController<MockBackend>, Arc<RecordingView>) {
        let view = Arc::new(RecordingView::default());
        (SessionController::new(backend, view.clone()), view)
    }

    #[tokio::test]
    async fn send_appends_user_then_assistant() {
        let (session, view) = controller(MockBackend::default());

        assert_eq!(session.send("  What GPA do I need?  ").await, SendOutcome::Replied);

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "What GPA do I need?");
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert_eq!(history[1].content, "re: What GPA do I need?");
        assert!(!session.is_loading());

        // The user turn is already part of the context it is sent with.
        let requests = session.backend().requests();
        assert_eq!(requests[0].history.len(), 1);
        assert_eq!(requests[0].history[0].content, "What GPA do I need?");

        let shown = view.shown();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].role, MessageRole::User);
        assert_eq!(shown[1].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let (session, view) = controller(MockBackend::default());

        assert_eq!(session.send("   \n\t").await, SendOutcome::Ignored);
        assert!(session.history().is_empty());
        assert!(view.shown().is_empty());
        assert!(session.backend().requests().is_empty());
    }

    #[tokio::test]
    async fn failure_shows_error_but_keeps_it_out_of_history() {
        let backend = MockBackend {
            fail: true,
            ..MockBackend::default()
        };
        let (session, view) = controller(backend);

        assert_eq!(session.send("hello").await, SendOutcome::Failed);
        assert!(!session.is_loading());

        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, MessageRole::User);

        let shown = view.shown();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].role, MessageRole::Assistant);
        assert!(shown[1].text.contains("model unavailable"));

        // Next turn's context carries only the two user messages.
        session.send("again").await;
        let requests = session.backend().requests();
        let contents: Vec<_> = requests[1].history.iter().map(|h| h.content.as_str()).collect();
        assert_eq!(contents, ["hello", "again"]);
    }

    #[tokio::test]
    async fn only_last_twelve_entries_are_sent() {
        let (session, _view) = controller(MockBackend::default());

        for i in 0..7 {
            session.send(&format!("question {i}")).await;
        }

        assert_eq!(session.history().len(), 14);
        let requests = session.backend().requests();
        let last = requests.last().unwrap();
        assert_eq!(last.history.len(), CONTEXT_WINDOW);
        assert_eq!(last.history.last().unwrap().content, "question 6");
        assert_eq!(last.history.first().unwrap().content, "re: question 0");
    }

    #[tokio::test]
    async fn empty_selection_omits_program_id() {
        let (session, _view) = controller(MockBackend::default());

        session.select_program("mit-cs");
        session.send("first").await;
        session.select_program("");
        session.send("second").await;

        let requests = session.backend().requests();
        assert_eq!(requests[0].program_id.as_deref(), Some("mit-cs"));
        assert_eq!(requests[1].program_id, None);

        let wire = serde_json::to_value(&requests[1]).unwrap();
        assert!(wire.get("program_id").is_none());
    }

    #[tokio::test]
    async fn send_while_loading_is_a_no_op() {
        let gate = Arc::new(Notify::new());
        let backend = MockBackend {
            gate: Some(gate.clone()),
            ..MockBackend::default()
        };
        let (session, _view) = controller(backend);
        let session = Arc::new(session);

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.send("one").await }
        });

        while !session.is_loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(session.send("two").await, SendOutcome::Ignored);
        assert_eq!(session.history().len(), 1);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SendOutcome::Replied);
        assert!(!session.is_loading());
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.backend().requests().len(), 1);
    }

    #[tokio::test]
    async fn dropped_send_clears_loading() {
        let gate = Arc::new(Notify::new());
        let backend = MockBackend {
            gate: Some(gate),
            ..MockBackend::default()
        };
        let (session, _view) = controller(backend);

        let pending = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            session.send("stuck"),
        )
        .await;
        assert!(pending.is_err());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn positive_savings_accumulate() {
        let backend = MockBackend {
            tokens_saved: Some(40),
            ..MockBackend::default()
        };
        let (session, view) = controller(backend);

        session.send("a").await;
        session.send("b").await;

        assert_eq!(session.tokens_saved(), 80);
        assert_eq!(*view.compression_totals.lock().unwrap(), [40, 80]);
        assert_eq!(view.shown()[1].badge.as_deref(), Some("40 tokens saved (40%)"));
    }

    #[tokio::test]
    async fn negative_savings_are_ignored() {
        let backend = MockBackend {
            tokens_saved: Some(-3),
            ..MockBackend::default()
        };
        let (session, _view) = controller(backend);

        session.send("a").await;
        assert_eq!(session.tokens_saved(), 0);
        assert!(session.history()[1].compression.is_some());
    }
}
