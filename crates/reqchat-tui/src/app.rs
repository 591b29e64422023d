//! Application state and update logic

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use tui_textarea::TextArea;

use reqchat_providers::{
    ExtractionBackend, HistoryEntry, ProgressFn, SendMessageRequest, SendMessageResponse,
    UploadOutcome,
};
use reqchat_sessions::{ConversationStore, MessageDraft, MessageRole};

/// Messages sent back to the UI loop by spawned backend tasks
#[derive(Debug)]
pub enum AppEvent {
    ModelsLoaded(Vec<String>),
    HistoryLoaded(Vec<HistoryEntry>),
    ReplyReceived(SendMessageResponse),
    UploadProgress { sent: u64, total: u64 },
    UploadFinished(UploadOutcome),
    BackendFailed(String),
}

/// Which input the keyboard is driving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Composing a chat message
    Compose,
    /// Typing a file path for the upload flow
    PickFile,
}

/// State of an in-flight upload, for the progress gauge
#[derive(Debug, Clone)]
pub struct UploadState {
    pub file_name: String,
    pub sent: u64,
    pub total: u64,
}

impl UploadState {
    /// Progress ratio in `0.0..=1.0`
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.sent as f64 / self.total as f64
        }
    }
}

/// Main application state
pub struct App {
    pub store: ConversationStore,
    backend: Arc<ExtractionBackend>,
    pub models: Vec<String>,
    pub selected_model: usize,
    pub input: TextArea<'static>,
    pub file_input: TextArea<'static>,
    pub mode: InputMode,
    pub upload: Option<UploadState>,
    pub status: Option<String>,
    pub should_quit: bool,
    events_tx: UnboundedSender<AppEvent>,
}

impl App {
    /// Create the application and the channel its backend tasks report on
    pub fn new(backend: ExtractionBackend) -> (Self, UnboundedReceiver<AppEvent>) {
        let (events_tx, events_rx) = unbounded_channel();
        let mut input = TextArea::default();
        input.set_placeholder_text("Type a message, Enter to send");
        let mut file_input = TextArea::default();
        file_input.set_placeholder_text("Path to a .pdf, .docx or .txt file");

        let app = Self {
            store: ConversationStore::new(),
            backend: Arc::new(backend),
            models: Vec::new(),
            selected_model: 0,
            input,
            file_input,
            mode: InputMode::Compose,
            upload: None,
            status: None,
            should_quit: false,
            events_tx,
        };
        (app, events_rx)
    }

    /// Kick off the startup fetches: model list, and history exactly once
    pub fn start(&mut self) {
        let tx = self.events_tx.clone();
        let backend = self.backend.clone();
        tokio::spawn(async move {
            match backend.list_models().await {
                Ok(models) => {
                    let _ = tx.send(AppEvent::ModelsLoaded(models));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::BackendFailed(e.to_string()));
                }
            }
        });

        if self.store.begin_history_fetch() {
            let tx = self.events_tx.clone();
            let backend = self.backend.clone();
            tokio::spawn(async move {
                match backend.chat_history().await {
                    Ok(entries) => {
                        let _ = tx.send(AppEvent::HistoryLoaded(entries));
                    }
                    Err(e) => {
                        warn!("History fetch failed: {}", e);
                        let _ = tx.send(AppEvent::BackendFailed(e.to_string()));
                    }
                }
            });
        }
    }

    /// Currently selected model id, if any models are known
    pub fn selected_model_id(&self) -> Option<&str> {
        self.models.get(self.selected_model).map(String::as_str)
    }

    /// Select the next model, wrapping around
    pub fn cycle_model(&mut self) {
        if !self.models.is_empty() {
            self.selected_model = (self.selected_model + 1) % self.models.len();
        }
    }

    /// Handle one keyboard event
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;
        match self.mode {
            InputMode::Compose => self.handle_compose_key(key),
            InputMode::PickFile => self.handle_pick_file_key(key),
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Char('o') => {
                    self.mode = InputMode::PickFile;
                }
                KeyCode::Char('l') => {
                    self.clear_conversation();
                }
                KeyCode::Char('n') => {
                    self.cycle_model();
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Enter if key.modifiers.is_empty() => self.send_message(),
            KeyCode::Tab => self.cycle_model(),
            _ => {
                self.input.input(key);
            }
        }
    }

    fn handle_pick_file_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Compose;
            }
            KeyCode::Enter => {
                let path = self.file_input.lines().join("");
                self.begin_upload(path.trim().to_string());
            }
            _ => {
                self.file_input.input(key);
            }
        }
    }

    /// Drop the conversation and re-arm the history guard
    pub fn clear_conversation(&mut self) {
        self.store.clear();
        self.status = Some("Conversation cleared".to_string());
    }

    /// Send the composed message to the selected model
    pub fn send_message(&mut self) {
        if self.store.is_loading() {
            self.status = Some("A request is already in flight".to_string());
            return;
        }
        let message = self.input.lines().join("\n").trim().to_string();
        if message.is_empty() {
            return;
        }
        let Some(model_id) = self.selected_model_id().map(str::to_string) else {
            self.status = Some("No model available yet".to_string());
            return;
        };

        self.input = TextArea::default();
        self.input.set_placeholder_text("Type a message, Enter to send");
        self.store.add_message(MessageDraft {
            role: Some(MessageRole::User),
            content: Some(message.clone()),
            model_id: Some(model_id.clone()),
            ..MessageDraft::default()
        });
        self.store.set_loading(true);

        debug!(%model_id, "Dispatching chat message");
        let tx = self.events_tx.clone();
        let backend = self.backend.clone();
        tokio::spawn(async move {
            let request = SendMessageRequest { message, model_id };
            match backend.send_message(&request).await {
                Ok(response) => {
                    let _ = tx.send(AppEvent::ReplyReceived(response));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::BackendFailed(e.to_string()));
                }
            }
        });
    }

    /// Start uploading a document for requirement extraction
    pub fn begin_upload(&mut self, path: String) {
        if self.store.is_loading() {
            self.status = Some("A request is already in flight".to_string());
            return;
        }
        if path.is_empty() {
            self.status = Some("No file selected".to_string());
            return;
        }
        let Some(model_id) = self.selected_model_id().map(str::to_string) else {
            self.status = Some("No model available yet".to_string());
            return;
        };

        let path = PathBuf::from(path);
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        self.mode = InputMode::Compose;
        self.file_input = TextArea::default();
        self.file_input
            .set_placeholder_text("Path to a .pdf, .docx or .txt file");
        self.upload = Some(UploadState {
            file_name: file_name.clone(),
            sent: 0,
            total: 0,
        });
        self.store.add_message(MessageDraft {
            role: Some(MessageRole::User),
            content: Some(format!("Sent {} for requirement extraction", file_name)),
            model_id: Some(model_id.clone()),
            ..MessageDraft::default()
        });
        self.store.set_loading(true);

        debug!(file = %file_name, %model_id, "Dispatching upload");
        let tx = self.events_tx.clone();
        let backend = self.backend.clone();
        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let progress: ProgressFn = Arc::new(move |sent, total| {
                let _ = progress_tx.send(AppEvent::UploadProgress { sent, total });
            });
            match backend.upload_file(&model_id, &path, Some(progress)).await {
                Ok(outcome) => {
                    let _ = tx.send(AppEvent::UploadFinished(outcome));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::BackendFailed(e.to_string()));
                }
            }
        });
    }

    /// Handle one event reported by a backend task
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ModelsLoaded(models) => {
                debug!(count = models.len(), "Models loaded");
                self.models = models;
                self.selected_model = 0;
            }
            AppEvent::HistoryLoaded(entries) => {
                debug!(count = entries.len(), "History loaded");
                for entry in entries {
                    let role = match entry.role.as_deref() {
                        Some("user") => MessageRole::User,
                        _ => MessageRole::Assistant,
                    };
                    self.store.add_message(MessageDraft {
                        role: Some(role),
                        content: entry.response.clone(),
                        file_url: entry.file_url.clone(),
                        model_id: entry.model_id.clone(),
                        uid: entry.uid_string(),
                        ..MessageDraft::default()
                    });
                }
            }
            AppEvent::ReplyReceived(response) => {
                self.store.set_loading(false);
                self.store.add_message(MessageDraft {
                    role: Some(MessageRole::Assistant),
                    content: Some(response.reply),
                    model_id: response.model_id,
                    ..MessageDraft::default()
                });
            }
            AppEvent::UploadProgress { sent, total } => {
                if let Some(upload) = &mut self.upload {
                    upload.sent = sent;
                    upload.total = total;
                }
            }
            AppEvent::UploadFinished(outcome) => {
                self.store.set_loading(false);
                self.upload = None;
                let content = outcome
                    .candidate_reply()
                    .unwrap_or_else(|| outcome.payload.to_string());
                self.store.add_message(MessageDraft {
                    role: Some(MessageRole::Assistant),
                    content: Some(content),
                    ..MessageDraft::default()
                });
            }
            AppEvent::BackendFailed(message) => {
                warn!("Backend call failed: {}", message);
                self.store.set_loading(false);
                self.upload = None;
                self.status = Some(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqchat_providers::BackendConfig;
    use serde_json::json;

    fn test_app() -> App {
        let backend = ExtractionBackend::new(BackendConfig::default()).unwrap();
        App::new(backend).0
    }

    #[test]
    fn reply_appends_assistant_message_and_clears_loading() {
        let mut app = test_app();
        app.store.set_loading(true);
        app.handle_app_event(AppEvent::ReplyReceived(SendMessageResponse {
            reply: "hello".to_string(),
            model_id: Some("mistral".to_string()),
        }));
        assert!(!app.store.is_loading());
        let last = app.store.messages().last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.content, "hello");
        assert_eq!(last.model_id.as_deref(), Some("mistral"));
    }

    #[test]
    fn history_replays_in_order_with_roles() {
        let mut app = test_app();
        let entries: Vec<HistoryEntry> = serde_json::from_value(json!([
            { "response": "question", "role": "user", "uid": 1 },
            { "response": "answer", "role": "assistant", "uid": 2 },
            { "response": "no role at all" }
        ]))
        .unwrap();
        app.handle_app_event(AppEvent::HistoryLoaded(entries));

        let messages = app.store.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].uid.as_deref(), Some("1"));
        assert_eq!(messages[1].role, MessageRole::Assistant);
        // Unknown role normalizes to assistant
        assert_eq!(messages[2].role, MessageRole::Assistant);
    }

    #[test]
    fn cycle_model_wraps_around() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::ModelsLoaded(vec![
            "mistral".to_string(),
            "llama3".to_string(),
        ]));
        assert_eq!(app.selected_model_id(), Some("mistral"));
        app.cycle_model();
        assert_eq!(app.selected_model_id(), Some("llama3"));
        app.cycle_model();
        assert_eq!(app.selected_model_id(), Some("mistral"));
    }

    #[test]
    fn cycle_model_with_no_models_is_a_noop() {
        let mut app = test_app();
        app.cycle_model();
        assert_eq!(app.selected_model_id(), None);
    }

    #[test]
    fn upload_progress_updates_the_gauge_state() {
        let mut app = test_app();
        app.upload = Some(UploadState {
            file_name: "spec.pdf".to_string(),
            sent: 0,
            total: 0,
        });
        app.handle_app_event(AppEvent::UploadProgress {
            sent: 50,
            total: 200,
        });
        let upload = app.upload.as_ref().unwrap();
        assert_eq!(upload.sent, 50);
        assert_eq!(upload.total, 200);
        assert!((upload.ratio() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn failure_clears_loading_and_upload_state() {
        let mut app = test_app();
        app.store.set_loading(true);
        app.upload = Some(UploadState {
            file_name: "spec.pdf".to_string(),
            sent: 10,
            total: 20,
        });
        app.handle_app_event(AppEvent::BackendFailed("boom".to_string()));
        assert!(!app.store.is_loading());
        assert!(app.upload.is_none());
        assert_eq!(app.status.as_deref(), Some("boom"));
    }

    #[test]
    fn upload_outcome_falls_back_to_serialized_payload() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::UploadFinished(UploadOutcome {
            payload: json!({ "status": "done" }),
        }));
        let last = app.store.messages().last().unwrap();
        assert_eq!(last.content, r#"{"status":"done"}"#);
    }

    #[test]
    fn clear_conversation_resets_store_and_history_guard() {
        let mut app = test_app();
        assert!(app.store.begin_history_fetch());
        app.handle_app_event(AppEvent::ReplyReceived(SendMessageResponse {
            reply: "hi".to_string(),
            model_id: None,
        }));
        app.clear_conversation();
        assert!(app.store.is_empty());
        assert!(app.store.begin_history_fetch());
    }
}
