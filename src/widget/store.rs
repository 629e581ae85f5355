use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::state::{text_len, WidgetState};
use crate::config::TranslateConfig;
use crate::error::{ValidationError, WidgetError};
use crate::language::{Language, LanguageMode, TextDirection};
use crate::translate::{TranslateInterface, TranslateRequest};

/// How a `translate()` call ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateOutcome {
    /// The service answered and the result was applied
    Translated,
    /// Source already equals the target; input copied without a request
    PassedThrough,
    /// A newer translate() started while this one was in flight; its
    /// response was dropped
    Superseded,
}

enum Attempt {
    Rejected(ValidationError),
    PassedThrough,
    Send { seq: u64, request: TranslateRequest },
}

/// Single source of truth for one widget session.
///
/// Every operation mutates the state through a `watch` channel so that
/// observers (the WebSocket push task, tests) always see the latest
/// snapshot. Cloning the store shares the same state.
#[derive(Clone)]
pub struct WidgetStore {
    state: Arc<watch::Sender<WidgetState>>,
    translator: Arc<dyn TranslateInterface>,
}

impl WidgetStore {
    pub fn new(config: &TranslateConfig, translator: Arc<dyn TranslateInterface>) -> Self {
        let (state, _) = watch::channel(WidgetState::new(config.char_limit, config.target_language));
        Self {
            state: Arc::new(state),
            translator,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> WidgetState {
        self.state.borrow().clone()
    }

    /// Replace the input text. Edits past the character limit are dropped
    /// and the previous text is kept; returns whether the edit was applied.
    pub fn set_input_text(&self, candidate: impl Into<String>) -> bool {
        let candidate = candidate.into();
        self.state.send_if_modified(|s| {
            if text_len(&candidate) > s.char_limit {
                debug!(
                    "Ignoring edit of {} units past limit {}",
                    text_len(&candidate),
                    s.char_limit
                );
                return false;
            }
            s.input_text = candidate;
            true
        })
    }

    /// Client edit tagged with the client's revision counter. The revision is
    /// recorded and pushed even when the edit is dropped for length, so the
    /// client always gets back the authoritative text for that revision.
    pub fn apply_client_edit(&self, candidate: impl Into<String>, revision: u64) -> bool {
        let candidate = candidate.into();
        let mut accepted = false;
        self.state.send_modify(|s| {
            s.input_revision = s.input_revision.max(revision);
            if text_len(&candidate) <= s.char_limit {
                s.input_text = candidate;
                accepted = true;
            } else {
                debug!("Ignoring client edit {} past limit {}", revision, s.char_limit);
            }
        });
        accepted
    }

    pub fn set_language_mode(&self, mode: LanguageMode) {
        debug!("Language mode -> {:?}", mode);
        self.state.send_modify(|s| {
            s.language_mode = mode;
            if mode == LanguageMode::Detect {
                s.apply_auto_direction(TextDirection::Ltr);
            }
        });
    }

    /// Pick the source language. In select mode the old output is cleared,
    /// since it was produced from a different source.
    pub fn set_selected_language(&self, language: Language) {
        debug!("Selected language -> {}", language);
        self.state.send_modify(|s| {
            s.selected_language = language;
            if s.language_mode == LanguageMode::Select {
                s.translated_text = None;
            }
            s.apply_auto_direction(TextDirection::for_language(language));
        });
    }

    /// Flip the direction and pin it against automatic changes
    pub fn toggle_direction(&self) -> TextDirection {
        let mut direction = TextDirection::default();
        self.state.send_modify(|s| {
            s.direction = s.direction.flipped();
            s.direction_overridden = true;
            direction = s.direction;
        });
        debug!("Direction toggled to {:?}", direction);
        direction
    }

    /// Validate the input and translate it into the target language.
    ///
    /// Every call supersedes any request still in flight: only the response
    /// to the most recent call is applied. Failures are written to the
    /// state's error message and also returned.
    pub async fn translate(&self) -> Result<TranslateOutcome, WidgetError> {
        let mut attempt = Attempt::PassedThrough;
        self.state.send_modify(|s| attempt = begin_attempt(s));

        let (seq, request) = match attempt {
            Attempt::Rejected(e) => {
                debug!("Translation rejected: {}", e);
                return Err(e.into());
            }
            Attempt::PassedThrough => {
                debug!("Source equals target; copying input");
                return Ok(TranslateOutcome::PassedThrough);
            }
            Attempt::Send { seq, request } => (seq, request),
        };

        let result = self
            .translator
            .translate(&request)
            .await
            .map_err(WidgetError::from);

        let applied = self.state.send_if_modified(|s| {
            if s.request_seq != seq {
                return false;
            }
            s.pending = false;
            match &result {
                Ok(translation) => {
                    s.translated_text = Some(translation.translated_text.clone());
                    s.error_message = None;
                    let direction = translation
                        .detected_source_language
                        .as_deref()
                        .map(TextDirection::for_code)
                        .or_else(|| request.source.map(TextDirection::for_language))
                        .unwrap_or_default();
                    s.apply_auto_direction(direction);
                }
                Err(e) => {
                    s.error_message = Some(e.user_message());
                }
            }
            true
        });

        if !applied {
            debug!("Dropping response to superseded request {}", seq);
            return Ok(TranslateOutcome::Superseded);
        }

        match result {
            Ok(_) => {
                info!("Translation request {} completed via {}", seq, self.translator.provider());
                Ok(TranslateOutcome::Translated)
            }
            Err(e) => {
                error!("Translation request {} failed: {}", seq, e);
                Err(e)
            }
        }
    }
}

fn begin_attempt(s: &mut WidgetState) -> Attempt {
    s.error_message = None;
    s.request_seq += 1;
    s.pending = false;

    let rejection = if s.input_text.trim().is_empty() {
        Some(ValidationError::Empty)
    } else if s.input_len() > s.char_limit {
        Some(ValidationError::ExceedsLimit { limit: s.char_limit })
    } else {
        None
    };
    if let Some(e) = rejection {
        s.error_message = Some(WidgetError::from(e.clone()).user_message());
        return Attempt::Rejected(e);
    }

    if s.request_source() == Some(s.target_language) {
        s.translated_text = Some(s.input_text.clone());
        return Attempt::PassedThrough;
    }

    s.pending = true;
    Attempt::Send {
        seq: s.request_seq,
        request: TranslateRequest {
            text: s.input_text.clone(),
            source: s.request_source(),
            target: s.target_language,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TranslateError, TRANSLATION_FAILED_MESSAGE};
    use crate::translate::Translation;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type Reply = Result<Translation, TranslateError>;

    /// Replies from a script, in order, and records what it was asked
    #[derive(Default)]
    struct ScriptedTranslator {
        replies: Mutex<VecDeque<Reply>>,
        calls: Mutex<Vec<TranslateRequest>>,
    }

    impl ScriptedTranslator {
        fn replying(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<TranslateRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranslateInterface for ScriptedTranslator {
        async fn translate(&self, request: &TranslateRequest) -> Result<Translation, TranslateError> {
            self.calls.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(TranslateError::NoTranslations))
        }

        fn provider(&self) -> &'static str {
            "scripted"
        }
    }

    /// Each call waits until the test releases its gate
    #[derive(Default)]
    struct GatedTranslator {
        gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    }

    #[async_trait]
    impl TranslateInterface for GatedTranslator {
        async fn translate(&self, _request: &TranslateRequest) -> Result<Translation, TranslateError> {
            let gate = self.gates.lock().unwrap().pop_front().expect("no gate queued");
            gate.await.expect("gate dropped")
        }

        fn provider(&self) -> &'static str {
            "gated"
        }
    }

    fn translated(text: &str, detected: Option<&str>) -> Reply {
        Ok(Translation {
            translated_text: text.to_string(),
            detected_source_language: detected.map(str::to_string),
        })
    }

    fn failure() -> Reply {
        Err(TranslateError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "backend down".to_string(),
        })
    }

    fn store_with(translator: Arc<dyn TranslateInterface>, char_limit: usize) -> WidgetStore {
        let config = TranslateConfig {
            char_limit,
            ..TranslateConfig::default()
        };
        WidgetStore::new(&config, translator)
    }

    #[test]
    fn edits_within_limit_replace_input() {
        let store = store_with(ScriptedTranslator::replying(vec![]), 5);
        assert!(store.set_input_text("abc"));
        assert!(store.set_input_text("abcde"));
        assert_eq!(store.snapshot().input_text, "abcde");
    }

    #[test]
    fn edits_past_limit_are_ignored() {
        let store = store_with(ScriptedTranslator::replying(vec![]), 5);
        store.set_input_text("abcd");
        assert!(!store.set_input_text("abcdef"));
        assert_eq!(store.snapshot().input_text, "abcd");
        assert_eq!(store.snapshot().error_message, None);
    }

    #[tokio::test]
    async fn empty_input_never_reaches_the_service() {
        let translator = ScriptedTranslator::replying(vec![]);
        let store = store_with(translator.clone(), 1000);
        store.set_input_text("   \n\t");

        let result = store.translate().await;
        assert!(matches!(result, Err(WidgetError::Validation(ValidationError::Empty))));
        assert!(translator.calls().is_empty());
        assert_eq!(
            store.snapshot().error_message.as_deref(),
            Some("Input text cannot be empty.")
        );
    }

    #[tokio::test]
    async fn over_limit_input_never_reaches_the_service() {
        let translator = ScriptedTranslator::replying(vec![]);
        let store = store_with(translator.clone(), 1000);
        // bypass the input cap to reach the translate-time check
        store.state.send_modify(|s| s.input_text = "x".repeat(1001));

        let result = store.translate().await;
        assert!(matches!(
            result,
            Err(WidgetError::Validation(ValidationError::ExceedsLimit { limit: 1000 }))
        ));
        assert!(translator.calls().is_empty());
        let message = store.snapshot().error_message.unwrap();
        assert!(message.contains("1000"));
    }

    #[tokio::test]
    async fn selecting_the_target_copies_input() {
        let translator = ScriptedTranslator::replying(vec![]);
        let store = store_with(translator.clone(), 1000);
        store.set_input_text("Already English");
        store.set_language_mode(LanguageMode::Select);
        store.set_selected_language(Language::En);

        assert_eq!(store.translate().await.unwrap(), TranslateOutcome::PassedThrough);
        assert!(translator.calls().is_empty());
        let state = store.snapshot();
        assert_eq!(state.translated_text.as_deref(), Some("Already English"));
        assert_eq!(state.direction, TextDirection::Ltr);
    }

    #[tokio::test]
    async fn detected_arabic_switches_to_rtl() {
        let translator = ScriptedTranslator::replying(vec![translated("Hello", Some("ar"))]);
        let store = store_with(translator.clone(), 1000);
        store.set_input_text("مرحبا");

        assert_eq!(store.translate().await.unwrap(), TranslateOutcome::Translated);
        let state = store.snapshot();
        assert_eq!(state.translated_text.as_deref(), Some("Hello"));
        assert_eq!(state.direction, TextDirection::Rtl);
        assert!(!state.pending);

        let calls = translator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].source, None);
        assert_eq!(calls[0].target, Language::En);
    }

    #[tokio::test]
    async fn pinned_source_is_sent_and_drives_direction() {
        let translator = ScriptedTranslator::replying(vec![translated("Shalom", None)]);
        let store = store_with(translator.clone(), 1000);
        store.set_input_text("שלום");
        store.set_language_mode(LanguageMode::Select);
        store.set_selected_language(Language::He);

        store.translate().await.unwrap();
        assert_eq!(translator.calls()[0].source, Some(Language::He));
        assert_eq!(store.snapshot().direction, TextDirection::Rtl);
    }

    #[tokio::test]
    async fn failure_keeps_previous_translation() {
        let translator =
            ScriptedTranslator::replying(vec![translated("Good morning", Some("es")), failure()]);
        let store = store_with(translator, 1000);
        store.set_input_text("Buenos días");
        store.translate().await.unwrap();

        store.set_input_text("Buenas noches");
        let result = store.translate().await;
        assert!(matches!(result, Err(WidgetError::Translation(_))));

        let state = store.snapshot();
        assert_eq!(state.error_message.as_deref(), Some(TRANSLATION_FAILED_MESSAGE));
        assert_eq!(state.translated_text.as_deref(), Some("Good morning"));
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn next_attempt_clears_the_error() {
        let translator = ScriptedTranslator::replying(vec![failure(), translated("Hi", Some("fr"))]);
        let store = store_with(translator, 1000);
        store.set_input_text("Salut");

        assert!(store.translate().await.is_err());
        assert!(store.snapshot().error_message.is_some());

        store.translate().await.unwrap();
        let state = store.snapshot();
        assert_eq!(state.error_message, None);
        assert_eq!(state.translated_text.as_deref(), Some("Hi"));
    }

    #[test]
    fn toggling_twice_restores_direction() {
        let store = store_with(ScriptedTranslator::replying(vec![]), 1000);
        let original = store.snapshot().direction;

        assert_eq!(store.toggle_direction(), original.flipped());
        assert_eq!(store.toggle_direction(), original);
        assert_eq!(store.snapshot().direction, original);
        assert!(store.snapshot().direction_overridden);
    }

    #[tokio::test]
    async fn manual_direction_survives_detection() {
        let translator = ScriptedTranslator::replying(vec![translated("Hello", Some("he"))]);
        let store = store_with(translator, 1000);
        store.set_input_text("שלום");
        store.toggle_direction();
        store.toggle_direction();

        store.translate().await.unwrap();
        assert_eq!(store.snapshot().direction, TextDirection::Ltr);
    }

    #[test]
    fn selecting_a_language_clears_output_in_select_mode() {
        let store = store_with(ScriptedTranslator::replying(vec![]), 1000);
        store.state.send_modify(|s| s.translated_text = Some("old".to_string()));

        store.set_selected_language(Language::Ar);
        assert_eq!(store.snapshot().translated_text.as_deref(), Some("old"));
        assert_eq!(store.snapshot().direction, TextDirection::Rtl);

        store.set_language_mode(LanguageMode::Select);
        store.set_selected_language(Language::De);
        let state = store.snapshot();
        assert_eq!(state.translated_text, None);
        assert_eq!(state.direction, TextDirection::Ltr);
    }

    #[test]
    fn detect_mode_keeps_selection_but_resets_direction() {
        let store = store_with(ScriptedTranslator::replying(vec![]), 1000);
        store.set_language_mode(LanguageMode::Select);
        store.set_selected_language(Language::Ar);
        store.set_language_mode(LanguageMode::Detect);

        let state = store.snapshot();
        assert_eq!(state.selected_language, Language::Ar);
        assert_eq!(state.direction, TextDirection::Ltr);
        assert_eq!(state.request_source(), None);
    }

    #[tokio::test]
    async fn stale_responses_are_dropped() {
        let translator = Arc::new(GatedTranslator::default());
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        translator.gates.lock().unwrap().extend([first_rx, second_rx]);

        let store = store_with(translator, 1000);
        store.set_input_text("uno");

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.translate().await }
        });
        while store.snapshot().request_seq < 1 {
            tokio::task::yield_now().await;
        }

        store.set_input_text("dos");
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.translate().await }
        });
        while store.snapshot().request_seq < 2 {
            tokio::task::yield_now().await;
        }
        assert!(store.snapshot().pending);

        second_tx.send(translated("two", Some("es"))).unwrap();
        assert_eq!(second.await.unwrap().unwrap(), TranslateOutcome::Translated);

        first_tx.send(translated("one", Some("es"))).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), TranslateOutcome::Superseded);

        let state = store.snapshot();
        assert_eq!(state.translated_text.as_deref(), Some("two"));
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn validation_failure_supersedes_in_flight_request() {
        let translator = Arc::new(GatedTranslator::default());
        let (tx, rx) = oneshot::channel();
        translator.gates.lock().unwrap().push_back(rx);

        let store = store_with(translator, 1000);
        store.set_input_text("bonjour");

        let in_flight = tokio::spawn({
            let store = store.clone();
            async move { store.translate().await }
        });
        while !store.snapshot().pending {
            tokio::task::yield_now().await;
        }

        store.set_input_text("  ");
        assert!(matches!(
            store.translate().await,
            Err(WidgetError::Validation(ValidationError::Empty))
        ));
        assert!(!store.snapshot().pending);

        tx.send(translated("hello", Some("fr"))).unwrap();
        assert_eq!(in_flight.await.unwrap().unwrap(), TranslateOutcome::Superseded);

        let state = store.snapshot();
        assert!(!state.pending);
        assert_eq!(state.translated_text, None);
        let banner = WidgetError::from(ValidationError::Empty).user_message();
        assert_eq!(state.error_message, Some(banner));
    }

    #[test]
    fn client_edits_record_their_revision() {
        let store = store_with(ScriptedTranslator::replying(vec![]), 5);
        let mut rx = store.subscribe();

        assert!(store.apply_client_edit("ab", 1));
        assert!(store.apply_client_edit("abc", 2));
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.input_text, "abc");
        assert_eq!(state.input_revision, 2);

        // dropped edits still advance the revision and notify, so the
        // client is sent back the text that was kept
        assert!(!store.apply_client_edit("abcdef", 3));
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.input_text, "abc");
        assert_eq!(state.input_revision, 3);
    }

    #[test]
    fn late_client_revisions_do_not_rewind() {
        let store = store_with(ScriptedTranslator::replying(vec![]), 100);
        store.apply_client_edit("abcd", 4);
        store.apply_client_edit("ab", 2);
        assert_eq!(store.snapshot().input_revision, 4);
    }

    #[tokio::test]
    async fn observers_see_each_change() {
        let store = store_with(ScriptedTranslator::replying(vec![]), 1000);
        let mut rx = store.subscribe();

        store.set_input_text("hi");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().input_text, "hi");

        store.set_input_text("x".repeat(2000));
        assert!(!rx.has_changed().unwrap());
    }
}
