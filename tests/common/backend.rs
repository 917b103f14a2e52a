use song_tagger::{Classifier, InferenceBackend, InferenceError, Pacer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Inference backend answering from a table keyed by song title.
///
/// Titles without a scripted reply get a connection error, which the
/// classifier turns into `Unknown` labels.
pub struct FakeInference {
    replies: HashMap<String, String>,
    calls: AtomicUsize,
    titles: Mutex<Vec<String>>,
    cancel_after: Mutex<Option<(usize, Arc<AtomicBool>)>>,
}

impl FakeInference {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            calls: AtomicUsize::new(0),
            titles: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        }
    }

    pub fn reply(mut self, title: &str, response: &str) -> Self {
        self.replies.insert(title.to_string(), response.to_string());
        self
    }

    /// Replies `{"language": .., "emotion": ..}` for `title`.
    pub fn label(self, title: &str, language: &str, emotion: &str) -> Self {
        let response = format!(
            r#"<think>hmm</think>{{"language": "{}", "emotion": "{}"}}"#,
            language, emotion
        );
        self.reply(title, &response)
    }

    /// Sets `flag` while serving the `n`-th call, as an interrupt would.
    pub fn cancel_during_call(&self, n: usize, flag: Arc<AtomicBool>) {
        *self.cancel_after.lock().unwrap() = Some((n, flag));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Titles in the order they were sent to the model.
    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }

    pub fn into_classifier(self: Arc<Self>) -> Classifier {
        Classifier::new(self, Arc::new(NoopPacer))
    }
}

fn title_of(prompt: &str) -> String {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix("Title: "))
        .unwrap_or_default()
        .to_string()
}

impl InferenceBackend for FakeInference {
    fn model(&self) -> &str {
        "fake-model"
    }

    fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let title = title_of(prompt);
        self.titles.lock().unwrap().push(title.clone());

        if let Some((at, flag)) = self.cancel_after.lock().unwrap().as_ref() {
            if *at == n {
                flag.store(true, Ordering::SeqCst);
            }
        }

        self.replies
            .get(&title)
            .cloned()
            .ok_or_else(|| InferenceError::Connection(format!("no reply for {}", title)))
    }

    fn health_check(&self) -> Result<(), InferenceError> {
        Ok(())
    }
}

pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn after_call(&self) {}
}
