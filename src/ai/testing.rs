//! Scripted chat-completion stub for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::{ChatCompletion, ChatError};

/// Replays queued responses per model and records every call.
#[derive(Debug, Default)]
pub(crate) struct ScriptedChat {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    default_response: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

#[allow(clippy::unwrap_used)]
impl ScriptedChat {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response for `model`.
    pub(crate) fn respond(self, model: &str, response: &str) -> Self {
        self.push(model, Ok(response.to_string()))
    }

    /// Queues a transport failure for `model`.
    pub(crate) fn fail(self, model: &str) -> Self {
        self.push(model, Err(format!("{model} unavailable")))
    }

    /// Returned once a model's queue is empty; otherwise those calls fail.
    pub(crate) fn with_default(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    fn push(self, model: &str, entry: Result<String, String>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(entry);
        self
    }

    pub(crate) fn calls_to(&self, model: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == model)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }
}

#[async_trait]
#[allow(clippy::unwrap_used)]
impl ChatCompletion for ScriptedChat {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ChatError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));

        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(model)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ChatError::Transport(message)),
            None => self
                .default_response
                .clone()
                .ok_or_else(|| ChatError::Transport(format!("no response scripted for {model}"))),
        }
    }
}
