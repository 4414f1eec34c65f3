//! What a command handler gets to see.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;

pub struct Context<'a, B> {
    command: &'a str,
    input: Value,
    session: Session,
    backend: &'a B,
}

impl<'a, B> Context<'a, B> {
    pub(crate) fn new(command: &'a str, input: Value, session: Session, backend: &'a B) -> Self {
        Self {
            command,
            input,
            session,
            backend,
        }
    }

    /// Decode the payload, naming the command on failure.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        T::deserialize(&self.input)
            .map_err(|e| HandlerError::DecodeFailed(format!("{}: {e}", self.command)))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn command(&self) -> &str {
        self.command
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &'a B {
        self.backend
    }

    /// Fields of `required` absent (or null) in the payload.
    pub fn missing(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|field| self.input.get(field).map_or(true, Value::is_null))
            .collect()
    }
}
