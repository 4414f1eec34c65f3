//! Named command registry and dispatch.
//!
//! A `Service<B>` owns a backend (normally a [`crate::Cellar`]) and maps
//! command names to handlers. Each command declares the payload fields it
//! cannot run without; dispatch refuses a payload missing any of them
//! before the handler is called.
//!
//! ```ignore
//! let service = Service::new(cellar)
//!     .command("rack.rename", &["rackId", "name"], |ctx| { /* ... */ });
//! let reply = service.dispatch("rack.rename", payload, Session::for_user("alice"))?;
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;

type Handler<B> = Box<dyn Fn(&Context<'_, B>) -> Result<Value, HandlerError> + Send + Sync>;

struct Command<B> {
    required: &'static [&'static str],
    handler: Handler<B>,
}

pub struct Service<B> {
    backend: B,
    commands: BTreeMap<&'static str, Command<B>>,
}

impl<B: Send + Sync + 'static> Service<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            commands: BTreeMap::new(),
        }
    }

    /// Register `handler` under `name`. A later registration replaces an
    /// earlier one.
    pub fn command<F>(mut self, name: &'static str, required: &'static [&'static str], handler: F) -> Self
    where
        F: Fn(&Context<'_, B>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.commands.insert(
            name,
            Command {
                required,
                handler: Box::new(handler),
            },
        );
        self
    }

    pub fn dispatch(&self, name: &str, input: Value, session: Session) -> Result<Value, HandlerError> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| HandlerError::UnknownCommand(name.to_string()))?;

        let ctx = Context::new(name, input, session, &self.backend);
        let missing = ctx.missing(command.required);
        let result = if missing.is_empty() {
            (command.handler)(&ctx)
        } else {
            Err(HandlerError::MissingFields {
                command: name.to_string(),
                fields: missing,
            })
        };

        match &result {
            Ok(_) => tracing::debug!(command = name, user = ?ctx.session().user_id(), "command handled"),
            Err(e) => tracing::warn!(command = name, status = e.status_code(), error = %e, "command failed"),
        }
        result
    }

    /// Registered command names in order.
    pub fn commands(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
