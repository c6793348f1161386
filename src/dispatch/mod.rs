// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Message dispatch along the part hierarchy.
//!
//! A message sent to a part visits the part, then each ancestor (card → background → stack),
//! then the environment. The first handler that completes stops the walk. A handler can instead
//! pass the message on to the next level, or exit to top, which abandons the walk and every
//! handler frame nested around it.

use std::collections::HashMap;
use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::error::Error;
use crate::model::{PartRef, StackModel, Value};

pub mod context;

pub use context::{ExecutionContext, HandlerFrame};

/// Messages the engine itself sends while opening, closing and editing a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemMessage {
    OpenStack,
    CloseStack,
    OpenCard,
    CloseCard,
    NewCard,
    NewBackground,
    DeleteCard,
}

impl SystemMessage {
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenStack => "openStack",
            Self::CloseStack => "closeStack",
            Self::OpenCard => "openCard",
            Self::CloseCard => "closeCard",
            Self::NewCard => "newCard",
            Self::NewBackground => "newBackground",
            Self::DeleteCard => "deleteCard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    name: SmolStr,
    args: SmallVec<[Value; 2]>,
}

impl Message {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self { name: SmolStr::new(name.as_ref().trim()), args: SmallVec::new() }
    }

    pub fn with_args(name: impl AsRef<str>, args: impl IntoIterator<Item = Value>) -> Self {
        Self { name: SmolStr::new(name.as_ref().trim()), args: args.into_iter().collect() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Message names are case-insensitive.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl From<SystemMessage> for Message {
    fn from(message: SystemMessage) -> Self {
        Self::new(message.name())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What a single handler invocation decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResult {
    /// The part has no handler for the message; the walk continues.
    NotHandled,
    /// The handler ran to completion; the walk stops.
    Completed,
    /// The handler passed the message; the walk resumes at the next ancestor.
    Passed,
    /// The handler exited to top; the walk and every enclosing handler frame are abandoned.
    ExitToTop,
}

/// Who ended up handling a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Responder {
    Part(PartRef),
    Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled(Responder),
    /// Every level was visited and nobody kept the message. This is not an error.
    Unhandled,
    /// Some handler (possibly a nested one) exited to top.
    Exited,
}

impl DispatchOutcome {
    pub fn is_exited(self) -> bool {
        matches!(self, Self::Exited)
    }
}

/// What a handler may touch while it runs.
pub struct DispatchCx<'a> {
    pub stack: &'a mut StackModel,
    pub exec: &'a mut ExecutionContext,
}

impl<'a> DispatchCx<'a> {
    pub fn new(stack: &'a mut StackModel, exec: &'a mut ExecutionContext) -> Self {
        Self { stack, exec }
    }
}

/// The script execution environment, as seen by the dispatcher.
///
/// Implementations run the handler `part` has for `message` and report how it ended. A handler
/// that wants to send another message calls [`send`] recursively with the same `cx`.
pub trait ScriptHost {
    fn invoke(
        &mut self,
        cx: &mut DispatchCx<'_>,
        part: PartRef,
        message: &Message,
    ) -> Result<HandlerResult, Error>;

    /// Last stop of every message, after the stack.
    fn invoke_environment(
        &mut self,
        _cx: &mut DispatchCx<'_>,
        _message: &Message,
    ) -> Result<HandlerResult, Error> {
        Ok(HandlerResult::NotHandled)
    }
}

/// Host without any scripts: every message falls through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScripts;

impl ScriptHost for NoScripts {
    fn invoke(
        &mut self,
        _cx: &mut DispatchCx<'_>,
        _part: PartRef,
        _message: &Message,
    ) -> Result<HandlerResult, Error> {
        Ok(HandlerResult::NotHandled)
    }
}

type HandlerFn =
    Box<dyn FnMut(&mut DispatchCx<'_>, &Message) -> Result<HandlerResult, Error> + Send>;

/// Table-driven host: one closure per (part, message name).
#[derive(Default)]
pub struct HandlerTable {
    handlers: HashMap<(PartRef, SmolStr), HandlerFn>,
    environment: HashMap<SmolStr, HandlerFn>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &mut self,
        part: PartRef,
        message: &str,
        handler: impl FnMut(&mut DispatchCx<'_>, &Message) -> Result<HandlerResult, Error> + Send + 'static,
    ) -> &mut Self {
        self.handlers.insert((part, handler_key(message)), Box::new(handler));
        self
    }

    pub fn on_environment(
        &mut self,
        message: &str,
        handler: impl FnMut(&mut DispatchCx<'_>, &Message) -> Result<HandlerResult, Error> + Send + 'static,
    ) -> &mut Self {
        self.environment.insert(handler_key(message), Box::new(handler));
        self
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("handlers", &self.handlers.len())
            .field("environment", &self.environment.len())
            .finish()
    }
}

fn handler_key(message: &str) -> SmolStr {
    SmolStr::new(message.trim().to_ascii_lowercase())
}

impl ScriptHost for HandlerTable {
    fn invoke(
        &mut self,
        cx: &mut DispatchCx<'_>,
        part: PartRef,
        message: &Message,
    ) -> Result<HandlerResult, Error> {
        match self.handlers.get_mut(&(part, handler_key(message.name()))) {
            Some(handler) => handler(cx, message),
            None => Ok(HandlerResult::NotHandled),
        }
    }

    fn invoke_environment(
        &mut self,
        cx: &mut DispatchCx<'_>,
        message: &Message,
    ) -> Result<HandlerResult, Error> {
        match self.environment.get_mut(&handler_key(message.name())) {
            Some(handler) => handler(cx, message),
            None => Ok(HandlerResult::NotHandled),
        }
    }
}

enum Step {
    Continue,
    Stop(DispatchOutcome),
}

/// Delivers `message` to `target` and walks up its ancestors.
///
/// The chain is captured as identities before the first handler runs. A level whose part has
/// been deleted by an earlier handler is skipped, never dereferenced. Falling off the end of the
/// chain yields [`DispatchOutcome::Unhandled`].
pub fn send(
    cx: &mut DispatchCx<'_>,
    host: &mut dyn ScriptHost,
    target: PartRef,
    message: &Message,
) -> Result<DispatchOutcome, Error> {
    if cx.exec.is_exiting() {
        tracing::trace!(message = %message, "dispatch skipped, invocation is exiting");
        return Ok(DispatchOutcome::Exited);
    }

    let chain = cx.stack.message_chain(target);
    if chain.is_empty() {
        tracing::debug!(message = %message, %target, "dispatch target does not exist");
    }

    for part in chain {
        if !cx.stack.contains(part) {
            tracing::trace!(message = %message, %part, "skipping deleted ancestor");
            continue;
        }
        cx.exec.push_frame(message.name.clone(), part)?;
        let result = host.invoke(cx, part, message);
        cx.exec.pop_frame();
        if let Step::Stop(outcome) = settle(cx.exec, result?, Responder::Part(part), message) {
            return Ok(outcome);
        }
    }

    cx.exec.push_frame(message.name.clone(), target)?;
    let result = host.invoke_environment(cx, message);
    cx.exec.pop_frame();
    if let Step::Stop(outcome) = settle(cx.exec, result?, Responder::Environment, message) {
        return Ok(outcome);
    }

    tracing::trace!(message = %message, %target, "message fell through");
    Ok(DispatchOutcome::Unhandled)
}

fn settle(
    exec: &mut ExecutionContext,
    result: HandlerResult,
    responder: Responder,
    message: &Message,
) -> Step {
    match result {
        HandlerResult::ExitToTop => {
            exec.exit_to_top();
            tracing::debug!(message = %message, ?responder, "exit to top");
            Step::Stop(DispatchOutcome::Exited)
        }
        _ if exec.is_exiting() => Step::Stop(DispatchOutcome::Exited),
        HandlerResult::NotHandled => Step::Continue,
        HandlerResult::Passed => {
            exec.take_passed();
            tracing::trace!(message = %message, ?responder, "passed");
            Step::Continue
        }
        HandlerResult::Completed => Step::Stop(DispatchOutcome::Handled(responder)),
    }
}

/// Sends a message as a new top-level invocation.
pub fn send_top_level(
    stack: &mut StackModel,
    host: &mut dyn ScriptHost,
    target: PartRef,
    message: &Message,
    max_depth: usize,
) -> Result<DispatchOutcome, Error> {
    let mut exec = ExecutionContext::new(max_depth);
    let mut cx = DispatchCx::new(stack, &mut exec);
    send(&mut cx, host, target, message)
}

#[cfg(test)]
mod tests;
