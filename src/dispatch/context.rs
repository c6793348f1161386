// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use crate::error::SemanticError;
use crate::model::PartRef;

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// One handler invocation in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFrame {
    pub message: SmolStr,
    pub part: PartRef,
}

/// State of one synchronous invocation, shared by every handler frame it nests.
///
/// A fresh context is created for each top-level operation. Once [`ExecutionContext::exit_to_top`]
/// has been called the context stays in the exiting state, and every dispatch that sees it
/// returns without running another handler.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    frames: Vec<HandlerFrame>,
    passed_message: Option<SmolStr>,
    exiting: bool,
    max_depth: usize,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl ExecutionContext {
    pub fn new(max_depth: usize) -> Self {
        Self { frames: Vec::new(), passed_message: None, exiting: false, max_depth }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn current_frame(&self) -> Option<&HandlerFrame> {
        self.frames.last()
    }

    /// Name of the message whose handler is running, if any.
    pub fn current_message(&self) -> Option<&str> {
        self.frames.last().map(|frame| frame.message.as_str())
    }

    /// The part whose handler is running (the "me" of the handler).
    pub fn current_part(&self) -> Option<PartRef> {
        self.frames.last().map(|frame| frame.part)
    }

    pub fn passed_message(&self) -> Option<&str> {
        self.passed_message.as_deref()
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    /// Records that the running handler passes `message` to the next ancestor.
    ///
    /// Only the message currently being handled may be passed (names compare case-insensitively).
    /// The caller should return [`HandlerResult::Passed`](super::HandlerResult::Passed) right after.
    pub fn pass(&mut self, message: &str) -> Result<super::HandlerResult, SemanticError> {
        let Some(frame) = self.frames.last() else {
            return Err(SemanticError::PassOutsideHandler);
        };
        if !frame.message.eq_ignore_ascii_case(message.trim()) {
            return Err(SemanticError::PassMismatch {
                expected: frame.message.clone(),
                found: SmolStr::new(message.trim()),
            });
        }
        self.passed_message = Some(frame.message.clone());
        Ok(super::HandlerResult::Passed)
    }

    /// Marks the whole invocation as aborted.
    pub fn exit_to_top(&mut self) -> super::HandlerResult {
        self.exiting = true;
        super::HandlerResult::ExitToTop
    }

    pub(crate) fn push_frame(&mut self, message: SmolStr, part: PartRef) -> Result<(), SemanticError> {
        if self.frames.len() >= self.max_depth {
            return Err(SemanticError::RecursionLimit { depth: self.frames.len() });
        }
        self.frames.push(HandlerFrame { message, part });
        Ok(())
    }

    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub(crate) fn take_passed(&mut self) -> Option<SmolStr> {
        self.passed_message.take()
    }
}
