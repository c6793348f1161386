// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Error taxonomy shared by every operation boundary.
//!
//! Semantic errors are user-correctable and leave state untouched. Construction errors mean the
//! model could not produce a valid current card; the operation that hit one cannot complete.
//! `pass` and `exit to top` are not errors at all, see [`crate::dispatch::HandlerResult`].

use smol_str::SmolStr;

use crate::coordinator::CoordinatorError;
use crate::model::{BackgroundId, CardId, Destination, PartRef, StackId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a delete request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRefusal {
    LastCard,
    CardCantDelete,
    BackgroundCantDelete,
}

impl std::fmt::Display for DeleteRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastCard => f.write_str("it is the only card in the stack"),
            Self::CardCantDelete => f.write_str("it is marked as \"Can't Delete\""),
            Self::BackgroundCantDelete => {
                f.write_str("it is the last card of a background marked as \"Can't Delete\"")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("this card cannot be deleted because {reason}")]
    CannotDeleteCard { reason: DeleteRefusal },
    #[error("a stack must keep at least one card")]
    LastCard,
    #[error("no card at position {index} (stack has {count} cards)")]
    CardIndexOutOfRange { index: usize, count: usize },
    #[error("no such card (id {0})")]
    NoSuchCard(CardId),
    #[error("no card named \"{0}\"")]
    NoSuchCardNamed(String),
    #[error("no such background (id {0})")]
    NoSuchBackground(BackgroundId),
    #[error("no such part ({0})")]
    NoSuchPart(PartRef),
    #[error("stack {0} is not open")]
    StackNotOpen(StackId),
    #[error("destination card id {} in stack {} no longer exists", .0.card_id(), .0.stack_id())]
    StaleDestination(Destination),
    #[error("cannot pass \"{found}\" while handling \"{expected}\"")]
    PassMismatch { expected: SmolStr, found: SmolStr },
    #[error("pass can only be used inside a message handler")]
    PassOutsideHandler,
    #[error("property \"{0}\" cannot be set")]
    ReadOnlyProperty(SmolStr),
    #[error("too much recursion (depth {depth})")]
    RecursionLimit { depth: usize },
    #[error("stack is not bound to a display")]
    NotBound,
    #[error("new card order must name every card exactly once")]
    InvalidCardOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("failed to create card: stack has no cards")]
    EmptyStack,
    #[error("failed to create card: no card at position {index} (stack has {count} cards)")]
    CardOutOfRange { index: usize, count: usize },
    #[error("failed to create card {card}: background {background} does not exist")]
    MissingBackground { card: CardId, background: BackgroundId },
    #[error("current card index {index} is invalid for {count} cards")]
    CurrentIndexInvalid { index: usize, count: usize },
}

/// Failure reported by the script execution environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ScriptError {
    message: String,
}

impl ScriptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

impl Error {
    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantic(_))
    }

    pub fn as_semantic(&self) -> Option<&SemanticError> {
        match self {
            Self::Semantic(err) => Some(err),
            _ => None,
        }
    }
}
