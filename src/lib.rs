// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cardstack: the runtime core of a card-stack hypermedia document.
//!
//! A stack holds an ordered sequence of cards over a pool of shared backgrounds. Messages sent
//! to a part walk up card → background → stack → environment until a handler keeps them, and
//! navigation closes one card and opens another while a backstack records where the user has
//! been. Everything runs on a single dispatch thread, see [`coordinator`].

pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod manager;
pub mod model;
pub mod nav;
pub mod stack;

#[cfg(test)]
mod test_support;

pub use config::EngineConfig;
pub use coordinator::{Completion, Coordinator, CoordinatorError};
pub use dispatch::{DispatchOutcome, HandlerResult, Message, ScriptHost, SystemMessage};
pub use error::{ConstructionError, Error, Result, ScriptError, SemanticError};
pub use manager::StackManager;
pub use model::{CardId, Destination, PartRef, StackId, StackModel};
pub use nav::NavigationManager;
pub use stack::{Collaborators, StackController};
