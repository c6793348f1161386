// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Turns logical moves (next, previous, by position, id or name) into card activations.

use crate::error::{Error, SemanticError};
use crate::model::CardId;
use crate::stack::StackController;

pub mod backstack;

pub use backstack::{Backstack, SharedBackstack};

/// Navigation policy of one controller.
///
/// Every move resolves its target against the model first; a move that cannot be resolved
/// fails before the current card is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationManager {
    wrap: bool,
}

impl Default for NavigationManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NavigationManager {
    pub fn new(wrap: bool) -> Self {
        Self { wrap }
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    /// Closes the current card (pushing it on the backstack when `push` is set) and opens the
    /// card at `index`.
    pub fn go_card(
        self,
        controller: &mut StackController,
        index: usize,
        push: bool,
    ) -> Result<CardId, Error> {
        controller.ensure_bound()?;
        let count = controller.model().card_count();
        if index >= count {
            return Err(SemanticError::CardIndexOutOfRange { index, count }.into());
        }

        controller.deactivate_card(push);
        // closeCard handlers may have shortened the stack.
        let index = index.min(controller.model().card_count().saturating_sub(1));
        controller.activate_card(index)
    }

    /// At the last card this wraps to the first, or stays put when wrapping is off.
    pub fn go_next(self, controller: &mut StackController, push: bool) -> Result<CardId, Error> {
        controller.ensure_bound()?;
        let count = controller.model().card_count();
        let current = controller.model().current_card_index();
        let target = if current + 1 < count {
            current + 1
        } else if self.wrap {
            0
        } else {
            tracing::debug!("already at the last card");
            return controller.current_card_id();
        };
        self.go_card(controller, target, push)
    }

    /// At the first card this wraps to the last, or stays put when wrapping is off.
    pub fn go_previous(
        self,
        controller: &mut StackController,
        push: bool,
    ) -> Result<CardId, Error> {
        controller.ensure_bound()?;
        let count = controller.model().card_count();
        let current = controller.model().current_card_index();
        let target = if current > 0 {
            current - 1
        } else if self.wrap {
            count - 1
        } else {
            tracing::debug!("already at the first card");
            return controller.current_card_id();
        };
        self.go_card(controller, target, push)
    }

    pub fn go_first(self, controller: &mut StackController, push: bool) -> Result<CardId, Error> {
        self.go_card(controller, 0, push)
    }

    pub fn go_last(self, controller: &mut StackController, push: bool) -> Result<CardId, Error> {
        let last = controller.model().card_count().saturating_sub(1);
        self.go_card(controller, last, push)
    }

    pub fn go_card_id(
        self,
        controller: &mut StackController,
        card: CardId,
        push: bool,
    ) -> Result<CardId, Error> {
        let index = controller.model().index_of_card(card).ok_or(SemanticError::NoSuchCard(card))?;
        self.go_card(controller, index, push)
    }

    pub fn go_card_named(
        self,
        controller: &mut StackController,
        name: &str,
        push: bool,
    ) -> Result<CardId, Error> {
        let index = controller
            .model()
            .index_of_card_named(name)
            .ok_or_else(|| SemanticError::NoSuchCardNamed(name.to_owned()))?;
        self.go_card(controller, index, push)
    }
}
