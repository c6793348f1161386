// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Registry of open stacks and owner of the shared backstack.

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::error::{Error, SemanticError};
use crate::model::ids::StackIdTag;
use crate::model::{CardId, Destination, IdSequence, PartRef, StackId, StackModel};
use crate::nav::backstack::{self, SharedBackstack};
use crate::stack::{Collaborators, StackController};

pub struct StackManager {
    config: EngineConfig,
    backstack: SharedBackstack,
    stacks: BTreeMap<StackId, StackController>,
    stack_ids: IdSequence<StackIdTag>,
}

impl std::fmt::Debug for StackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackManager")
            .field("open", &self.stacks.keys().collect::<Vec<_>>())
            .field("backstack", &self.backstack.lock().len())
            .finish()
    }
}

impl Default for StackManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl StackManager {
    pub fn new(config: EngineConfig) -> Self {
        let backstack = backstack::shared(config.backstack_capacity);
        Self { config, backstack, stacks: BTreeMap::new(), stack_ids: IdSequence::starting_at(1) }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn backstack(&self) -> &SharedBackstack {
        &self.backstack
    }

    /// Opens `model` under a fresh stack id. The controller shares this manager's backstack.
    pub fn open_stack(
        &mut self,
        model: StackModel,
        collaborators: Collaborators,
    ) -> Result<StackId, Error> {
        let id = self.stack_ids.allocate();
        let collaborators = collaborators.with_backstack(self.backstack.clone());
        let controller = StackController::open(id, model, collaborators, &self.config)?;
        self.stacks.insert(id, controller);
        Ok(id)
    }

    /// Creates and opens a one-card stack sized and named from the configuration.
    pub fn new_stack(
        &mut self,
        name: Option<&str>,
        collaborators: Collaborators,
    ) -> Result<StackId, Error> {
        let name = name.unwrap_or(&self.config.default_stack_name);
        let model = StackModel::new_stack(name, self.config.default_dimension());
        self.open_stack(model, collaborators)
    }

    pub fn is_open(&self, id: StackId) -> bool {
        self.stacks.contains_key(&id)
    }

    pub fn open_stacks(&self) -> impl Iterator<Item = StackId> + '_ {
        self.stacks.keys().copied()
    }

    pub fn stack(&self, id: StackId) -> Result<&StackController, SemanticError> {
        self.stacks.get(&id).ok_or(SemanticError::StackNotOpen(id))
    }

    pub fn stack_mut(&mut self, id: StackId) -> Result<&mut StackController, SemanticError> {
        self.stacks.get_mut(&id).ok_or(SemanticError::StackNotOpen(id))
    }

    /// Closes the stack and returns its model. Backstack entries that name it become stale.
    pub fn close_stack(&mut self, id: StackId) -> Result<StackModel, Error> {
        let controller = self.stacks.remove(&id).ok_or(SemanticError::StackNotOpen(id))?;
        Ok(controller.close())
    }

    pub fn destination_of(&self, stack_id: StackId, part: PartRef) -> Option<Destination> {
        let controller = self.stacks.get(&stack_id)?;
        Destination::from_part(stack_id, controller.model(), part)
    }

    /// Finds the position a destination currently refers to.
    pub fn resolve(&self, destination: Destination) -> Result<usize, SemanticError> {
        let controller = self.stack(destination.stack_id())?;
        controller
            .model()
            .index_of_card(destination.card_id())
            .ok_or(SemanticError::StaleDestination(destination))
    }

    pub fn go_destination(&mut self, destination: Destination, push: bool) -> Result<CardId, Error> {
        let index = self.resolve(destination)?;
        let controller = self.stack_mut(destination.stack_id())?;
        tracing::debug!(%destination, index, push, "going to destination");
        controller.go_card(index, push)
    }

    /// Pops the most recent destination and goes there without pushing.
    ///
    /// Returns `Ok(None)` when the backstack is empty. A stale entry is still consumed.
    pub fn go_back(&mut self) -> Result<Option<CardId>, Error> {
        let Some(destination) = self.backstack.lock().pop() else {
            return Ok(None);
        };
        match self.go_destination(destination, false) {
            Ok(card) => Ok(Some(card)),
            Err(err) => {
                tracing::warn!(%destination, error = %err, "cannot go back");
                Err(err)
            }
        }
    }
}
