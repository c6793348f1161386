// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime controller of one open stack.
//!
//! A [`StackController`] owns the [`StackModel`], the single realized [`CardPart`], the
//! collaborators it was opened with and the observer registries UI code subscribes to. Every
//! structural edit of the card sequence goes through it so the realized card, the card count
//! channel and the current index never disagree.

use smol_str::SmolStr;

use crate::config::EngineConfig;
use crate::dispatch::{self, DispatchOutcome, Message, NoScripts, ScriptHost, SystemMessage};
use crate::error::{ConstructionError, DeleteRefusal, Error, SemanticError};
use crate::model::{
    names, BackgroundId, CardId, CardModel, ControlKind, Destination, Dimension, PartId, PartRef,
    PropertyChange, StackId, StackModel, Value,
};
use crate::nav::backstack::{self, SharedBackstack};
use crate::nav::NavigationManager;

pub mod card_part;
pub mod collab;
pub mod provider;

pub use card_part::CardPart;
pub use collab::{
    CurtainManager, DisplaySurface, Headless, NoTools, ToolCollaborator, VisualEffect,
};
pub use provider::{Observers, Provider, SubscriptionId};

/// Times an `openCard` round may move the current card elsewhere before the controller stops
/// delivering `openCard` and settles on whatever card is current.
const MAX_OPEN_RETRIES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Opened but not yet shown; no card is realized.
    Closed,
    /// Bound to a display with a realized current card.
    Bound,
    /// `closeCard` / `closeStack` are being delivered.
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEvent {
    Opened,
    NameChanged(String),
    DimensionChanged(Dimension),
    CardOrderChanged,
    /// A lifecycle message handler failed. The operation that sent it went on regardless.
    ScriptFailed { message: SmolStr, error: Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    CardClosed(CardId),
    CardOpened(CardId),
}

/// What a controller is given at construction instead of looking up global services.
pub struct Collaborators {
    pub host: Box<dyn ScriptHost + Send>,
    pub tools: Box<dyn ToolCollaborator>,
    /// Shared history; a private one is created when absent.
    pub backstack: Option<SharedBackstack>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self { host: Box::new(NoScripts), tools: Box::new(NoTools), backstack: None }
    }
}

impl Collaborators {
    pub fn with_host(mut self, host: impl ScriptHost + Send + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    pub fn with_tools(mut self, tools: impl ToolCollaborator + 'static) -> Self {
        self.tools = Box::new(tools);
        self
    }

    pub fn with_backstack(mut self, backstack: SharedBackstack) -> Self {
        self.backstack = Some(backstack);
        self
    }
}

pub struct StackController {
    stack_id: StackId,
    model: StackModel,
    lifecycle: Lifecycle,
    card: Option<CardPart>,
    navigation: NavigationManager,
    max_dispatch_depth: usize,
    backstack: SharedBackstack,
    host: Box<dyn ScriptHost + Send>,
    tools: Box<dyn ToolCollaborator>,
    display: Option<Box<dyn DisplaySurface>>,
    curtain: CurtainManager,
    card_count: Provider<usize>,
    clipboard: Provider<Option<CardModel>>,
    stack_observers: Observers<StackEvent>,
    navigation_observers: Observers<NavigationEvent>,
    property_observers: Observers<PropertyChange>,
}

impl std::fmt::Debug for StackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackController")
            .field("stack_id", &self.stack_id)
            .field("lifecycle", &self.lifecycle)
            .field("card", &self.card)
            .field("card_count", self.card_count.get())
            .finish_non_exhaustive()
    }
}

impl StackController {
    /// Takes ownership of `model` after checking its invariants.
    pub fn open(
        stack_id: StackId,
        mut model: StackModel,
        collaborators: Collaborators,
        config: &EngineConfig,
    ) -> Result<Self, ConstructionError> {
        model.validate()?;
        model.reconcile_counters();
        let Collaborators { host, tools, backstack } = collaborators;
        let backstack =
            backstack.unwrap_or_else(|| backstack::shared(config.backstack_capacity));

        tracing::info!(stack = %stack_id, name = %model.name(), cards = model.card_count(), "stack opened");
        Ok(Self {
            stack_id,
            card_count: Provider::new(model.card_count()),
            model,
            lifecycle: Lifecycle::Closed,
            card: None,
            navigation: NavigationManager::new(config.wrap_navigation),
            max_dispatch_depth: config.max_dispatch_depth,
            backstack,
            host,
            tools,
            display: None,
            curtain: CurtainManager::default(),
            clipboard: Provider::new(None),
            stack_observers: Observers::new(),
            navigation_observers: Observers::new(),
            property_observers: Observers::new(),
        })
    }

    pub fn stack_id(&self) -> StackId {
        self.stack_id
    }

    pub fn model(&self) -> &StackModel {
        &self.model
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_bound(&self) -> bool {
        self.lifecycle == Lifecycle::Bound
    }

    pub fn navigation(&self) -> NavigationManager {
        self.navigation
    }

    pub fn backstack(&self) -> &SharedBackstack {
        &self.backstack
    }

    pub fn curtain(&self) -> CurtainManager {
        self.curtain
    }

    /// The realized card, if the controller is bound.
    pub fn displayed_card(&self) -> Option<CardPart> {
        self.card
    }

    pub fn current_card_index(&self) -> usize {
        self.model.current_card_index()
    }

    pub fn current_card_id(&self) -> Result<CardId, Error> {
        self.ensure_bound()?;
        self.card.map(|card| card.id()).ok_or_else(|| SemanticError::NotBound.into())
    }

    pub fn current_destination(&self) -> Option<Destination> {
        self.card.map(|card| card.destination(self.stack_id))
    }

    pub fn card_count(&self) -> usize {
        *self.card_count.get()
    }

    pub fn clipboard(&self) -> Option<&CardModel> {
        self.clipboard.get().as_ref()
    }

    pub(crate) fn ensure_bound(&self) -> Result<(), SemanticError> {
        if self.lifecycle == Lifecycle::Bound {
            Ok(())
        } else {
            Err(SemanticError::NotBound)
        }
    }

    /// Shows the stack on `display` and activates its current card.
    ///
    /// Rebinding an already bound controller moves it to the new display and redisplays the
    /// current card without any lifecycle messages.
    pub fn bind_to_display(&mut self, display: Box<dyn DisplaySurface>) -> Result<CardId, Error> {
        match self.lifecycle {
            Lifecycle::Bound => {
                let display = self.display.insert(display);
                display.bind_model(&self.model);
                display.set_allow_resizing(self.model.is_resizable());
                self.show_current(None);
                return self.current_card_id();
            }
            Lifecycle::Closing => return Err(SemanticError::NotBound.into()),
            Lifecycle::Closed => {}
        }

        let display = self.display.insert(display);
        display.bind_model(&self.model);
        display.set_allow_resizing(self.model.is_resizable());
        self.lifecycle = Lifecycle::Bound;

        self.dispatch_lifecycle(PartRef::Stack, SystemMessage::OpenStack);
        let index = self.model.current_card_index();
        let card = match self.activate_card(index) {
            Ok(card) => card,
            Err(err) => {
                self.lifecycle = Lifecycle::Closed;
                self.display = None;
                return Err(err);
            }
        };

        self.stack_observers.notify(&StackEvent::Opened);
        self.stack_observers.notify(&StackEvent::DimensionChanged(self.model.dimension()));
        Ok(card)
    }

    /// Sends a message to a part of this stack as a new top-level invocation.
    ///
    /// Handlers may edit the card sequence; the realized card and the card count channel are
    /// brought back in line with the model before this returns.
    pub fn send_message(&mut self, target: PartRef, message: &Message) -> Result<DispatchOutcome, Error> {
        let outcome = self.deliver(target, message);
        self.resync_after_scripts()?;
        outcome
    }

    fn deliver(&mut self, target: PartRef, message: &Message) -> Result<DispatchOutcome, Error> {
        let outcome = dispatch::send_top_level(
            &mut self.model,
            self.host.as_mut(),
            target,
            message,
            self.max_dispatch_depth,
        );
        if *self.card_count.get() != self.model.card_count() {
            self.card_sequence_changed();
        }
        outcome
    }

    /// Whether the realized card still exists and sits at the current index.
    fn realized_card_is_current(&self) -> bool {
        self.card.is_some_and(|card| {
            self.model.index_of_card(card.id()) == Some(self.model.current_card_index())
        })
    }

    fn clamped_current_index(&self) -> usize {
        self.model.current_card_index().min(self.model.card_count().saturating_sub(1))
    }

    /// Reactivates the current card when handlers removed or moved the realized one.
    fn resync_after_scripts(&mut self) -> Result<(), Error> {
        let stale = self.card.is_some() && !self.realized_card_is_current();
        if self.lifecycle != Lifecycle::Bound || !stale {
            return Ok(());
        }
        tracing::debug!(stack = %self.stack_id, "realized card went stale under a handler");
        self.deactivate_card(false);
        self.activate_card(self.clamped_current_index()).map(drop)
    }

    fn dispatch_lifecycle(&mut self, target: PartRef, message: SystemMessage) {
        let message = Message::from(message);
        match self.deliver(target, &message) {
            Ok(outcome) => {
                tracing::trace!(stack = %self.stack_id, %target, message = %message, ?outcome, "lifecycle message delivered");
            }
            Err(error) => {
                tracing::warn!(stack = %self.stack_id, %target, message = %message, %error, "lifecycle message failed");
                self.stack_observers.notify(&StackEvent::ScriptFailed {
                    message: SmolStr::new(message.name()),
                    error,
                });
            }
        }
    }

    /// Closes the realized card, optionally recording it on the backstack first.
    pub(crate) fn deactivate_card(&mut self, push: bool) {
        let Some(card) = self.card.take() else {
            return;
        };
        self.tools.deactivate();
        self.tools.set_editing_background(false);
        if push {
            self.backstack.lock().push(card.destination(self.stack_id));
        }
        self.navigation_observers.notify(&NavigationEvent::CardClosed(card.id()));
        if self.model.contains(card.part_ref()) {
            self.dispatch_lifecycle(card.part_ref(), SystemMessage::CloseCard);
        }
        tracing::debug!(stack = %self.stack_id, card = %card.id(), push, "card closed");
    }

    /// Realizes the card at `index` and makes it current.
    ///
    /// An `openCard` handler that deletes or moves away from the card being opened makes the
    /// controller close it again and open the card that is now current instead.
    pub(crate) fn activate_card(&mut self, index: usize) -> Result<CardId, Error> {
        let mut card = self.realize(index)?;
        let mut retries = 0;
        loop {
            self.dispatch_lifecycle(card.part_ref(), SystemMessage::OpenCard);
            if self.realized_card_is_current() {
                break;
            }
            let index = self.clamped_current_index();
            if retries == MAX_OPEN_RETRIES {
                tracing::warn!(stack = %self.stack_id, index, "openCard handlers keep moving the current card");
                self.card = None;
                card = self.realize(index)?;
                break;
            }
            retries += 1;
            tracing::debug!(stack = %self.stack_id, card = %card.id(), index, "openCard handler moved the current card");
            self.deactivate_card(false);
            card = self.realize(self.clamped_current_index())?;
        }

        self.navigation_observers.notify(&NavigationEvent::CardOpened(card.id()));
        self.show_current(None);
        self.tools.reactivate(card.id());
        tracing::debug!(stack = %self.stack_id, card = %card.id(), index = self.model.current_card_index(), "card opened");
        Ok(card.id())
    }

    fn realize(&mut self, index: usize) -> Result<CardPart, Error> {
        let card = CardPart::load(&self.model, index)?;
        self.model.set_current_card_index(index)?;
        self.card = Some(card);
        Ok(card)
    }

    fn show_current(&mut self, effect: Option<&VisualEffect>) {
        if self.curtain.is_locked() {
            return;
        }
        if let (Some(display), Some(card)) = (self.display.as_mut(), self.card) {
            display.display_card(&self.model, card.id(), effect);
        }
    }

    pub fn go_card(&mut self, index: usize, push: bool) -> Result<CardId, Error> {
        let nav = self.navigation;
        nav.go_card(self, index, push)
    }

    pub fn go_next(&mut self, push: bool) -> Result<CardId, Error> {
        let nav = self.navigation;
        nav.go_next(self, push)
    }

    pub fn go_previous(&mut self, push: bool) -> Result<CardId, Error> {
        let nav = self.navigation;
        nav.go_previous(self, push)
    }

    pub fn go_first(&mut self, push: bool) -> Result<CardId, Error> {
        let nav = self.navigation;
        nav.go_first(self, push)
    }

    pub fn go_last(&mut self, push: bool) -> Result<CardId, Error> {
        let nav = self.navigation;
        nav.go_last(self, push)
    }

    pub fn go_card_id(&mut self, card: CardId, push: bool) -> Result<CardId, Error> {
        let nav = self.navigation;
        nav.go_card_id(self, card, push)
    }

    pub fn go_card_named(&mut self, name: &str, push: bool) -> Result<CardId, Error> {
        let nav = self.navigation;
        nav.go_card_named(self, name, push)
    }

    fn card_sequence_changed(&mut self) {
        self.card_count.set(self.model.card_count());
        self.stack_observers.notify(&StackEvent::CardOrderChanged);
    }

    fn current_background(&self) -> Result<BackgroundId, Error> {
        self.ensure_bound()?;
        self.card.map(|card| card.background_id()).ok_or_else(|| SemanticError::NotBound.into())
    }

    /// Inserts an empty card sharing the current background after the current card and goes
    /// to it. The backstack is not touched.
    pub fn new_card(&mut self) -> Result<CardId, Error> {
        let background = self.current_background()?;
        self.tools.set_editing_background(false);

        let (index, card) = self.model.new_card(background)?;
        self.card_sequence_changed();
        self.go_card(index, false)?;
        self.dispatch_lifecycle(PartRef::Card(card), SystemMessage::NewCard);
        self.resync_after_scripts()?;
        Ok(card)
    }

    /// Like [`StackController::new_card`], but the new card gets a fresh background.
    pub fn new_background(&mut self) -> Result<CardId, Error> {
        self.ensure_bound()?;
        self.tools.set_editing_background(false);

        let (index, card) = self.model.new_card_with_new_background();
        self.card_sequence_changed();
        self.go_card(index, false)?;
        self.dispatch_lifecycle(PartRef::Card(card), SystemMessage::NewBackground);
        self.resync_after_scripts()?;
        if self.model.contains(PartRef::Card(card)) {
            self.dispatch_lifecycle(PartRef::Card(card), SystemMessage::NewCard);
            self.resync_after_scripts()?;
        }
        Ok(card)
    }

    /// Checks whether the current card may be deleted, without changing anything.
    pub fn can_delete_card(&self) -> Result<(), DeleteRefusal> {
        let Some(card) = self.model.current_card() else {
            return Err(DeleteRefusal::LastCard);
        };
        if self.model.card_count() <= 1 {
            return Err(DeleteRefusal::LastCard);
        }
        if card.cant_delete() {
            return Err(DeleteRefusal::CardCantDelete);
        }
        let background = card.background_id();
        let shared = self.model.cards_in_background(background).nth(1).is_some();
        let background_locked =
            self.model.background(background).is_some_and(|bg| bg.cant_delete());
        if !shared && background_locked {
            return Err(DeleteRefusal::BackgroundCantDelete);
        }
        Ok(())
    }

    /// Deletes the current card and activates the one before it (or the new first card).
    ///
    /// Refusals are reported before anything is touched.
    pub fn delete_card(&mut self) -> Result<CardId, Error> {
        let card = self.current_card_id()?;
        if let Err(reason) = self.can_delete_card() {
            tracing::warn!(stack = %self.stack_id, %card, %reason, "card delete refused");
            return Err(SemanticError::CannotDeleteCard { reason }.into());
        }
        self.tools.set_editing_background(false);

        self.dispatch_lifecycle(PartRef::Card(card), SystemMessage::DeleteCard);
        self.deactivate_card(false);

        let mut index = self.model.current_card_index();
        if let Some(position) = self.model.index_of_card(card) {
            if let Err(err) = self.model.remove_card(position) {
                // A handler shrank the stack to this one card; keep it.
                self.activate_card(position)?;
                return Err(err.into());
            }
            index = position;
        }
        self.card_sequence_changed();

        let target = index.saturating_sub(1).min(self.model.card_count().saturating_sub(1));
        tracing::debug!(stack = %self.stack_id, %card, "card deleted");
        self.activate_card(target)?;
        Ok(card)
    }

    /// Copies the current card into the clipboard, then deletes it.
    ///
    /// A card that cannot be deleted is not copied either.
    pub fn cut_card(&mut self) -> Result<CardId, Error> {
        let card = self.current_card_id()?;
        if let Err(reason) = self.can_delete_card() {
            tracing::warn!(stack = %self.stack_id, %card, %reason, "card cut refused");
            return Err(SemanticError::CannotDeleteCard { reason }.into());
        }
        self.copy_card()?;
        self.delete_card()
    }

    /// Replaces the clipboard with a snapshot of the current card.
    pub fn copy_card(&mut self) -> Result<CardId, Error> {
        let card = self.current_card_id()?;
        let snapshot = self.model.card_by_id(card).cloned().ok_or(SemanticError::NoSuchCard(card))?;
        self.clipboard.set(Some(snapshot));
        Ok(card)
    }

    /// Inserts a deep copy of the clipboard card after the current card and goes to it.
    ///
    /// The copy always gets a new card id. Returns `Ok(None)` when the clipboard is empty.
    pub fn paste_card(&mut self) -> Result<Option<CardId>, Error> {
        self.ensure_bound()?;
        let Some(source) = self.clipboard.get().clone() else {
            return Ok(None);
        };
        let current_background = self.current_background()?;
        self.tools.set_editing_background(false);

        let id = self.model.next_card_id();
        let mut card = source.copy_with_id(id, self.model.part_ids_mut());
        if self.model.background(card.background_id()).is_none() {
            card.relink_background(current_background);
        }
        let index = self.model.insert_card(card)?;
        self.card_sequence_changed();
        self.go_card(index, false)?;
        self.dispatch_lifecycle(PartRef::Card(id), SystemMessage::NewCard);
        self.resync_after_scripts()?;
        Ok(Some(id))
    }

    /// Discards the realized card and re-navigates to `index`.
    ///
    /// Required after any edit of the card sequence that did not go through the structural
    /// operations of this controller.
    pub fn invalidate_cache(&mut self, index: usize) -> Result<CardId, Error> {
        self.ensure_bound()?;
        let count = self.model.card_count();
        if index >= count {
            return Err(SemanticError::CardIndexOutOfRange { index, count }.into());
        }
        self.deactivate_card(false);
        self.card_sequence_changed();
        self.activate_card(index.min(self.model.card_count().saturating_sub(1)))
    }

    /// Runs an arbitrary edit on a copy of the model, then swaps it in and resynchronizes the
    /// realized card.
    ///
    /// An edit that leaves the model invalid is discarded with a [`ConstructionError`] and the
    /// controller keeps its current card. The current card is kept when it survives the edit;
    /// otherwise the card now at the old current position is activated.
    pub fn bulk_edit<R>(&mut self, edit: impl FnOnce(&mut StackModel) -> R) -> Result<R, Error> {
        self.ensure_bound()?;
        let mut edited = self.model.clone();
        let result = edit(&mut edited);
        if let Err(err) = edited.validate() {
            tracing::warn!(stack = %self.stack_id, error = %err, "bulk edit discarded");
            return Err(err.into());
        }
        edited.reconcile_counters();
        self.model = edited;

        let before = self.card.map(|card| card.id());
        let index = before
            .and_then(|card| self.model.index_of_card(card))
            .unwrap_or_else(|| self.clamped_current_index());
        self.invalidate_cache(index)?;
        Ok(result)
    }

    pub fn sort_cards_by_key<K: Ord>(
        &mut self,
        key: impl FnMut(&CardModel) -> K,
    ) -> Result<(), Error> {
        self.bulk_edit(|model| model.sort_cards_by_key(key))
    }

    pub fn reorder_cards(&mut self, order: &[CardId]) -> Result<(), Error> {
        self.ensure_bound()?;
        self.model.check_card_order(order)?;
        self.bulk_edit(|model| model.reorder_cards(order))?.map_err(Error::from)
    }

    pub fn add_control(&mut self, container: PartRef, kind: ControlKind) -> Result<PartId, Error> {
        Ok(self.model.add_control(container, kind)?)
    }

    pub fn property(&self, part: PartRef, name: &str) -> Option<Value> {
        self.model.property(part, name)
    }

    /// Sets a property and reacts to stack-level changes (name, size, resizability).
    pub fn set_property(
        &mut self,
        part: PartRef,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<PropertyChange>, Error> {
        let change = self.model.set_property(part, name, value)?;
        let Some(change) = change else {
            return Ok(None);
        };
        self.property_observers.notify(&change);
        if part == PartRef::Stack {
            self.on_stack_property_changed(&change)?;
        }
        Ok(Some(change))
    }

    fn on_stack_property_changed(&mut self, change: &PropertyChange) -> Result<(), Error> {
        match change.name.as_str() {
            names::NAME => {
                self.stack_observers.notify(&StackEvent::NameChanged(change.new_value.to_string()));
            }
            names::WIDTH | names::HEIGHT => {
                self.stack_observers.notify(&StackEvent::DimensionChanged(self.model.dimension()));
                if self.is_bound() {
                    let index = self.model.current_card_index();
                    self.deactivate_card(false);
                    self.activate_card(index)?;
                }
            }
            names::RESIZABLE => {
                if let Some(display) = self.display.as_mut() {
                    display.set_allow_resizing(change.new_value.as_bool());
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn lock_screen(&mut self) {
        self.curtain.lock_screen();
    }

    /// Unlocks the screen and shows the current card with `effect`.
    pub fn unlock_screen(&mut self, effect: Option<VisualEffect>) {
        if self.curtain.unlock_screen() {
            self.show_current(effect.as_ref());
        }
    }

    pub fn subscribe_card_count(&mut self, callback: impl FnMut(&usize) + Send + 'static) -> SubscriptionId {
        self.card_count.subscribe(callback)
    }

    pub fn unsubscribe_card_count(&mut self, id: SubscriptionId) -> bool {
        self.card_count.unsubscribe(id)
    }

    pub fn subscribe_clipboard(
        &mut self,
        callback: impl FnMut(&Option<CardModel>) + Send + 'static,
    ) -> SubscriptionId {
        self.clipboard.subscribe(callback)
    }

    pub fn unsubscribe_clipboard(&mut self, id: SubscriptionId) -> bool {
        self.clipboard.unsubscribe(id)
    }

    pub fn add_observer(&mut self, callback: impl FnMut(&StackEvent) + Send + 'static) -> SubscriptionId {
        self.stack_observers.subscribe(callback)
    }

    pub fn remove_observer(&mut self, id: SubscriptionId) -> bool {
        self.stack_observers.unsubscribe(id)
    }

    pub fn add_navigation_observer(
        &mut self,
        callback: impl FnMut(&NavigationEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.navigation_observers.subscribe(callback)
    }

    pub fn remove_navigation_observer(&mut self, id: SubscriptionId) -> bool {
        self.navigation_observers.unsubscribe(id)
    }

    pub fn add_property_observer(
        &mut self,
        callback: impl FnMut(&PropertyChange) + Send + 'static,
    ) -> SubscriptionId {
        self.property_observers.subscribe(callback)
    }

    pub fn remove_property_observer(&mut self, id: SubscriptionId) -> bool {
        self.property_observers.unsubscribe(id)
    }

    /// Closes the current card, delivers `closeStack` and hands the model back.
    pub fn close(mut self) -> StackModel {
        if self.lifecycle == Lifecycle::Bound {
            self.lifecycle = Lifecycle::Closing;
            self.deactivate_card(false);
            self.dispatch_lifecycle(PartRef::Stack, SystemMessage::CloseStack);
        }
        self.lifecycle = Lifecycle::Closed;
        tracing::info!(stack = %self.stack_id, "stack closed");
        self.model
    }
}
