// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Recording collaborators shared by the unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::dispatch::{DispatchCx, HandlerResult, HandlerTable, Message, ScriptHost};
use crate::error::Error;
use crate::model::{CardId, PartRef, StackId, StackModel};
use crate::stack::{Collaborators, DisplaySurface, StackController, ToolCollaborator, VisualEffect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    BindModel,
    AllowResizing(bool),
    Display(CardId, Option<String>),
    ToolsDeactivated,
    ToolsReactivated(CardId),
    EditingBackground(bool),
    Message(String, PartRef),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<Call>>>);

impl Journal {
    pub(crate) fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub(crate) fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.lock())
    }

    /// Message names delivered to parts, in order, draining the journal.
    pub(crate) fn take_messages(&self) -> Vec<(String, PartRef)> {
        self.take()
            .into_iter()
            .filter_map(|call| match call {
                Call::Message(name, part) => Some((name, part)),
                _ => None,
            })
            .collect()
    }

    /// Like [`Journal::take_messages`] but keeps only the part each message was sent to.
    pub(crate) fn take_targets(&self) -> Vec<(String, PartRef)> {
        let mut targets: Vec<(String, PartRef)> = Vec::new();
        for (name, part) in self.take_messages() {
            if targets.last().map_or(true, |(last, _)| *last != name) {
                targets.push((name, part));
            }
        }
        targets
    }

    pub(crate) fn displayed(&self) -> Vec<CardId> {
        self.0
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Display(card, _) => Some(*card),
                _ => None,
            })
            .collect()
    }
}

pub(crate) struct RecordingDisplay(pub(crate) Journal);

impl DisplaySurface for RecordingDisplay {
    fn bind_model(&mut self, _stack: &StackModel) {
        self.0.push(Call::BindModel);
    }

    fn set_allow_resizing(&mut self, allow: bool) {
        self.0.push(Call::AllowResizing(allow));
    }

    fn display_card(&mut self, _stack: &StackModel, card: CardId, effect: Option<&VisualEffect>) {
        self.0.push(Call::Display(card, effect.map(|effect| effect.name().to_owned())));
    }
}

pub(crate) struct RecordingTools(pub(crate) Journal);

impl ToolCollaborator for RecordingTools {
    fn deactivate(&mut self) {
        self.0.push(Call::ToolsDeactivated);
    }

    fn reactivate(&mut self, card: CardId) {
        self.0.push(Call::ToolsReactivated(card));
    }

    fn set_editing_background(&mut self, editing: bool) {
        self.0.push(Call::EditingBackground(editing));
    }
}

/// Journals every part a message visits, then lets `table` decide.
pub(crate) struct RecordingHost {
    pub(crate) journal: Journal,
    pub(crate) table: HandlerTable,
}

impl ScriptHost for RecordingHost {
    fn invoke(
        &mut self,
        cx: &mut DispatchCx<'_>,
        part: PartRef,
        message: &Message,
    ) -> Result<HandlerResult, Error> {
        self.journal.push(Call::Message(message.name().to_owned(), part));
        self.table.invoke(cx, part, message)
    }

    fn invoke_environment(
        &mut self,
        cx: &mut DispatchCx<'_>,
        message: &Message,
    ) -> Result<HandlerResult, Error> {
        self.table.invoke_environment(cx, message)
    }
}

pub(crate) struct Bound {
    pub(crate) controller: StackController,
    pub(crate) journal: Journal,
}

/// Opens and binds `model` with recording collaborators, then clears the journal.
pub(crate) fn bind_with(model: StackModel, config: &EngineConfig, table: HandlerTable) -> Bound {
    let journal = Journal::default();
    let collaborators = Collaborators::default()
        .with_host(RecordingHost { journal: journal.clone(), table })
        .with_tools(RecordingTools(journal.clone()));
    let mut controller =
        StackController::open(StackId::new(1), model, collaborators, config).expect("open");
    controller.bind_to_display(Box::new(RecordingDisplay(journal.clone()))).expect("bind");
    journal.take();
    Bound { controller, journal }
}

pub(crate) fn bind(model: StackModel) -> Bound {
    bind_with(model, &EngineConfig::default(), HandlerTable::new())
}
