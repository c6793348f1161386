// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic stacks shared by the benches.

use cardstack::dispatch::{HandlerResult, HandlerTable};
use cardstack::model::{ControlKind, Dimension, PartId, PartRef, StackModel};
use cardstack::stack::Headless;
use cardstack::{Collaborators, EngineConfig, StackController, StackId};

/// `cards` cards spread over `cards / per_background` backgrounds, current card first.
pub fn stack(cards: usize, per_background: usize) -> StackModel {
    let mut stack = StackModel::new_stack("Bench", Dimension::new(640, 480));
    let mut background = stack.card(0).expect("first card").background_id();
    for index in 1..cards {
        stack.set_current_card_index(index - 1).expect("index");
        if index % per_background.max(1) == 0 {
            let (_, card) = stack.new_card_with_new_background();
            background = stack.card_by_id(card).expect("card").background_id();
        } else {
            stack.new_card(background).expect("new card");
        }
    }
    stack.set_current_card_index(0).expect("index");
    stack
}

/// The first card with one button, and the button's id.
pub fn stack_with_button() -> (StackModel, PartId) {
    let mut stack = stack(4, 2);
    let card = PartRef::Card(stack.card(0).expect("card").id());
    let button = stack.add_control(card, ControlKind::Button).expect("button");
    (stack, button)
}

/// Handlers on every level of the first card's chain: each one but the stack passes.
pub fn passing_table(stack: &StackModel, message: &'static str) -> HandlerTable {
    let card = stack.card(0).expect("card");
    let mut table = HandlerTable::new();
    table
        .on(PartRef::Card(card.id()), message, move |cx, _| Ok(cx.exec.pass(message)?))
        .on(PartRef::Background(card.background_id()), message, move |cx, _| {
            Ok(cx.exec.pass(message)?)
        })
        .on(PartRef::Stack, message, |_, _| Ok(HandlerResult::Completed));
    table
}

pub fn bound(model: StackModel, collaborators: Collaborators) -> StackController {
    let mut controller =
        StackController::open(StackId::new(1), model, collaborators, &EngineConfig::default())
            .expect("open");
    controller.bind_to_display(Box::new(Headless)).expect("bind");
    controller
}
