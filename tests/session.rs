// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use parking_lot::Mutex;

use cardstack::dispatch::{HandlerResult, HandlerTable};
use cardstack::model::{Dimension, PartRef, StackModel};
use cardstack::stack::Headless;
use cardstack::{
    CardId, Collaborators, Coordinator, Destination, EngineConfig, Error, SemanticError,
    StackId, StackManager,
};

fn stack_of(name: &str, cards: usize) -> StackModel {
    let mut stack = StackModel::new_stack(name, Dimension::new(512, 342));
    let background = stack.card(0).expect("first card").background_id();
    for _ in 1..cards {
        stack.new_card(background).expect("new card");
        let last = stack.card_count() - 1;
        stack.set_current_card_index(last).expect("index");
    }
    stack.set_current_card_index(0).expect("index");
    stack
}

fn open_bound(manager: &mut StackManager, model: StackModel, collaborators: Collaborators) -> StackId {
    let id = manager.open_stack(model, collaborators).expect("open");
    manager.stack_mut(id).expect("stack").bind_to_display(Box::new(Headless)).expect("bind");
    id
}

fn card_ids(manager: &StackManager, id: StackId) -> Vec<CardId> {
    manager.stack(id).expect("stack").model().cards().iter().map(|card| card.id()).collect()
}

#[test]
fn backstack_is_shared_between_open_stacks() {
    let mut manager = StackManager::default();
    let home = open_bound(&mut manager, stack_of("Home", 3), Collaborators::default());
    let notes = open_bound(&mut manager, stack_of("Notes", 2), Collaborators::default());
    let home_cards = card_ids(&manager, home);
    let notes_cards = card_ids(&manager, notes);

    let controller = manager.stack_mut(home).expect("home");
    controller.go_next(true).expect("next");
    controller.go_next(true).expect("next");
    manager.stack_mut(notes).expect("notes").go_last(true).expect("last");

    assert_eq!(manager.backstack().lock().len(), 3);

    assert_eq!(manager.go_back().expect("back"), Some(notes_cards[0]));
    assert_eq!(manager.go_back().expect("back"), Some(home_cards[1]));
    assert_eq!(manager.go_back().expect("back"), Some(home_cards[0]));
    assert_eq!(manager.go_back().expect("back"), None);

    assert_eq!(manager.stack(home).expect("home").current_card_index(), 0);
    assert_eq!(manager.stack(notes).expect("notes").current_card_index(), 0);
}

#[test]
fn entries_for_a_closed_stack_are_consumed_as_errors() {
    let mut manager = StackManager::default();
    let home = open_bound(&mut manager, stack_of("Home", 2), Collaborators::default());
    let notes = open_bound(&mut manager, stack_of("Notes", 2), Collaborators::default());

    manager.stack_mut(home).expect("home").go_next(true).expect("next");
    manager.stack_mut(notes).expect("notes").go_next(true).expect("next");
    manager.close_stack(notes).expect("close");

    let err = manager.go_back().expect_err("stack is gone");
    assert_eq!(err, Error::Semantic(SemanticError::StackNotOpen(notes)));
    assert_eq!(manager.backstack().lock().len(), 1);

    let home_cards = card_ids(&manager, home);
    assert_eq!(manager.go_back().expect("back"), Some(home_cards[0]));
}

#[test]
fn destinations_follow_cards_through_reordering_and_go_stale_on_delete() {
    let mut manager = StackManager::default();
    let home = open_bound(&mut manager, stack_of("Home", 3), Collaborators::default());
    let cards = card_ids(&manager, home);

    let destination =
        manager.destination_of(home, PartRef::Card(cards[2])).expect("card has a destination");
    assert_eq!(manager.resolve(destination), Ok(2));

    let reversed: Vec<CardId> = cards.iter().rev().copied().collect();
    manager.stack_mut(home).expect("home").reorder_cards(&reversed).expect("reorder");
    assert_eq!(manager.resolve(destination), Ok(0));

    assert_eq!(manager.go_destination(destination, false).expect("go"), cards[2]);
    manager.stack_mut(home).expect("home").delete_card().expect("delete");
    assert_eq!(manager.resolve(destination), Err(SemanticError::StaleDestination(destination)));
}

#[test]
fn backgrounds_and_the_stack_resolve_to_cards() {
    let mut manager = StackManager::default();
    let home = open_bound(&mut manager, stack_of("Home", 3), Collaborators::default());
    let cards = card_ids(&manager, home);
    manager.stack_mut(home).expect("home").go_last(false).expect("last");

    let model = manager.stack(home).expect("home").model();
    let background = model.card(2).expect("card").background_id();

    assert_eq!(
        manager.destination_of(home, PartRef::Background(background)),
        Some(Destination::new(home, cards[0]))
    );
    assert_eq!(manager.destination_of(home, PartRef::Stack), Some(Destination::new(home, cards[2])));
}

#[test]
fn handlers_see_lifecycle_messages_of_every_stack() {
    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    let mut manager = StackManager::default();

    for name in ["Home", "Notes"] {
        let mut table = HandlerTable::new();
        for message in ["openStack", "openCard", "closeCard", "closeStack"] {
            let log = Arc::clone(&log);
            table.on(PartRef::Stack, message, move |cx, msg| {
                log.lock().push(format!("{}:{}", cx.stack.name(), msg.name()));
                Ok(HandlerResult::Completed)
            });
        }
        open_bound(&mut manager, stack_of(name, 2), Collaborators::default().with_host(table));
    }

    let notes = manager.open_stacks().last().expect("two stacks");
    manager.stack_mut(notes).expect("notes").go_next(false).expect("next");
    manager.close_stack(notes).expect("close");

    assert_eq!(
        *log.lock(),
        vec![
            "Home:openStack",
            "Home:openCard",
            "Notes:openStack",
            "Notes:openCard",
            "Notes:closeCard",
            "Notes:openCard",
            "Notes:closeCard",
            "Notes:closeStack",
        ]
    );
}

#[test]
fn coordinator_owns_the_manager() {
    let config = EngineConfig::default();
    let coordinator =
        Coordinator::from_config(&config, StackManager::new(config.clone())).expect("spawn");

    let home = coordinator
        .call(|manager| open_bound(manager, stack_of("Home", 4), Collaborators::default()))
        .expect("call");

    let json = serde_json::to_string(&stack_of("Loaded", 2)).expect("serialize");
    let loaded = coordinator
        .execute_async(
            move || serde_json::from_str::<StackModel>(&json),
            |manager, parsed| {
                parsed.map(|model| open_bound(manager, model, Collaborators::default()))
            },
        )
        .wait()
        .expect("completion")
        .expect("opened");

    let visited = coordinator
        .call(move |manager| -> Result<Vec<usize>, Error> {
            let controller = manager.stack_mut(home)?;
            let mut visited = Vec::new();
            for _ in 0..4 {
                controller.go_next(false)?;
                visited.push(controller.current_card_index());
            }
            Ok(visited)
        })
        .expect("call")
        .expect("navigate");
    assert_eq!(visited, vec![1, 2, 3, 0]);

    let open = coordinator.call(|manager| manager.open_stacks().collect::<Vec<_>>()).expect("call");
    assert_eq!(open, vec![home, loaded]);
}
