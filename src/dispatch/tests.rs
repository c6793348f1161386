// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use parking_lot::Mutex;
use rstest::{fixture, rstest};

use super::{
    send, send_top_level, DispatchCx, DispatchOutcome, ExecutionContext, HandlerResult,
    HandlerTable, Message, NoScripts, Responder, ScriptHost, SystemMessage,
};
use crate::error::{Error, ScriptError, SemanticError};
use crate::model::fixtures::three_card_stack;
use crate::model::{ControlKind, PartRef, StackModel};

type Log = Arc<Mutex<Vec<String>>>;

struct Chain {
    stack: StackModel,
    card: PartRef,
    background: PartRef,
}

#[fixture]
fn chain() -> Chain {
    let stack = three_card_stack();
    let card = stack.card(0).expect("card");
    let (card, background) = (PartRef::Card(card.id()), PartRef::Background(card.background_id()));
    Chain { stack, card, background }
}

fn record(log: &Log, label: &str) {
    log.lock().push(label.to_owned());
}

fn recording(
    log: &Log,
    label: &'static str,
    result: Decide,
) -> impl FnMut(&mut DispatchCx<'_>, &Message) -> Result<HandlerResult, Error> + Send + 'static {
    let log = Arc::clone(log);
    move |cx, _| {
        record(&log, label);
        result(cx)
    }
}

fn complete(_: &mut DispatchCx<'_>) -> Result<HandlerResult, Error> {
    Ok(HandlerResult::Completed)
}

fn pass_m(cx: &mut DispatchCx<'_>) -> Result<HandlerResult, Error> {
    Ok(cx.exec.pass("m")?)
}

fn exit(cx: &mut DispatchCx<'_>) -> Result<HandlerResult, Error> {
    Ok(cx.exec.exit_to_top())
}

type Decide = fn(&mut DispatchCx<'_>) -> Result<HandlerResult, Error>;

fn three_level(chain: &Chain, card: Decide, background: Decide) -> (HandlerTable, Log) {
    let log = Log::default();
    let mut table = HandlerTable::new();
    table
        .on(chain.card, "m", recording(&log, "card", card))
        .on(chain.background, "m", recording(&log, "background", background))
        .on(PartRef::Stack, "m", recording(&log, "stack", complete));
    (table, log)
}

#[rstest]
fn completing_at_the_card_stops_the_walk(mut chain: Chain) {
    let (mut table, log) = three_level(&chain, complete, complete);

    let outcome = send_top_level(&mut chain.stack, &mut table, chain.card, &Message::new("M"), 64)
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Handled(Responder::Part(chain.card)));
    assert_eq!(*log.lock(), vec!["card"]);
}

#[rstest]
fn pass_resumes_at_the_background(mut chain: Chain) {
    let (mut table, log) = three_level(&chain, pass_m, complete);

    let outcome =
        send_top_level(&mut chain.stack, &mut table, chain.card, &Message::new("m"), 64).unwrap();

    assert_eq!(outcome, DispatchOutcome::Handled(Responder::Part(chain.background)));
    assert_eq!(*log.lock(), vec!["card", "background"]);
}

#[rstest]
fn exit_to_top_from_the_background_skips_the_stack(mut chain: Chain) {
    let (mut table, log) = three_level(&chain, pass_m, exit);

    let outcome =
        send_top_level(&mut chain.stack, &mut table, chain.card, &Message::new("m"), 64).unwrap();

    assert_eq!(outcome, DispatchOutcome::Exited);
    assert_eq!(*log.lock(), vec!["card", "background"]);
}

#[rstest]
fn unhandled_messages_fall_off_the_chain_silently(mut chain: Chain) {
    let outcome =
        send_top_level(&mut chain.stack, &mut NoScripts, chain.card, &Message::new("m"), 64)
            .unwrap();
    assert_eq!(outcome, DispatchOutcome::Unhandled);
}

#[rstest]
fn the_environment_is_the_last_stop(mut chain: Chain) {
    let log = Log::default();
    let mut table = HandlerTable::new();
    table
        .on(PartRef::Stack, "m", recording(&log, "stack", pass_m))
        .on_environment("m", recording(&log, "environment", complete));

    let outcome =
        send_top_level(&mut chain.stack, &mut table, chain.card, &Message::new("m"), 64).unwrap();

    assert_eq!(outcome, DispatchOutcome::Handled(Responder::Environment));
    assert_eq!(*log.lock(), vec!["stack", "environment"]);
}

#[rstest]
fn passing_a_different_message_is_rejected(mut chain: Chain) {
    let mut table = HandlerTable::new();
    table.on(chain.card, "m", |cx, _| Ok(cx.exec.pass("other")?));

    let err = send_top_level(&mut chain.stack, &mut table, chain.card, &Message::new("m"), 64)
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Semantic(SemanticError::PassMismatch { ref expected, ref found })
            if expected == "m" && found == "other"
    ));
}

#[test]
fn pass_outside_a_handler_is_rejected() {
    let mut exec = ExecutionContext::default();
    assert_eq!(exec.pass("m"), Err(SemanticError::PassOutsideHandler));
}

#[rstest]
fn messages_to_controls_start_at_the_control(mut chain: Chain) {
    let button = chain.stack.add_control(chain.card, ControlKind::Button).unwrap();
    let control = PartRef::Control(button);
    let log = Log::default();
    let mut table = HandlerTable::new();
    table
        .on(control, "mouseUp", recording(&log, "button", pass_mouse_up))
        .on(chain.card, "mouseup", recording(&log, "card", complete));

    let outcome = send_top_level(&mut chain.stack, &mut table, control, &Message::new("mouseUp"), 64)
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Handled(Responder::Part(chain.card)));
    assert_eq!(*log.lock(), vec!["button", "card"]);
}

fn pass_mouse_up(cx: &mut DispatchCx<'_>) -> Result<HandlerResult, Error> {
    Ok(cx.exec.pass("MOUSEUP")?)
}

#[rstest]
fn deleting_the_target_mid_chain_does_not_stop_the_ancestors(mut chain: Chain) {
    let log = Log::default();
    let mut table = HandlerTable::new();
    let card = chain.card;
    table
        .on(card, "m", move |cx, _| {
            let index = cx.stack.index_of_card(card.as_card().expect("card id")).expect("index");
            cx.stack.remove_card(index)?;
            Ok(cx.exec.pass("m")?)
        })
        .on(chain.background, "m", recording(&log, "background", pass_m))
        .on(PartRef::Stack, "m", recording(&log, "stack", complete));

    let outcome =
        send_top_level(&mut chain.stack, &mut table, chain.card, &Message::new("m"), 64).unwrap();

    assert_eq!(outcome, DispatchOutcome::Handled(Responder::Part(PartRef::Stack)));
    assert_eq!(*log.lock(), vec!["background", "stack"]);
    assert_eq!(chain.stack.card_count(), 2);
}

#[rstest]
fn script_failures_propagate_to_the_caller(mut chain: Chain) {
    let mut table = HandlerTable::new();
    table.on(chain.card, "m", |_, _| Err(ScriptError::new("boom").into()));

    let err = send_top_level(&mut chain.stack, &mut table, chain.card, &Message::new("m"), 64)
        .unwrap_err();
    assert_eq!(err, Error::Script(ScriptError::new("boom")));
}

#[test]
fn system_messages_use_their_canonical_names() {
    let message = Message::from(SystemMessage::OpenCard);
    assert_eq!(message.name(), "openCard");
    assert!(message.is("OPENCARD"));
    assert_eq!(SystemMessage::DeleteCard.name(), "deleteCard");
}

/// Host whose card handler sends a second message before deciding.
struct NestingHost {
    log: Log,
    card: PartRef,
    background: PartRef,
}

impl ScriptHost for NestingHost {
    fn invoke(
        &mut self,
        cx: &mut DispatchCx<'_>,
        part: PartRef,
        message: &Message,
    ) -> Result<HandlerResult, Error> {
        record(&self.log, &format!("{}:{}", message.name(), part_label(part, self)));
        let card = self.card;
        match (message.name(), part) {
            ("outer", p) if p == self.card => {
                let inner = send(cx, self, card, &Message::new("inner"))?;
                record(&self.log, &format!("after inner: {inner:?}"));
                Ok(HandlerResult::Completed)
            }
            ("inner", p) if p == self.card => Ok(cx.exec.pass("inner")?),
            ("inner", p) if p == self.background => Ok(cx.exec.exit_to_top()),
            ("deep", p) if p == self.card => {
                send(cx, self, card, &Message::new("deep"))?;
                Ok(HandlerResult::Completed)
            }
            _ => Ok(HandlerResult::NotHandled),
        }
    }
}

fn part_label(part: PartRef, host: &NestingHost) -> &'static str {
    if part == host.card {
        "card"
    } else if part == host.background {
        "background"
    } else {
        "stack"
    }
}

#[rstest]
fn exit_to_top_unwinds_enclosing_handlers(mut chain: Chain) {
    let log = Log::default();
    let mut host = NestingHost { log: Arc::clone(&log), card: chain.card, background: chain.background };

    let outcome =
        send_top_level(&mut chain.stack, &mut host, chain.card, &Message::new("outer"), 64)
            .unwrap();

    assert_eq!(outcome, DispatchOutcome::Exited);
    assert_eq!(
        *log.lock(),
        vec!["outer:card", "inner:card", "inner:background", "after inner: Exited"]
    );
}

#[rstest]
fn an_exiting_context_runs_no_further_handlers(mut chain: Chain) {
    let log = Log::default();
    let mut table = HandlerTable::new();
    table.on(chain.card, "m", recording(&log, "card", complete));
    let mut exec = ExecutionContext::default();
    exec.exit_to_top();

    let mut cx = DispatchCx::new(&mut chain.stack, &mut exec);
    let outcome = send(&mut cx, &mut table, chain.card, &Message::new("m")).unwrap();

    assert_eq!(outcome, DispatchOutcome::Exited);
    assert!(log.lock().is_empty());
}

#[rstest]
fn runaway_recursion_hits_the_depth_limit(mut chain: Chain) {
    let mut host = NestingHost { log: Log::default(), card: chain.card, background: chain.background };

    let err = send_top_level(&mut chain.stack, &mut host, chain.card, &Message::new("deep"), 8)
        .unwrap_err();

    assert_eq!(err, Error::Semantic(SemanticError::RecursionLimit { depth: 8 }));
}

#[rstest]
fn handlers_see_their_own_frame(mut chain: Chain) {
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let mut table = HandlerTable::new();
    table.on(chain.background, "m", move |cx, _| {
        *sink.lock() = cx.exec.current_part().zip(cx.exec.current_message().map(str::to_owned));
        Ok(HandlerResult::Completed)
    });

    send_top_level(&mut chain.stack, &mut table, chain.card, &Message::new("m"), 64).unwrap();

    assert_eq!(*seen.lock(), Some((chain.background, "m".to_owned())));
}
