// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cardstack CLI entrypoint.
//!
//! Builds a demo stack on the dispatch thread, walks through it with "go next" and prints every
//! card it visits, then goes back once.

use std::error::Error;
use std::path::PathBuf;

use cardstack::logging::{self, LogTarget};
use cardstack::model::{names, PartRef};
use cardstack::stack::Headless;
use cardstack::{Collaborators, Coordinator, EngineConfig, StackManager};

const DEFAULT_CARDS: usize = 3;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] [--log <filter>] [--cards <n>]\n\n--config reads engine settings from a TOML file.\n--log overrides the log filter (the CARDSTACK_LOG environment variable wins over both).\n--cards sets how many cards the demo stack gets (default {DEFAULT_CARDS}, at least 1)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    log: Option<String>,
    cards: Option<usize>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--log" => {
                if options.log.is_some() {
                    return Err(());
                }
                options.log = Some(args.next().ok_or(())?);
            }
            "--cards" => {
                if options.cards.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let cards: usize = raw.parse().map_err(|_| ())?;
                if cards == 0 {
                    return Err(());
                }
                options.cards = Some(cards);
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn run_demo(manager: &mut StackManager, cards: usize) -> cardstack::Result<Vec<String>> {
    let id = manager.new_stack(Some("Demo"), Collaborators::default())?;
    let controller = manager.stack_mut(id)?;
    controller.bind_to_display(Box::new(Headless))?;
    for number in 1..=cards {
        if number > 1 {
            controller.new_card()?;
        }
        let card = controller.current_card_id()?;
        controller.set_property(PartRef::Card(card), names::NAME, format!("Card {number}"))?;
    }
    controller.go_first(false)?;

    let mut visited = Vec::with_capacity(cards + 1);
    for _ in 0..cards {
        let card = controller.go_next(true)?;
        let name = controller.property(PartRef::Card(card), names::NAME).unwrap_or_default();
        visited.push(format!("{name} (card id {card})"));
    }
    if let Some(card) = manager.go_back()? {
        visited.push(format!("back to card id {card}"));
    }
    Ok(visited)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "cardstack".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let config = match &options.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        let filter = options.log.as_deref().unwrap_or(&config.log_filter);
        logging::init(LogTarget::Stderr, filter)?;

        let cards = options.cards.unwrap_or(DEFAULT_CARDS);
        let coordinator = Coordinator::from_config(&config, StackManager::new(config.clone()))?;
        let visited = coordinator.call(move |manager| run_demo(manager, cards))??;
        for line in visited {
            println!("{line}");
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("cardstack: {err}");
        std::process::exit(1);
    }
}
