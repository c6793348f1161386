// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{CardId, StackId};
use super::part::PartRef;
use super::stack::StackModel;

/// Identity-based locator of a card in an open stack.
///
/// A destination does not keep the card alive. It is resolved when consumed and may by then
/// name a card that has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination {
    stack_id: StackId,
    card_id: CardId,
}

impl Destination {
    pub fn new(stack_id: StackId, card_id: CardId) -> Self {
        Self { stack_id, card_id }
    }

    /// Canonical destination of a part.
    ///
    /// A card maps to itself, a background to the first card showing it, the stack to its
    /// current card. Returns `None` for a background no card uses, for controls, and for parts
    /// that do not exist.
    pub fn from_part(stack_id: StackId, stack: &StackModel, part: PartRef) -> Option<Self> {
        let card_id = match part {
            PartRef::Card(id) => stack.card_by_id(id)?.id(),
            PartRef::Background(id) => stack.card(stack.index_of_background(id)?)?.id(),
            PartRef::Stack => stack.current_card()?.id(),
            PartRef::Control(_) => return None,
        };
        Some(Self::new(stack_id, card_id))
    }

    pub fn stack_id(&self) -> StackId {
        self.stack_id
    }

    pub fn card_id(&self) -> CardId {
        self.card_id
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card id {} of stack {}", self.card_id, self.stack_id)
    }
}
