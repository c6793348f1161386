// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::error::ConstructionError;
use crate::model::{BackgroundId, CardId, Destination, PartRef, StackId, StackModel};

/// The realized card of a bound stack controller.
///
/// Only one exists per controller at a time. Every other card is plain data until activated.
/// It records identity only; the card's position is [`StackModel::index_of_card`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPart {
    card_id: CardId,
    background_id: BackgroundId,
}

impl CardPart {
    /// Builds the controller for the card at `index`, checking that its background resolves.
    pub(crate) fn load(stack: &StackModel, index: usize) -> Result<Self, ConstructionError> {
        let count = stack.card_count();
        let card = stack.card(index).ok_or(ConstructionError::CardOutOfRange { index, count })?;
        if stack.background(card.background_id()).is_none() {
            return Err(ConstructionError::MissingBackground {
                card: card.id(),
                background: card.background_id(),
            });
        }
        Ok(Self { card_id: card.id(), background_id: card.background_id() })
    }

    pub fn id(&self) -> CardId {
        self.card_id
    }

    pub fn background_id(&self) -> BackgroundId {
        self.background_id
    }

    pub fn part_ref(&self) -> PartRef {
        PartRef::Card(self.card_id)
    }

    pub fn destination(&self, stack_id: StackId) -> Destination {
        Destination::new(stack_id, self.card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::three_card_stack;

    #[test]
    fn load_reports_out_of_range_positions() {
        let stack = three_card_stack();
        assert_eq!(
            CardPart::load(&stack, 3),
            Err(ConstructionError::CardOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn load_captures_identity_and_background() {
        let stack = three_card_stack();
        let card = CardPart::load(&stack, 1).unwrap();
        let model = stack.card(1).unwrap();

        assert_eq!(card.id(), model.id());
        assert_eq!(card.background_id(), model.background_id());
        assert_eq!(card.part_ref(), PartRef::Card(model.id()));
        assert_eq!(card.destination(StackId::new(4)), Destination::new(StackId::new(4), model.id()));
    }
}
