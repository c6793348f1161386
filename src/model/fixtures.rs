// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::stack::{Dimension, StackModel};

/// Three cards on one shared background, current card first.
pub(crate) fn three_card_stack() -> StackModel {
    let mut stack = StackModel::new_stack("Fixture", Dimension::new(512, 342));
    let background = stack.card(0).expect("first card").background_id();
    stack.new_card(background).expect("second card");
    stack.set_current_card_index(1).expect("index");
    stack.new_card(background).expect("third card");
    stack.set_current_card_index(0).expect("index");
    stack
}
