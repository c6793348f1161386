// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Data model of a card stack.
//!
//! A stack owns its cards and backgrounds; cards and backgrounds own their controls. Every back
//! reference is an identity resolved through the owning [`StackModel`].

pub mod background;
pub mod card;
pub mod control;
pub mod destination;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod part;
pub mod properties;
pub mod stack;
pub mod value;

pub use background::BackgroundModel;
pub use card::CardModel;
pub use control::{ControlKind, ControlModel};
pub use destination::Destination;
pub use ids::{BackgroundId, CardId, Id, IdSequence, PartId, StackId};
pub use part::{Owner, PartKind, PartModel, PartRef};
pub use properties::{names, PropertyChange, PropertyStore};
pub use stack::{Dimension, MessageChain, StackModel};
pub use value::Value;
