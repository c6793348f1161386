// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{BackgroundId, CardId, PartId};
use super::properties::PropertyStore;

/// Who created a part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// Created by the authoring environment itself (new stacks, their first card and background).
    Environment,
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Stack,
    Background,
    Card,
    Button,
    Field,
}

/// Identity-only reference to a part within one stack.
///
/// A `PartRef` never keeps the part alive; it is resolved against the owning
/// [`StackModel`](super::StackModel) when needed and may resolve to nothing once the part has
/// been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartRef {
    Stack,
    Background(BackgroundId),
    Card(CardId),
    Control(PartId),
}

impl PartRef {
    pub fn as_card(self) -> Option<CardId> {
        match self {
            Self::Card(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_background(self) -> Option<BackgroundId> {
        match self {
            Self::Background(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for PartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack => f.write_str("this stack"),
            Self::Background(id) => write!(f, "bkgnd id {id}"),
            Self::Card(id) => write!(f, "card id {id}"),
            Self::Control(id) => write!(f, "part id {id}"),
        }
    }
}

/// Common surface of every addressable data model.
pub trait PartModel {
    fn kind(&self) -> PartKind;

    fn part_ref(&self) -> PartRef;

    fn owner(&self) -> Owner;

    /// Structural parent, by identity. Used for property inheritance and message routing only.
    fn parent(&self) -> Option<PartRef>;

    fn properties(&self) -> &PropertyStore;

    fn properties_mut(&mut self) -> &mut PropertyStore;
}
