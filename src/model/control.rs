// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::PartId;
use super::part::{Owner, PartKind, PartModel, PartRef};
use super::properties::{names, PropertyStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Button,
    Field,
}

/// A button or field placed on a card or a background.
///
/// Controls are owned by containment: the card or background holding one owns it, and the
/// `container` reference only records where messages go next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlModel {
    id: PartId,
    kind: ControlKind,
    #[serde(default)]
    owner: Owner,
    container: PartRef,
    #[serde(default)]
    properties: PropertyStore,
}

impl ControlModel {
    pub fn new(id: PartId, kind: ControlKind, container: PartRef) -> Self {
        let mut properties = PropertyStore::new();
        properties.define(names::ID, id.value(), true);
        properties.define(names::NAME, "", false);
        Self { id, kind, owner: Owner::User, container, properties }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn control_kind(&self) -> ControlKind {
        self.kind
    }

    pub fn container(&self) -> PartRef {
        self.container
    }

    /// Gives the control a new identity inside a new container (used when a card is duplicated).
    pub(crate) fn relink(&mut self, id: PartId, container: PartRef) {
        self.id = id;
        self.container = container;
        self.properties.define(names::ID, id.value(), true);
    }
}

impl PartModel for ControlModel {
    fn kind(&self) -> PartKind {
        match self.kind {
            ControlKind::Button => PartKind::Button,
            ControlKind::Field => PartKind::Field,
        }
    }

    fn part_ref(&self) -> PartRef {
        PartRef::Control(self.id)
    }

    fn owner(&self) -> Owner {
        self.owner
    }

    fn parent(&self) -> Option<PartRef> {
        Some(self.container)
    }

    fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }
}
