// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::control::{ControlKind, ControlModel};
use super::ids::{BackgroundId, CardId, IdSequence, PartId, PartIdTag};
use super::part::{Owner, PartKind, PartModel, PartRef};
use super::properties::{names, PropertyStore};

/// One card of a stack: card-local properties, its controls, and the background it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardModel {
    id: CardId,
    background_id: BackgroundId,
    #[serde(default)]
    owner: Owner,
    #[serde(default)]
    properties: PropertyStore,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    controls: BTreeMap<PartId, ControlModel>,
}

impl CardModel {
    pub fn empty(id: CardId, background_id: BackgroundId, owner: Owner) -> Self {
        let mut properties = PropertyStore::new();
        properties.define(names::ID, id.value(), true);
        properties.define(names::NAME, "", false);
        properties.define(names::CANT_DELETE, false, false);
        properties.define(names::MARKED, false, false);
        Self { id, background_id, owner, properties, controls: BTreeMap::new() }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn background_id(&self) -> BackgroundId {
        self.background_id
    }

    pub fn name(&self) -> String {
        self.properties.get(names::NAME).map(ToString::to_string).unwrap_or_default()
    }

    pub fn cant_delete(&self) -> bool {
        self.properties.bool(names::CANT_DELETE)
    }

    pub fn is_marked(&self) -> bool {
        self.properties.bool(names::MARKED)
    }

    pub fn controls(&self) -> &BTreeMap<PartId, ControlModel> {
        &self.controls
    }

    pub fn control(&self, id: PartId) -> Option<&ControlModel> {
        self.controls.get(&id)
    }

    pub(crate) fn control_mut(&mut self, id: PartId) -> Option<&mut ControlModel> {
        self.controls.get_mut(&id)
    }

    pub(crate) fn add_control(&mut self, id: PartId, kind: ControlKind) {
        self.controls.insert(id, ControlModel::new(id, kind, PartRef::Card(self.id)));
    }

    /// Deep copy of this card under a fresh identity.
    ///
    /// Every control is re-keyed with a new part id drawn from `part_ids`; nothing in the copy
    /// shares an identity with the original.
    pub fn copy_with_id(&self, id: CardId, part_ids: &mut IdSequence<PartIdTag>) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        copy.owner = Owner::User;
        copy.properties.define(names::ID, id.value(), true);
        copy.controls = self
            .controls
            .values()
            .map(|control| {
                let mut control = control.clone();
                let new_id = part_ids.allocate();
                control.relink(new_id, PartRef::Card(id));
                (new_id, control)
            })
            .collect();
        copy
    }

    pub(crate) fn relink_background(&mut self, background_id: BackgroundId) {
        self.background_id = background_id;
    }
}

impl PartModel for CardModel {
    fn kind(&self) -> PartKind {
        PartKind::Card
    }

    fn part_ref(&self) -> PartRef {
        PartRef::Card(self.id)
    }

    fn owner(&self) -> Owner {
        self.owner
    }

    fn parent(&self) -> Option<PartRef> {
        Some(PartRef::Background(self.background_id))
    }

    fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }
}
