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
use super::ids::{BackgroundId, PartId};
use super::part::{Owner, PartKind, PartModel, PartRef};
use super::properties::{names, PropertyStore};

/// Appearance and script state shared by every card that references it.
///
/// A background lives as long as the stack does; removing its last card does not remove it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundModel {
    id: BackgroundId,
    #[serde(default)]
    owner: Owner,
    #[serde(default)]
    properties: PropertyStore,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    controls: BTreeMap<PartId, ControlModel>,
}

impl BackgroundModel {
    pub fn empty(id: BackgroundId, owner: Owner) -> Self {
        let mut properties = PropertyStore::new();
        properties.define(names::ID, id.value(), true);
        properties.define(names::NAME, "", false);
        properties.define(names::CANT_DELETE, false, false);
        Self { id, owner, properties, controls: BTreeMap::new() }
    }

    pub fn id(&self) -> BackgroundId {
        self.id
    }

    pub fn cant_delete(&self) -> bool {
        self.properties.bool(names::CANT_DELETE)
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
        self.controls.insert(id, ControlModel::new(id, kind, PartRef::Background(self.id)));
    }
}

impl PartModel for BackgroundModel {
    fn kind(&self) -> PartKind {
        PartKind::Background
    }

    fn part_ref(&self) -> PartRef {
        PartRef::Background(self.id)
    }

    fn owner(&self) -> Owner {
        self.owner
    }

    fn parent(&self) -> Option<PartRef> {
        Some(PartRef::Stack)
    }

    fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }
}
