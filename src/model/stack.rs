// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::background::BackgroundModel;
use super::card::CardModel;
use super::control::ControlKind;
use super::ids::{
    BackgroundId, BackgroundIdTag, CardId, CardIdTag, IdSequence, PartId, PartIdTag,
};
use super::part::{Owner, PartKind, PartModel, PartRef};
use super::properties::{is_inheritable, names, PropertyChange, PropertyStore};
use super::value::Value;
use crate::error::{ConstructionError, SemanticError};

/// Ancestor chain of a part, nearest first. Never longer than control → card → background → stack.
pub type MessageChain = SmallVec<[PartRef; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The document: an ordered card sequence plus the backgrounds those cards show.
///
/// The stack owns every part by containment (cards and backgrounds here, controls inside their
/// card or background). Cross references are identities resolved through this arena.
///
/// Invariants kept by every mutating method:
/// - the card sequence is never empty;
/// - `current_card_index` indexes into it;
/// - every card's background exists in `backgrounds`.
///
/// A deserialized model has not been checked yet; see [`StackModel::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackModel {
    #[serde(default)]
    owner: Owner,
    #[serde(default)]
    properties: PropertyStore,
    cards: Vec<CardModel>,
    backgrounds: BTreeMap<BackgroundId, BackgroundModel>,
    #[serde(default, with = "icon_encoding", skip_serializing_if = "BTreeMap::is_empty")]
    user_icons: BTreeMap<String, Vec<u8>>,
    #[serde(default)]
    next_part_id: IdSequence<PartIdTag>,
    #[serde(default)]
    next_card_id: IdSequence<CardIdTag>,
    #[serde(default)]
    next_background_id: IdSequence<BackgroundIdTag>,
    #[serde(default)]
    current_card_index: usize,
}

impl StackModel {
    /// A stack with a single empty card on a single empty background.
    pub fn new_stack(name: &str, dimension: Dimension) -> Self {
        let mut properties = PropertyStore::new();
        properties.define(names::ID, 0u32, true);
        properties.define(names::NAME, name, false);
        properties.define(names::WIDTH, dimension.width, false);
        properties.define(names::HEIGHT, dimension.height, false);
        properties.define(names::RESIZABLE, false, false);
        properties.define(names::CANT_DELETE, false, false);

        let mut stack = Self {
            owner: Owner::Environment,
            properties,
            cards: Vec::new(),
            backgrounds: BTreeMap::new(),
            user_icons: BTreeMap::new(),
            next_part_id: IdSequence::default(),
            next_card_id: IdSequence::default(),
            next_background_id: IdSequence::default(),
            current_card_index: 0,
        };
        let background_id = stack.new_background(Owner::Environment);
        let card_id = stack.next_card_id();
        stack.cards.push(CardModel::empty(card_id, background_id, Owner::Environment));
        stack
    }

    pub fn name(&self) -> String {
        self.properties.get(names::NAME).map(ToString::to_string).unwrap_or_default()
    }

    pub fn dimension(&self) -> Dimension {
        let read = |name: &str| {
            self.properties.int(name).and_then(|value| u32::try_from(value).ok()).unwrap_or(0)
        };
        Dimension::new(read(names::WIDTH), read(names::HEIGHT))
    }

    pub fn is_resizable(&self) -> bool {
        self.properties.bool(names::RESIZABLE)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[CardModel] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&CardModel> {
        self.cards.get(index)
    }

    pub fn card_by_id(&self, id: CardId) -> Option<&CardModel> {
        self.cards.iter().find(|card| card.id() == id)
    }

    fn card_by_id_mut(&mut self, id: CardId) -> Option<&mut CardModel> {
        self.cards.iter_mut().find(|card| card.id() == id)
    }

    pub fn index_of_card(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id() == id)
    }

    /// Position of the first card whose name matches, ignoring ASCII case.
    pub fn index_of_card_named(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.cards.iter().position(|card| card.name().eq_ignore_ascii_case(name))
    }

    pub fn current_card_index(&self) -> usize {
        self.current_card_index
    }

    pub fn current_card(&self) -> Option<&CardModel> {
        self.cards.get(self.current_card_index)
    }

    pub fn set_current_card_index(&mut self, index: usize) -> Result<(), SemanticError> {
        if index >= self.cards.len() {
            return Err(SemanticError::CardIndexOutOfRange { index, count: self.cards.len() });
        }
        self.current_card_index = index;
        Ok(())
    }

    pub fn background(&self, id: BackgroundId) -> Option<&BackgroundModel> {
        self.backgrounds.get(&id)
    }

    pub fn backgrounds(&self) -> &BTreeMap<BackgroundId, BackgroundModel> {
        &self.backgrounds
    }

    pub fn background_count(&self) -> usize {
        self.backgrounds.len()
    }

    pub fn cards_in_background(
        &self,
        background_id: BackgroundId,
    ) -> impl Iterator<Item = &CardModel> + '_ {
        self.cards.iter().filter(move |card| card.background_id() == background_id)
    }

    /// Position of the first card, in stack order, showing the given background.
    pub fn index_of_background(&self, background_id: BackgroundId) -> Option<usize> {
        self.cards.iter().position(|card| card.background_id() == background_id)
    }

    pub fn marked_cards(&self) -> impl Iterator<Item = &CardModel> + '_ {
        self.cards.iter().filter(|card| card.is_marked())
    }

    pub fn next_card_id(&mut self) -> CardId {
        self.next_card_id.allocate()
    }

    pub fn next_background_id(&mut self) -> BackgroundId {
        self.next_background_id.allocate()
    }

    pub fn next_part_id(&mut self) -> PartId {
        self.next_part_id.allocate()
    }

    pub(crate) fn part_ids_mut(&mut self) -> &mut IdSequence<PartIdTag> {
        &mut self.next_part_id
    }

    fn new_background(&mut self, owner: Owner) -> BackgroundId {
        let id = self.next_background_id();
        self.backgrounds.insert(id, BackgroundModel::empty(id, owner));
        id
    }

    /// Inserts `card` immediately after the current card and returns its position.
    ///
    /// The current card index is left alone; navigating onto the new card is the caller's job.
    pub fn insert_card(&mut self, card: CardModel) -> Result<usize, SemanticError> {
        if !self.backgrounds.contains_key(&card.background_id()) {
            return Err(SemanticError::NoSuchBackground(card.background_id()));
        }
        self.next_card_id.observe(card.id());
        let index = (self.current_card_index + 1).min(self.cards.len());
        self.cards.insert(index, card);
        Ok(index)
    }

    /// Creates an empty card on an existing background after the current card.
    pub fn new_card(&mut self, background_id: BackgroundId) -> Result<(usize, CardId), SemanticError> {
        if !self.backgrounds.contains_key(&background_id) {
            return Err(SemanticError::NoSuchBackground(background_id));
        }
        let id = self.next_card_id();
        let index = self.insert_card(CardModel::empty(id, background_id, Owner::User))?;
        Ok((index, id))
    }

    /// Creates an empty card on a freshly allocated background after the current card.
    pub fn new_card_with_new_background(&mut self) -> (usize, CardId) {
        let background_id = self.new_background(Owner::User);
        let id = self.next_card_id();
        let index = (self.current_card_index + 1).min(self.cards.len());
        self.cards.insert(index, CardModel::empty(id, background_id, Owner::User));
        (index, id)
    }

    /// Removes the card at `index`, keeping the current index valid.
    pub fn remove_card(&mut self, index: usize) -> Result<CardModel, SemanticError> {
        if index >= self.cards.len() {
            return Err(SemanticError::CardIndexOutOfRange { index, count: self.cards.len() });
        }
        if self.cards.len() == 1 {
            return Err(SemanticError::LastCard);
        }
        let removed = self.cards.remove(index);
        if index < self.current_card_index || self.current_card_index >= self.cards.len() {
            self.current_card_index = self.current_card_index.saturating_sub(1);
        }
        Ok(removed)
    }

    /// Stable sort of the card sequence. The current index keeps its numeric value, so the
    /// card it designates may change.
    pub fn sort_cards_by_key<K: Ord>(&mut self, key: impl FnMut(&CardModel) -> K) {
        self.cards.sort_by_key(key);
    }

    /// Fails unless `order` is a permutation of the current card ids.
    pub fn check_card_order(&self, order: &[CardId]) -> Result<(), SemanticError> {
        let wanted = order.iter().copied().collect::<BTreeSet<_>>();
        let present = self.cards.iter().map(CardModel::id).collect::<BTreeSet<_>>();
        if order.len() != self.cards.len() || wanted != present {
            return Err(SemanticError::InvalidCardOrder);
        }
        Ok(())
    }

    /// Rearranges the cards into the given order, which must name every card exactly once.
    pub fn reorder_cards(&mut self, order: &[CardId]) -> Result<(), SemanticError> {
        self.check_card_order(order)?;

        let mut by_id = std::mem::take(&mut self.cards)
            .into_iter()
            .map(|card| (card.id(), card))
            .collect::<BTreeMap<_, _>>();
        self.cards = order.iter().filter_map(|id| by_id.remove(id)).collect();
        Ok(())
    }

    pub fn add_control(&mut self, container: PartRef, kind: ControlKind) -> Result<PartId, SemanticError> {
        match container {
            PartRef::Card(card_id) => {
                if self.card_by_id(card_id).is_none() {
                    return Err(SemanticError::NoSuchCard(card_id));
                }
                let id = self.next_part_id();
                if let Some(card) = self.card_by_id_mut(card_id) {
                    card.add_control(id, kind);
                }
                Ok(id)
            }
            PartRef::Background(background_id) => {
                if !self.backgrounds.contains_key(&background_id) {
                    return Err(SemanticError::NoSuchBackground(background_id));
                }
                let id = self.next_part_id();
                if let Some(background) = self.backgrounds.get_mut(&background_id) {
                    background.add_control(id, kind);
                }
                Ok(id)
            }
            other => Err(SemanticError::NoSuchPart(other)),
        }
    }

    pub fn create_icon(&mut self, name: impl Into<String>, image: Vec<u8>) {
        self.user_icons.insert(name.into(), image);
    }

    pub fn user_icon(&self, name: &str) -> Option<&[u8]> {
        self.user_icons.get(name).map(Vec::as_slice)
    }

    pub fn user_icons(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
        self.user_icons.iter().map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
    }

    pub fn contains(&self, part: PartRef) -> bool {
        self.part(part).is_some()
    }

    pub fn part(&self, part: PartRef) -> Option<&dyn PartModel> {
        match part {
            PartRef::Stack => Some(self),
            PartRef::Background(id) => self.backgrounds.get(&id).map(|bg| bg as &dyn PartModel),
            PartRef::Card(id) => self.card_by_id(id).map(|card| card as &dyn PartModel),
            PartRef::Control(id) => self
                .cards
                .iter()
                .find_map(|card| card.control(id))
                .or_else(|| self.backgrounds.values().find_map(|bg| bg.control(id)))
                .map(|control| control as &dyn PartModel),
        }
    }

    pub fn part_mut(&mut self, part: PartRef) -> Option<&mut dyn PartModel> {
        match part {
            PartRef::Stack => Some(self),
            PartRef::Background(id) => {
                self.backgrounds.get_mut(&id).map(|bg| bg as &mut dyn PartModel)
            }
            PartRef::Card(id) => self.card_by_id_mut(id).map(|card| card as &mut dyn PartModel),
            PartRef::Control(id) => {
                if let Some(index) = self.cards.iter().position(|card| card.control(id).is_some()) {
                    return self.cards[index].control_mut(id).map(|c| c as &mut dyn PartModel);
                }
                self.backgrounds
                    .values_mut()
                    .find_map(|bg| bg.control_mut(id))
                    .map(|control| control as &mut dyn PartModel)
            }
        }
    }

    /// Reads a property, falling back along the parent chain for inheritable names.
    pub fn property(&self, part: PartRef, name: &str) -> Option<Value> {
        let inheritable = is_inheritable(name);
        let mut cursor = Some(part);
        while let Some(current) = cursor {
            let model = self.part(current)?;
            if let Some(value) = model.properties().get(name) {
                return Some(value.clone());
            }
            if !inheritable {
                return None;
            }
            cursor = model.parent();
        }
        None
    }

    /// Writes a property on `part`, returning the change when the value actually changed.
    pub fn set_property(
        &mut self,
        part: PartRef,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<PropertyChange>, SemanticError> {
        let model = self.part_mut(part).ok_or(SemanticError::NoSuchPart(part))?;
        let value = value.into();
        let old_value = model.properties_mut().set(name, value.clone())?;
        Ok(old_value.map(|old_value| PropertyChange {
            part,
            name: super::properties::normalize_name(name),
            old_value,
            new_value: value,
        }))
    }

    /// The parts a message sent to `target` visits, nearest first.
    ///
    /// Empty when `target` does not exist.
    pub fn message_chain(&self, target: PartRef) -> MessageChain {
        let mut chain = MessageChain::new();
        let mut cursor = Some(target);
        while let Some(current) = cursor {
            let Some(model) = self.part(current) else {
                break;
            };
            chain.push(current);
            cursor = model.parent();
        }
        chain
    }

    /// Checks the structural invariants of a model that did not come from [`StackModel::new_stack`].
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.cards.is_empty() {
            return Err(ConstructionError::EmptyStack);
        }
        if self.current_card_index >= self.cards.len() {
            return Err(ConstructionError::CurrentIndexInvalid {
                index: self.current_card_index,
                count: self.cards.len(),
            });
        }
        for card in &self.cards {
            if !self.backgrounds.contains_key(&card.background_id()) {
                return Err(ConstructionError::MissingBackground {
                    card: card.id(),
                    background: card.background_id(),
                });
            }
        }
        Ok(())
    }

    /// Moves the id counters past every identity present, so ids loaded from elsewhere are never
    /// handed out again.
    pub(crate) fn reconcile_counters(&mut self) {
        for card in &self.cards {
            self.next_card_id.observe(card.id());
            for id in card.controls().keys() {
                self.next_part_id.observe(*id);
            }
        }
        for (id, background) in &self.backgrounds {
            self.next_background_id.observe(*id);
            for part_id in background.controls().keys() {
                self.next_part_id.observe(*part_id);
            }
        }
    }
}

impl PartModel for StackModel {
    fn kind(&self) -> PartKind {
        PartKind::Stack
    }

    fn part_ref(&self) -> PartRef {
        PartRef::Stack
    }

    fn owner(&self) -> Owner {
        self.owner
    }

    fn parent(&self) -> Option<PartRef> {
        None
    }

    fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }
}

mod icon_encoding {
    use std::collections::BTreeMap;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        icons: &BTreeMap<String, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        icons
            .iter()
            .map(|(name, bytes)| (name.as_str(), STANDARD.encode(bytes)))
            .collect::<BTreeMap<_, _>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        BTreeMap::<String, String>::deserialize(deserializer)?
            .into_iter()
            .map(|(name, encoded)| {
                STANDARD
                    .decode(encoded.as_bytes())
                    .map(|bytes| (name, bytes))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
