// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A stable integer identity for a part of a given kind.
///
/// Identities are allocated from an [`IdSequence`] owned by the stack and are never reused,
/// even after the part they named is deleted. The tag parameter keeps card, background and
/// control identities from being mixed up at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(value: u32) -> Self {
        Self { value, _marker: PhantomData }
    }

    pub const fn value(self) -> u32 {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self::new)
    }
}

impl<T> From<u32> for Id<T> {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::new)
    }
}

/// Monotonic allocator for one identity space.
///
/// `allocate` hands out strictly increasing values; there is no way to return a value to the
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence<T> {
    next: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for IdSequence<T> {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl<T> IdSequence<T> {
    pub const fn starting_at(next: u32) -> Self {
        Self { next, _marker: PhantomData }
    }

    pub fn allocate(&mut self) -> Id<T> {
        let id = Id::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// The value the next call to [`IdSequence::allocate`] will return.
    pub fn peek(&self) -> Id<T> {
        Id::new(self.next)
    }

    /// Moves the sequence past `id` if it has not got there already.
    pub fn observe(&mut self, id: Id<T>) {
        if id.value >= self.next {
            self.next = id.value.saturating_add(1);
        }
    }
}

impl<T> Serialize for IdSequence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.next.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for IdSequence<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::starting_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StackIdTag {}
pub type StackId = Id<StackIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackgroundIdTag {}
pub type BackgroundId = Id<BackgroundIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardIdTag {}
pub type CardId = Id<CardIdTag>;

/// Identity of a control (button or field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartIdTag {}
pub type PartId = Id<PartIdTag>;
