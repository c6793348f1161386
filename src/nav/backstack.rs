// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::model::{Destination, StackId};

pub const DEFAULT_CAPACITY: usize = 256;

/// History of visited destinations, most recent last.
///
/// Bounded: once `capacity` entries are held, pushing drops the oldest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backstack {
    entries: VecDeque<Destination>,
    capacity: usize,
}

impl Default for Backstack {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Backstack {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, destination: Destination) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(destination);
    }

    pub fn pop(&mut self) -> Option<Destination> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<Destination> {
        self.entries.back().copied()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Destination> + '_ {
        self.entries.iter()
    }

    pub fn entries_for(&self, stack_id: StackId) -> impl Iterator<Item = &Destination> + '_ {
        self.entries.iter().filter(move |dest| dest.stack_id() == stack_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A backstack shared by every controller a manager opens.
pub type SharedBackstack = Arc<Mutex<Backstack>>;

pub fn shared(capacity: usize) -> SharedBackstack {
    Arc::new(Mutex::new(Backstack::with_capacity(capacity)))
}
