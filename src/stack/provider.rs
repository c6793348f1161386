// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Subscription registries used by the stack controller.

use std::fmt;

type Callback<T> = Box<dyn FnMut(&T) + Send>;

/// Handle returned by a subscription; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Plain observer list. Callbacks run synchronously, in subscription order.
pub struct Observers<E> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self { next_id: 0, callbacks: Vec::new() }
    }
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("subscribers", &self.callbacks.len()).finish()
    }
}

/// A value with last-value memory.
///
/// New subscribers immediately receive the current value, then every later [`Provider::set`]
/// in emission order.
pub struct Provider<T> {
    value: T,
    observers: Observers<T>,
}

impl<T> Provider<T> {
    pub fn new(initial: T) -> Self {
        Self { value: initial, observers: Observers::new() }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn subscribe(&mut self, mut callback: impl FnMut(&T) + Send + 'static) -> SubscriptionId {
        callback(&self.value);
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Stores `value` and forwards it to every subscriber, even when it equals the old value.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.observers.notify(&self.value);
    }
}

impl<T: fmt::Debug> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("value", &self.value)
            .field("subscribers", &self.observers.len())
            .finish()
    }
}
