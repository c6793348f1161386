// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interfaces of the collaborators a stack controller drives but does not implement.

use std::fmt;

use smol_str::SmolStr;

use crate::model::{CardId, StackModel};

/// Transition requested when the screen is unlocked. Interpreted by the display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisualEffect(SmolStr);

impl VisualEffect {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref().trim()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisualEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The window (or any other view) a stack is bound to.
pub trait DisplaySurface: Send {
    fn bind_model(&mut self, stack: &StackModel);

    fn set_allow_resizing(&mut self, allow: bool);

    /// Render `card`, which has just become the current card.
    fn display_card(&mut self, stack: &StackModel, card: CardId, effect: Option<&VisualEffect>);
}

/// Paint tools and background editing mode.
pub trait ToolCollaborator: Send {
    /// Commit in-flight tool state before the current card goes away.
    fn deactivate(&mut self);

    fn reactivate(&mut self, card: CardId);

    fn set_editing_background(&mut self, editing: bool);
}

/// Display that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl DisplaySurface for Headless {
    fn bind_model(&mut self, _stack: &StackModel) {}

    fn set_allow_resizing(&mut self, _allow: bool) {}

    fn display_card(&mut self, _stack: &StackModel, _card: CardId, _effect: Option<&VisualEffect>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTools;

impl ToolCollaborator for NoTools {
    fn deactivate(&mut self) {}

    fn reactivate(&mut self, _card: CardId) {}

    fn set_editing_background(&mut self, _editing: bool) {}
}

/// Screen lock state. While locked, card changes are not shown on the display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurtainManager {
    locked: bool,
}

impl CurtainManager {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock_screen(&mut self) {
        self.locked = true;
    }

    /// Returns whether the screen was locked.
    pub fn unlock_screen(&mut self) -> bool {
        std::mem::replace(&mut self.locked, false)
    }
}
