// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cardstack-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cardstack and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-part property storage.
//!
//! Property names are case-insensitive; they are stored lower-cased. A store only knows its own
//! values: falling back to an ancestor for inheritable names is done by
//! [`StackModel::property`](super::StackModel::property), which can see the whole hierarchy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::part::PartRef;
use super::value::Value;
use crate::error::SemanticError;

pub mod names {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const RESIZABLE: &str = "resizable";
    pub const CANT_DELETE: &str = "cantdelete";
    pub const CANT_MODIFY: &str = "cantmodify";
    pub const MARKED: &str = "marked";
    pub const TEXT_FONT: &str = "textfont";
    pub const TEXT_SIZE: &str = "textsize";
    pub const TEXT_STYLE: &str = "textstyle";
}

/// Names that resolve through the parent chain when a part leaves them unset.
pub const INHERITABLE: &[&str] =
    &[names::TEXT_FONT, names::TEXT_SIZE, names::TEXT_STYLE, names::CANT_MODIFY];

pub fn normalize_name(name: &str) -> SmolStr {
    SmolStr::new(name.trim().to_ascii_lowercase())
}

pub fn is_inheritable(name: &str) -> bool {
    let name = normalize_name(name);
    INHERITABLE.contains(&name.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Property {
    value: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    read_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyStore {
    values: BTreeMap<SmolStr, Property>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or redefines) a property, bypassing the read-only guard.
    pub fn define(&mut self, name: &str, value: impl Into<Value>, read_only: bool) {
        self.values.insert(normalize_name(name), Property { value: value.into(), read_only });
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&normalize_name(name)).map(|property| &property.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&normalize_name(name))
    }

    pub fn is_read_only(&self, name: &str) -> bool {
        self.values.get(&normalize_name(name)).is_some_and(|property| property.read_only)
    }

    /// Writes a property on behalf of a script or collaborator.
    ///
    /// Returns the previous value when the write changed anything, `None` when the value was
    /// already equal. Undefined names are created as writable properties.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>, SemanticError> {
        let key = normalize_name(name);
        let value = value.into();
        match self.values.get_mut(&key) {
            Some(property) if property.read_only => Err(SemanticError::ReadOnlyProperty(key)),
            Some(property) if property.value == value => Ok(None),
            Some(property) => Ok(Some(std::mem::replace(&mut property.value, value))),
            None => {
                self.values.insert(key, Property { value, read_only: false });
                Ok(Some(Value::Empty))
            }
        }
    }

    pub fn bool(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::as_bool)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(SmolStr::as_str)
    }
}

/// A property write that changed a value, as delivered to property observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub part: PartRef,
    pub name: SmolStr,
    pub old_value: Value,
    pub new_value: Value,
}
