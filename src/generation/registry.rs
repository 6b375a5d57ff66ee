//! Registry of generic model classes discovered during model emission.
//!
//! One registry lives for exactly one generation run. The model emitter writes
//! to it; the API emitter and the unwrap generator only read it afterwards.

use std::collections::HashMap;

/// The property of a generic class that carries the type parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSlot {
    pub property: String,
    /// The slot is declared `list[T]` rather than `T`
    pub sequence: bool,
}

/// What is known about one generic root class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericRegistryEntry {
    pub class_name: String,
    /// Name of the `TypeVar` bound to the class, e.g. `T0`
    pub type_param: String,
    pub slot: Option<GenericSlot>,
}

#[derive(Debug, Default)]
pub struct GenericRegistry {
    entries: HashMap<String, GenericRegistryEntry>,
    next_param: usize,
}

impl GenericRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generic root class and allocate its type parameter.
    ///
    /// Returns `None` when the class is already registered; the counter only
    /// advances for new classes, so parameter names never collide.
    pub fn register(&mut self, class_name: &str) -> Option<String> {
        if self.entries.contains_key(class_name) {
            return None;
        }

        let type_param = format!("T{}", self.next_param);
        self.next_param += 1;
        self.entries.insert(
            class_name.to_string(),
            GenericRegistryEntry {
                class_name: class_name.to_string(),
                type_param: type_param.clone(),
                slot: None,
            },
        );
        tracing::debug!(class = class_name, %type_param, "Registered generic class");
        Some(type_param)
    }

    /// Record the payload slot of a registered class. The first recorded slot
    /// wins; later calls return `false` and change nothing.
    pub fn record_slot(&mut self, class_name: &str, property: &str, sequence: bool) -> bool {
        match self.entries.get_mut(class_name) {
            Some(entry) if entry.slot.is_none() => {
                entry.slot = Some(GenericSlot {
                    property: property.to_string(),
                    sequence,
                });
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.entries.contains_key(class_name)
    }

    pub fn get(&self, class_name: &str) -> Option<&GenericRegistryEntry> {
        self.entries.get(class_name)
    }

    pub fn slot(&self, class_name: &str) -> Option<&GenericSlot> {
        self.entries.get(class_name)?.slot.as_ref()
    }

    /// Whether the class declares its payload as `list[T]`
    pub fn slot_is_sequence(&self, class_name: &str) -> bool {
        self.slot(class_name).is_some_and(|slot| slot.sequence)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
