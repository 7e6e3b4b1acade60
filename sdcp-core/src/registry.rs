//! Serial-number-keyed registry of projector clients.
//!
//! The explicit, injectable replacement for a process-wide device stash:
//! whoever coordinates polling owns one of these and passes it where it
//! is needed.

use std::collections::HashMap;

use crate::descriptor::DeviceDescriptor;
use crate::projector::Projector;

/// Projector clients keyed by serial number.
#[derive(Debug, Default)]
pub struct ProjectorRegistry {
    entries: HashMap<u32, Projector>,
}

impl ProjectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client. A client for the same serial number is
    /// replaced and returned — the same unit may legitimately come back
    /// from discovery at a new address.
    pub fn insert(&mut self, projector: Projector) -> Option<Projector> {
        self.entries.insert(projector.serial_number(), projector)
    }

    /// Build and register clients for freshly discovered descriptors.
    pub fn extend_discovered(&mut self, descriptors: impl IntoIterator<Item = DeviceDescriptor>) {
        for descriptor in descriptors {
            self.insert(Projector::new(descriptor));
        }
    }

    pub fn get(&self, serial_number: u32) -> Option<&Projector> {
        self.entries.get(&serial_number)
    }

    pub fn remove(&mut self, serial_number: u32) -> Option<Projector> {
        self.entries.remove(&serial_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projector> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
