// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{EditableField, MedicationRecord};

/// Uncommitted copy of every editable field of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationDraft {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: String,
}

impl MedicationDraft {
    pub fn from_record(record: &MedicationRecord) -> Self {
        Self {
            name: record.name.clone(),
            dosage: record.dosage.clone(),
            frequency: record.frequency.clone(),
            duration: record.duration.clone(),
            instructions: record.instructions.clone(),
        }
    }

    pub fn field(&self, field: EditableField) -> &str {
        match field {
            EditableField::Name => &self.name,
            EditableField::Dosage => &self.dosage,
            EditableField::Frequency => &self.frequency,
            EditableField::Duration => &self.duration,
            EditableField::Instructions => &self.instructions,
        }
    }

    pub fn set_field(&mut self, field: EditableField, value: impl Into<String>) {
        let slot = match field {
            EditableField::Name => &mut self.name,
            EditableField::Dosage => &mut self.dosage,
            EditableField::Frequency => &mut self.frequency,
            EditableField::Duration => &mut self.duration,
            EditableField::Instructions => &mut self.instructions,
        };
        *slot = value.into();
    }

    /// Copies the record's committed value for `field` back into the draft.
    pub fn revert_field(&mut self, field: EditableField, record: &MedicationRecord) {
        self.set_field(field, record.field(field));
    }

    /// Overwrites every editable field of `record`, changed or not.
    pub fn apply_to(&self, record: &mut MedicationRecord) {
        record.name = self.name.clone();
        record.dosage = self.dosage.clone();
        record.frequency = self.frequency.clone();
        record.duration = self.duration.clone();
        record.instructions = self.instructions.clone();
    }

    pub fn changed_fields(&self, record: &MedicationRecord) -> Vec<EditableField> {
        EditableField::ALL
            .into_iter()
            .filter(|field| self.field(*field) != record.field(*field))
            .collect()
    }
}
