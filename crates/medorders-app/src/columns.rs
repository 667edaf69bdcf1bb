// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::MedicationRecord;

/// Columns the user may show or hide. The patient/medication core columns
/// are always rendered and are not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionalColumn {
    Contact,
    PatientTags,
    Notes,
}

pub struct ColumnDescriptor {
    pub label: &'static str,
    pub description: &'static str,
    pub render: fn(&MedicationRecord) -> String,
}

static CONTACT: ColumnDescriptor = ColumnDescriptor {
    label: "Patient contact",
    description: "Primary phone number and patient name.",
    render: render_contact,
};

static PATIENT_TAGS: ColumnDescriptor = ColumnDescriptor {
    label: "Patient tags",
    description: "Highlight key traits or alerts.",
    render: render_patient_tags,
};

static NOTES: ColumnDescriptor = ColumnDescriptor {
    label: "Care notes",
    description: "Internal notes about this order.",
    render: render_notes,
};

impl OptionalColumn {
    /// Canonical display order.
    pub const ALL: [Self; 3] = [Self::Contact, Self::PatientTags, Self::Notes];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::PatientTags => "patientTags",
            Self::Notes => "notes",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "contact" => Some(Self::Contact),
            "patientTags" => Some(Self::PatientTags),
            "notes" => Some(Self::Notes),
            _ => None,
        }
    }

    pub fn descriptor(self) -> &'static ColumnDescriptor {
        match self {
            Self::Contact => &CONTACT,
            Self::PatientTags => &PATIENT_TAGS,
            Self::Notes => &NOTES,
        }
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }

    pub fn render_cell(self, record: &MedicationRecord) -> String {
        (self.descriptor().render)(record)
    }
}

fn render_contact(record: &MedicationRecord) -> String {
    format!(
        "{} · {}",
        record.patient_name().unwrap_or("Unknown patient"),
        record.contact
    )
}

fn render_patient_tags(record: &MedicationRecord) -> String {
    let tags = record.patient_tags();
    if tags.is_empty() {
        return "No tags".to_owned();
    }
    tags.join(", ")
}

fn render_notes(record: &MedicationRecord) -> String {
    record.notes.clone()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnVisibility {
    shown: Vec<OptionalColumn>,
    defaults: Vec<OptionalColumn>,
}

impl ColumnVisibility {
    pub fn with_defaults(defaults: &[OptionalColumn]) -> Self {
        let defaults = canonical(defaults);
        Self {
            shown: defaults.clone(),
            defaults,
        }
    }

    pub fn toggle(&mut self, column: OptionalColumn) {
        if self.shown.contains(&column) {
            self.shown.retain(|shown| *shown != column);
        } else {
            self.shown.push(column);
            self.shown = canonical(&self.shown);
        }
    }

    pub fn reset(&mut self) {
        self.shown = self.defaults.clone();
    }

    pub fn is_visible(&self, column: OptionalColumn) -> bool {
        self.shown.contains(&column)
    }

    pub fn visible(&self) -> Vec<OptionalColumn> {
        canonical(&self.shown)
    }

    pub fn hidden(&self) -> Vec<OptionalColumn> {
        OptionalColumn::ALL
            .into_iter()
            .filter(|column| !self.shown.contains(column))
            .collect()
    }
}

fn canonical(columns: &[OptionalColumn]) -> Vec<OptionalColumn> {
    OptionalColumn::ALL
        .into_iter()
        .filter(|column| columns.contains(column))
        .collect()
}
