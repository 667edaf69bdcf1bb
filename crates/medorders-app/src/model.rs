// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::MedicationId;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EditableField {
    Name,
    Dosage,
    Frequency,
    Duration,
    Instructions,
}

impl EditableField {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Dosage,
        Self::Frequency,
        Self::Duration,
        Self::Instructions,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Dosage => "Dosage",
            Self::Frequency => "Frequency",
            Self::Duration => "Duration",
            Self::Instructions => "Instructions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: MedicationId,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: String,
    pub date: String,
    pub doctor: String,
    pub contact: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    #[serde(default)]
    pub color: String,
}

impl MedicationRecord {
    pub fn field(&self, field: EditableField) -> &str {
        match field {
            EditableField::Name => &self.name,
            EditableField::Dosage => &self.dosage,
            EditableField::Frequency => &self.frequency,
            EditableField::Duration => &self.duration,
            EditableField::Instructions => &self.instructions,
        }
    }

    pub fn patient_name(&self) -> Option<&str> {
        self.patient.as_ref().map(|patient| patient.full_name.as_str())
    }

    pub fn patient_tags(&self) -> &[String] {
        self.patient
            .as_ref()
            .map(|patient| patient.tags.as_slice())
            .unwrap_or(&[])
    }

    /// Text matched by the list endpoint's search filter.
    pub fn searchable_text(&self) -> String {
        [
            self.name.as_str(),
            self.dosage.as_str(),
            self.frequency.as_str(),
            self.duration.as_str(),
            self.instructions.as_str(),
            self.doctor.as_str(),
            self.patient_name().unwrap_or(""),
        ]
        .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub data: Vec<MedicationRecord>,
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}
