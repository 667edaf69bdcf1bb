// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use medorders_app::{MedicationId, MedicationRecord, Patient, format_display_date};
use time::{Duration, OffsetDateTime};
use time::macros::datetime;

pub const DEMO_SEED: u64 = 42;
pub const DEMO_RECORD_COUNT: usize = 200;

const PRODUCT_ADJECTIVES: [&str; 12] = [
    "Ergonomic",
    "Refined",
    "Handcrafted",
    "Sleek",
    "Generic",
    "Intelligent",
    "Rustic",
    "Practical",
    "Gorgeous",
    "Tasty",
    "Licensed",
    "Unbranded",
];
const PRODUCT_MATERIALS: [&str; 10] = [
    "Cotton", "Granite", "Steel", "Wooden", "Frozen", "Plastic", "Rubber", "Bronze", "Soft",
    "Fresh",
];
const PRODUCT_NOUNS: [&str; 12] = [
    "Chair", "Tuna", "Gloves", "Salad", "Ball", "Keyboard", "Soap", "Towels", "Cheese", "Pizza",
    "Table", "Bacon",
];

const DOSAGE_FORMS: [&str; 4] = ["Tablets", "Capsules", "Vial", "Injection"];
const FREQUENCIES: [&str; 4] = [
    "Once a day (OD)",
    "Twice a day (BID)",
    "Every 8 hours",
    "Three times a day (TID)",
];
const DURATION_UNITS: [&str; 3] = ["day", "days", "weeks"];
const ROUTES: [&str; 2] = ["Oral", "Injection"];
const INSTRUCTIONS: [&str; 5] = [
    "Take after meals and avoid acidic food",
    "Don't take on empty stomach",
    "Drink plenty of water",
    "Monitor for dizziness",
    "Not recorded",
];
const PATIENT_TAGS: [&str; 6] = [
    "Hypertensive",
    "Hypersensitive",
    "Diabetic",
    "Asthmatic",
    "High risk",
    "Pregnant",
];
const COLOR_CLASSES: [&str; 5] = [
    "border-l-4 border-green-500",
    "border-l-4 border-red-400",
    "border-l-4 border-blue-500",
    "border-l-4 border-pink-400",
    "border-l-4 border-indigo-400",
];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const NOTE_WORDS: [&str; 16] = [
    "review", "dose", "after", "follow-up", "labs", "pending", "patient", "reports", "mild",
    "nausea", "refill", "requested", "pharmacy", "confirmed", "allergy", "checked",
];

struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible medication orders for the demo backend.
pub struct MedicationFaker {
    rng: DeterministicRng,
}

impl MedicationFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn medication(&mut self, id: i64) -> MedicationRecord {
        let name = format!(
            "{} {} {}",
            self.pick(&PRODUCT_ADJECTIVES),
            self.pick(&PRODUCT_MATERIALS),
            self.pick(&PRODUCT_NOUNS)
        );
        let dosage = format!(
            "{}mg · {}",
            self.int_range(5, 500),
            self.pick(&DOSAGE_FORMS)
        );
        let frequency = self.pick(&FREQUENCIES).to_owned();
        let duration = format!(
            "{} {} · {}",
            self.int_range(1, 4),
            self.pick(&DURATION_UNITS),
            self.pick(&ROUTES)
        );
        let instructions = self.pick(&INSTRUCTIONS).to_owned();
        let date = format_display_date(self.order_datetime());
        let doctor = format!("Dr. {}", self.person_name());
        let contact = self.phone_number();
        let notes = self.sentence(4, 9);
        let patient = Patient {
            full_name: self.person_name(),
            tags: self.tags(),
        };
        let color = self.pick(&COLOR_CLASSES).to_owned();

        MedicationRecord {
            id: MedicationId::new(id),
            name,
            dosage,
            frequency,
            duration,
            instructions,
            date,
            doctor,
            contact,
            notes,
            patient: Some(patient),
            color,
        }
    }

    /// Records with ids `1..=count`.
    pub fn medications(&mut self, count: usize) -> Vec<MedicationRecord> {
        (1..=count as i64).map(|id| self.medication(id)).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + self.rng.int_n((max - min + 1) as usize) as u32
    }

    fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn phone_number(&mut self) -> String {
        format!(
            "+1 ({}) {}-{:04}",
            self.int_range(201, 989),
            self.int_range(200, 999),
            self.int_range(0, 9999)
        )
    }

    /// Somewhere in the 2021-10-20 .. 2021-10-24 window.
    fn order_datetime(&mut self) -> OffsetDateTime {
        let start = datetime!(2021-10-20 00:00:00 UTC);
        let window_seconds = 4 * 24 * 60 * 60;
        start + Duration::seconds(self.rng.int_n(window_seconds) as i64)
    }

    /// One to three distinct tags, in catalog order.
    fn tags(&mut self) -> Vec<String> {
        let wanted = 1 + self.rng.int_n(3);
        let mut chosen: Vec<usize> = Vec::with_capacity(wanted);
        while chosen.len() < wanted {
            let index = self.rng.int_n(PATIENT_TAGS.len());
            if !chosen.contains(&index) {
                chosen.push(index);
            }
        }
        chosen.sort_unstable();
        chosen
            .into_iter()
            .map(|index| PATIENT_TAGS[index].to_owned())
            .collect()
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words - min_words + 1);
        let words: Vec<&str> = (0..count).map(|_| self.pick(&NOTE_WORDS)).collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

/// The fixed demo dataset served by `--demo`.
pub fn demo_medications() -> Vec<MedicationRecord> {
    MedicationFaker::new(DEMO_SEED).medications(DEMO_RECORD_COUNT)
}
