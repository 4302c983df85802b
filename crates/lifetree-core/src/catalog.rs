//! The event catalog: fixed universal milestones plus the three sampled
//! pools.
//!
//! The generator only ever reads from a catalog, so alternative catalogs
//! (other languages, themed journeys) are a matter of constructing a
//! different [`EventCatalog`].

use lifetree_types::{EventCategory, LifeEvent};

/// `(name, age)` pairs of the universal milestones.
const UNIVERSAL: &[(&str, u8)] = &[("Birth", 0), ("Coming of Age", 18), ("Death", 99)];

const STANDARD: &[(&str, u8)] = &[
    ("First Steps", 4),
    ("First Day of School", 6),
    ("Best Friend", 10),
    ("First Kiss", 14),
    ("Driver's License", 16),
    ("University Graduation", 22),
    ("Trip Abroad", 24),
    ("First Real Job", 25),
    ("Moving Out", 27),
    ("Wedding", 28),
    ("Promotion", 30),
    ("Buying a Home", 32),
    ("First Child Born", 35),
    ("Second Child Born", 38),
    ("Midlife Crisis", 45),
    ("Child's Wedding", 52),
    ("Partial Retirement", 60),
    ("Retirement Party", 65),
    ("Golden Anniversary", 70),
    ("First Grandchild Born", 75),
];

/// Hard trials.
const KARMIC: &[(&str, u8)] = &[
    ("Household Accident", 8),
    ("Severe School Bullying", 12),
    ("School Suspension", 15),
    ("Car Accident", 20),
    ("Painful Breakup", 23),
    ("Unexpected Debt", 26),
    ("Sudden Layoff", 30),
    ("Partner's Betrayal", 34),
    ("Bitter Divorce", 38),
    ("Bankruptcy", 42),
    ("Cancer Diagnosis", 48),
    ("House Fire", 55),
    ("Death of Spouse", 60),
    ("Financial Scam", 68),
    ("Serious Fall", 72),
    ("Dementia", 80),
    ("Utter Loneliness", 88),
];

/// Gifts.
const DHARMIC: &[(&str, u8)] = &[
    ("School Award", 7),
    ("Discovering a Talent", 16),
    ("Inspiring Mentor", 19),
    ("Prestigious Scholarship", 24),
    ("Business Opportunity", 29),
    ("Viral Fame", 33),
    ("Lottery Win", 40),
    ("Masterpiece Created", 46),
    ("Miraculous Recovery", 50),
    ("Unexpected Inheritance", 58),
    ("Moving Reunion", 62),
    ("Worldwide Recognition", 70),
    ("Meeting a Great-Grandchild", 78),
    ("Extraordinary Lucidity", 85),
    ("Deep Spiritual Peace", 92),
];

/// Fixed universal events plus one pool per sampled category.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCatalog {
    universal: Vec<LifeEvent>,
    standard: Vec<LifeEvent>,
    karmic: Vec<LifeEvent>,
    dharmic: Vec<LifeEvent>,
}

impl EventCatalog {
    /// Build a catalog from explicit pools.
    ///
    /// The category of every event is overwritten with the category of the
    /// pool it was passed in, so a pool cannot smuggle in foreign events.
    pub fn new(
        universal: Vec<LifeEvent>,
        standard: Vec<LifeEvent>,
        karmic: Vec<LifeEvent>,
        dharmic: Vec<LifeEvent>,
    ) -> Self {
        Self {
            universal: recategorize(universal, EventCategory::Universal),
            standard: recategorize(standard, EventCategory::Standard),
            karmic: recategorize(karmic, EventCategory::Karmic),
            dharmic: recategorize(dharmic, EventCategory::Dharmic),
        }
    }

    /// The universal milestones, present in every life.
    pub fn universal(&self) -> &[LifeEvent] {
        &self.universal
    }

    /// The pool for a category. `Universal` returns the universal events.
    pub fn pool(&self, category: EventCategory) -> &[LifeEvent] {
        match category {
            EventCategory::Universal => &self.universal,
            EventCategory::Standard => &self.standard,
            EventCategory::Karmic => &self.karmic,
            EventCategory::Dharmic => &self.dharmic,
        }
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self {
            universal: build_pool(UNIVERSAL, EventCategory::Universal),
            standard: build_pool(STANDARD, EventCategory::Standard),
            karmic: build_pool(KARMIC, EventCategory::Karmic),
            dharmic: build_pool(DHARMIC, EventCategory::Dharmic),
        }
    }
}

fn build_pool(entries: &[(&str, u8)], category: EventCategory) -> Vec<LifeEvent> {
    entries
        .iter()
        .map(|&(name, age)| LifeEvent::at_age(name, age, category))
        .collect()
}

fn recategorize(mut events: Vec<LifeEvent>, category: EventCategory) -> Vec<LifeEvent> {
    for event in &mut events {
        event.category = category;
        event.triggered = false;
    }
    events
}
