//! Fixed lookup tables used by the attribute sampler.
//!
//! Everything here is static data. Selection logic lives in
//! [`crate::sampler`].

use populace_types::{AdoptionStage, CoreValue, IncomeLevel, Lifestyle, Region, TraitLevel};

// -----------------------------------------------------------------------
// Locations
// -----------------------------------------------------------------------

const US_CITIES: &[&str] = &[
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia",
    "San Antonio", "San Diego", "Dallas", "San Jose", "Austin", "Jacksonville",
];

const EUROPE_CITIES: &[&str] = &[
    "London", "Paris", "Berlin", "Madrid", "Rome", "Amsterdam",
    "Vienna", "Stockholm", "Copenhagen", "Dublin", "Brussels", "Zurich",
];

const ASIA_CITIES: &[&str] = &[
    "Tokyo", "Shanghai", "Mumbai", "Seoul", "Singapore", "Hong Kong",
    "Bangkok", "Jakarta", "Manila", "Kuala Lumpur", "Taipei", "Osaka",
];

const GLOBAL_CITIES: &[&str] = &[
    "New York", "London", "Tokyo", "Shanghai", "Los Angeles", "Paris",
    "Berlin", "Mumbai", "São Paulo", "Sydney", "Toronto", "Dubai",
];

/// City list for a region.
pub const fn cities(region: Region) -> &'static [&'static str] {
    match region {
        Region::Us => US_CITIES,
        Region::Europe => EUROPE_CITIES,
        Region::Asia => ASIA_CITIES,
        Region::Global => GLOBAL_CITIES,
    }
}

// -----------------------------------------------------------------------
// Income
// -----------------------------------------------------------------------

/// Inclusive base income range for a requested income level, before the
/// age multiplier is applied.
pub const fn income_range(level: IncomeLevel) -> (u32, u32) {
    match level {
        IncomeLevel::Low => (20_000, 40_000),
        IncomeLevel::Middle => (40_000, 80_000),
        IncomeLevel::High => (80_000, 200_000),
        IncomeLevel::Mixed => (20_000, 150_000),
    }
}

/// Career-stage multiplier applied to the base income.
pub const fn income_age_multiplier(age: u32) -> f64 {
    match age {
        0..25 => 0.7,
        25..35 => 1.0,
        35..45 => 1.3,
        45..55 => 1.4,
        _ => 1.2,
    }
}

/// Relative sampling weight of an age.
pub const fn age_weight(age: u32) -> u32 {
    match age {
        25..=45 => 3,
        18..=24 | 46..=55 => 2,
        _ => 1,
    }
}

/// Income above which the high tier applies.
pub const HIGH_INCOME: u32 = 80_000;

/// Income above which the middle tier applies.
pub const MIDDLE_INCOME: u32 = 40_000;

/// Income above which the lifestyle is luxury-oriented.
pub const LUXURY_INCOME: u32 = 100_000;

/// Income below which the lifestyle is budget-conscious.
pub const BUDGET_INCOME: u32 = 35_000;

// -----------------------------------------------------------------------
// Occupation and education
// -----------------------------------------------------------------------

/// Entry-level occupations offered to individuals under 25.
pub const YOUNG_OCCUPATIONS: &[&str] = &[
    "Student",
    "Retail Worker",
    "Service Worker",
    "Administrative Assistant",
];

/// Occupations for incomes above [`HIGH_INCOME`].
pub const HIGH_OCCUPATIONS: &[&str] = &[
    "Software Developer",
    "Manager",
    "Engineer",
    "Consultant",
    "Financial Analyst",
    "Marketing Professional",
    "Entrepreneur",
];

/// Occupations for incomes above [`MIDDLE_INCOME`].
pub const MIDDLE_OCCUPATIONS: &[&str] = &[
    "Teacher",
    "Healthcare Worker",
    "Sales Representative",
    "Administrative Assistant",
    "Designer",
    "Government Employee",
];

/// Occupations for the remaining incomes.
pub const LOW_OCCUPATIONS: &[&str] = &[
    "Retail Worker",
    "Service Worker",
    "Manufacturing Worker",
    "Administrative Assistant",
    "Student",
];

/// Education levels for students.
pub const STUDENT_EDUCATION: &[&str] = &["High School", "Some College"];

/// Education levels for incomes above [`HIGH_INCOME`].
pub const HIGH_EDUCATION: &[&str] = &["Bachelor's Degree", "Master's Degree", "PhD"];

/// Education levels for incomes above [`MIDDLE_INCOME`].
pub const MIDDLE_EDUCATION: &[&str] = &[
    "High School",
    "Some College",
    "Bachelor's Degree",
    "Trade School",
];

/// Education levels for the remaining incomes.
pub const LOW_EDUCATION: &[&str] = &["High School", "Some College", "Trade School"];

// -----------------------------------------------------------------------
// Mixed-preference candidate lists
// -----------------------------------------------------------------------

/// Tech-savviness candidates by age. Younger skews high.
pub const fn tech_candidates(age: u32) -> &'static [TraitLevel] {
    if age < 30 {
        &[TraitLevel::Medium, TraitLevel::High, TraitLevel::High]
    } else if age > 50 {
        &[TraitLevel::Low, TraitLevel::Low, TraitLevel::Medium]
    } else {
        &[TraitLevel::Low, TraitLevel::Medium, TraitLevel::High]
    }
}

/// Price-sensitivity candidates by income. Higher income skews low.
pub const fn price_candidates(income: u32) -> &'static [TraitLevel] {
    if income > HIGH_INCOME {
        &[TraitLevel::Low, TraitLevel::Low, TraitLevel::Medium]
    } else if income > MIDDLE_INCOME {
        &[TraitLevel::Low, TraitLevel::Medium, TraitLevel::High]
    } else {
        &[TraitLevel::Medium, TraitLevel::High, TraitLevel::High]
    }
}

/// Innovation-adoption candidates by age and tech-savviness.
pub const fn innovation_candidates(age: u32, tech: TraitLevel) -> &'static [AdoptionStage] {
    if age < 35 && matches!(tech, TraitLevel::Medium | TraitLevel::High) {
        &[AdoptionStage::Early, AdoptionStage::Early, AdoptionStage::Mainstream]
    } else if age > 50 {
        &[AdoptionStage::Mainstream, AdoptionStage::Late, AdoptionStage::Late]
    } else {
        &[AdoptionStage::Early, AdoptionStage::Mainstream, AdoptionStage::Late]
    }
}

// -----------------------------------------------------------------------
// Value tags
// -----------------------------------------------------------------------

/// Value tags contributed by age bracket.
pub const fn age_values(age: u32) -> &'static [CoreValue] {
    if age < 30 {
        &[
            CoreValue::Innovation,
            CoreValue::Independence,
            CoreValue::Achievement,
            CoreValue::Convenience,
        ]
    } else if age < 50 {
        &[
            CoreValue::Family,
            CoreValue::Security,
            CoreValue::Quality,
            CoreValue::Achievement,
        ]
    } else {
        &[
            CoreValue::Security,
            CoreValue::Tradition,
            CoreValue::Health,
            CoreValue::Quality,
        ]
    }
}

/// Value tags contributed by income bracket.
pub const fn income_values(income: u32) -> &'static [CoreValue] {
    if income > HIGH_INCOME {
        &[CoreValue::Quality, CoreValue::Status, CoreValue::Convenience]
    } else {
        &[CoreValue::Security, CoreValue::Family, CoreValue::Community]
    }
}

/// Personality score above which a trait contributes value tags.
pub const TRAIT_THRESHOLD: f64 = 0.7;

/// Tags added when openness exceeds [`TRAIT_THRESHOLD`].
pub const OPENNESS_VALUES: &[CoreValue] = &[CoreValue::Innovation, CoreValue::Independence];

/// Tags added when conscientiousness exceeds [`TRAIT_THRESHOLD`].
pub const CONSCIENTIOUS_VALUES: &[CoreValue] = &[CoreValue::Quality, CoreValue::Achievement];

/// Tags added when agreeableness exceeds [`TRAIT_THRESHOLD`].
pub const AGREEABLE_VALUES: &[CoreValue] = &[CoreValue::Family, CoreValue::Community];

// -----------------------------------------------------------------------
// Lifestyle
// -----------------------------------------------------------------------

/// Lifestyles drawn uniformly when no override or heuristic applies.
pub const FALLBACK_LIFESTYLES: &[Lifestyle] = &[
    Lifestyle::SuburbanFamily,
    Lifestyle::UrbanProfessional,
    Lifestyle::RuralTraditional,
];

/// City that marks an extraverted individual as an urban professional.
pub const OUTGOING_URBAN_CITY: &str = "New York";

/// City that marks anyone living there as an urban professional.
pub const URBAN_CITY: &str = "London";
