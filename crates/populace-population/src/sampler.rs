//! Correlated attribute sampling for one synthetic individual.
//!
//! Attributes are drawn in dependency order. Each stage may read the
//! outputs of earlier stages, so income follows age, occupation follows
//! age and income, education follows occupation and income, and the
//! value tags and lifestyle follow everything before them. Every branch
//! has a default; sampling never fails.

use populace_types::{
    AdoptionStage, CoreValue, Individual, IndividualId, IncomeLevel, Lifestyle, MAX_VALUE_TAGS,
    PersonalityTraits, PopulationParameters, TraitLevel,
};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::tables::{
    AGREEABLE_VALUES, BUDGET_INCOME, CONSCIENTIOUS_VALUES, FALLBACK_LIFESTYLES, HIGH_EDUCATION,
    HIGH_INCOME, HIGH_OCCUPATIONS, LOW_EDUCATION, LOW_OCCUPATIONS, LUXURY_INCOME,
    MIDDLE_EDUCATION, MIDDLE_INCOME, MIDDLE_OCCUPATIONS, OPENNESS_VALUES, OUTGOING_URBAN_CITY,
    STUDENT_EDUCATION, TRAIT_THRESHOLD, URBAN_CITY, YOUNG_OCCUPATIONS, age_values, age_weight,
    cities, income_age_multiplier, income_range, income_values, innovation_candidates,
    price_candidates, tech_candidates,
};

/// Mean of the personality-score distribution.
const TRAIT_MEAN: f64 = 0.5;

/// Standard deviation of the personality-score distribution.
const TRAIT_STD_DEV: f64 = 0.2;

/// Probability that an individual under 25 takes an entry-level job.
const YOUNG_OCCUPATION_PROBABILITY: f64 = 0.3;

/// Draws individuals for one set of population parameters.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSampler<'a> {
    params: &'a PopulationParameters,
}

impl<'a> AttributeSampler<'a> {
    /// Create a sampler bound to the given parameters.
    pub const fn new(params: &'a PopulationParameters) -> Self {
        Self { params }
    }

    /// Draw one individual using the supplied random source.
    pub fn sample(&self, rng: &mut impl Rng) -> Individual {
        let params = self.params;

        let age = sample_age(rng, params.age_bounds());
        let income = sample_income(rng, params.income_level, age);
        let location = pick(rng, cities(params.region)).unwrap_or(OUTGOING_URBAN_CITY);
        let occupation = sample_occupation(rng, age, income);
        let education = sample_education(rng, occupation, income);

        let tech_savviness = params
            .tech_savvy
            .fixed()
            .unwrap_or_else(|| pick(rng, tech_candidates(age)).unwrap_or(TraitLevel::Medium));
        let price_sensitivity = params
            .price_sensitive
            .fixed()
            .unwrap_or_else(|| pick(rng, price_candidates(income)).unwrap_or(TraitLevel::Medium));
        let innovation_adoption = params.innovation.fixed().unwrap_or_else(|| {
            pick(rng, innovation_candidates(age, tech_savviness))
                .unwrap_or(AdoptionStage::Mainstream)
        });

        let personality_traits = sample_personality(rng);
        let values = sample_values(rng, age, income, &personality_traits);
        let lifestyle = sample_lifestyle(rng, age, income, location, &personality_traits);

        Individual {
            id: IndividualId::new(),
            age,
            income,
            location: location.to_owned(),
            occupation: occupation.to_owned(),
            education: education.to_owned(),
            tech_savviness,
            price_sensitivity,
            innovation_adoption,
            personality_traits,
            values,
            lifestyle,
        }
    }
}

/// Uniform choice from a slice; `None` only when the slice is empty.
fn pick<T: Copy>(rng: &mut impl Rng, items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..items.len());
    items.get(idx).copied()
}

/// Weighted age draw over the inclusive bounds.
fn sample_age(rng: &mut impl Rng, (min, max): (u32, u32)) -> u32 {
    let total: u64 = (min..=max).map(|age| u64::from(age_weight(age))).sum();
    if total == 0 {
        return min;
    }

    let mut draw = rng.random_range(0..total);
    for age in min..=max {
        let weight = u64::from(age_weight(age));
        if draw < weight {
            return age;
        }
        draw = draw.saturating_sub(weight);
    }
    max
}

/// Uniform base income scaled by the career-stage multiplier.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sample_income(rng: &mut impl Rng, level: IncomeLevel, age: u32) -> u32 {
    let (low, high) = income_range(level);
    let base = rng.random_range(low..=high);
    (f64::from(base) * income_age_multiplier(age)) as u32
}

fn sample_occupation(rng: &mut impl Rng, age: u32, income: u32) -> &'static str {
    if age < 25 && rng.random_bool(YOUNG_OCCUPATION_PROBABILITY) {
        return pick(rng, YOUNG_OCCUPATIONS).unwrap_or("Student");
    }

    let tier = if income > HIGH_INCOME {
        HIGH_OCCUPATIONS
    } else if income > MIDDLE_INCOME {
        MIDDLE_OCCUPATIONS
    } else {
        LOW_OCCUPATIONS
    };
    pick(rng, tier).unwrap_or("Service Worker")
}

fn sample_education(rng: &mut impl Rng, occupation: &str, income: u32) -> &'static str {
    let tier = if occupation.contains("Student") {
        STUDENT_EDUCATION
    } else if income > HIGH_INCOME {
        HIGH_EDUCATION
    } else if income > MIDDLE_INCOME {
        MIDDLE_EDUCATION
    } else {
        LOW_EDUCATION
    };
    pick(rng, tier).unwrap_or("High School")
}

/// Five independent normal draws, clamped and rounded to two decimals.
fn sample_personality(rng: &mut impl Rng) -> PersonalityTraits {
    PersonalityTraits {
        openness: personality_score(rng),
        conscientiousness: personality_score(rng),
        extraversion: personality_score(rng),
        agreeableness: personality_score(rng),
        neuroticism: personality_score(rng),
    }
}

fn personality_score(rng: &mut impl Rng) -> f64 {
    let raw = Normal::new(TRAIT_MEAN, TRAIT_STD_DEV).map_or(TRAIT_MEAN, |normal| normal.sample(rng));
    (raw.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Distinct value tags drawn without replacement from the candidate pool.
///
/// The pool lists age tags, then income tags, then personality tags, with
/// duplicates removed on first occurrence. Between three and
/// [`MAX_VALUE_TAGS`] tags are drawn using a partial Fisher-Yates shuffle,
/// so a fixed seed always yields the same tags in the same order.
fn sample_values(
    rng: &mut impl Rng,
    age: u32,
    income: u32,
    traits: &PersonalityTraits,
) -> Vec<CoreValue> {
    const NONE: &[CoreValue] = &[];

    let sources = [
        age_values(age),
        income_values(income),
        if traits.openness > TRAIT_THRESHOLD { OPENNESS_VALUES } else { NONE },
        if traits.conscientiousness > TRAIT_THRESHOLD { CONSCIENTIOUS_VALUES } else { NONE },
        if traits.agreeableness > TRAIT_THRESHOLD { AGREEABLE_VALUES } else { NONE },
    ];

    let mut pool: Vec<CoreValue> = Vec::new();
    for tag in sources.into_iter().flatten() {
        if !pool.contains(tag) {
            pool.push(*tag);
        }
    }

    let wanted = rng
        .random_range(3..=6_usize)
        .min(MAX_VALUE_TAGS)
        .min(pool.len());
    for i in 0..wanted {
        let j = rng.random_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(wanted);
    pool
}

fn sample_lifestyle(
    rng: &mut impl Rng,
    age: u32,
    income: u32,
    location: &str,
    traits: &PersonalityTraits,
) -> Lifestyle {
    if age < 25 {
        Lifestyle::Student
    } else if age > 60 {
        Lifestyle::Retiree
    } else if income > LUXURY_INCOME {
        Lifestyle::LuxuryOriented
    } else if income < BUDGET_INCOME {
        Lifestyle::BudgetConscious
    } else if (traits.extraversion > TRAIT_THRESHOLD && location.contains(OUTGOING_URBAN_CITY))
        || location.contains(URBAN_CITY)
    {
        Lifestyle::UrbanProfessional
    } else if traits.openness > TRAIT_THRESHOLD {
        Lifestyle::Entrepreneur
    } else {
        pick(rng, FALLBACK_LIFESTYLES).unwrap_or(Lifestyle::SuburbanFamily)
    }
}
