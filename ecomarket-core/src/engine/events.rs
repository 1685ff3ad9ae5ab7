//! Event injector — periodically manufactures randomized market events.
//!
//! Each invocation picks a (title, description) pair from the curated
//! eco-themed catalog (repetition across events allowed), draws an impact
//! factor and a lifetime, and assigns the event to a random non-empty subset
//! of companies. No deduplication: repeated invocations simply add more
//! events.

use crate::config::MarketConfig;
use crate::domain::{CompanyId, EventId, MarketEvent};
use crate::error::Result;
use crate::rng::SeedHierarchy;
use crate::store::MarketStore;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Curated (title, description) pairs the injector samples from.
pub const EVENT_CATALOG: &[(&str, &str)] = &[
    (
        "Government Green Subsidy",
        "A new subsidy for renewable energy boosts investor confidence.",
    ),
    (
        "Environmental Scandal",
        "A company is caught in an environmental scandal, causing stock prices to drop.",
    ),
    (
        "Sustainability Award",
        "A company wins a prestigious sustainability award, spiking its stock price.",
    ),
    (
        "Technological Breakthrough",
        "A breakthrough in eco-friendly technology improves prospects for green companies.",
    ),
    (
        "Policy Change",
        "A new government policy supports sustainable practices.",
    ),
    (
        "Market Rally",
        "A general market rally lifts all sustainable stocks temporarily.",
    ),
    (
        "Global Conference",
        "A major international conference on climate change boosts sustainable investments.",
    ),
    (
        "Carbon Tax Implementation",
        "A new carbon tax is introduced, increasing costs for polluting industries.",
    ),
    (
        "Green Bond Issuance",
        "A corporation issues green bonds, attracting eco-conscious investors.",
    ),
    (
        "Deforestation Crisis",
        "A deforestation crisis in a major rainforest sparks global outrage and impacts related industries.",
    ),
    (
        "Renewable Energy Milestone",
        "A country achieves a major milestone in renewable energy adoption, inspiring global markets.",
    ),
    (
        "Plastic Ban",
        "A nationwide ban on single-use plastics disrupts industries but boosts alternatives.",
    ),
    (
        "Climate Protest",
        "Massive climate protests lead to increased scrutiny on corporate environmental practices.",
    ),
    (
        "Oil Spill Disaster",
        "A catastrophic oil spill damages a company's reputation and stock value.",
    ),
    (
        "Electric Vehicle Boom",
        "A surge in electric vehicle sales boosts related stocks and technologies.",
    ),
    (
        "Greenwashing Exposed",
        "A company is exposed for greenwashing, leading to a sharp decline in its stock price.",
    ),
    (
        "Extreme Weather Event",
        "An extreme weather event highlights the urgency of climate action, impacting insurance and energy sectors.",
    ),
    (
        "Corporate Net-Zero Pledge",
        "A Fortune 500 company pledges to achieve net-zero emissions by 2030, boosting its stock.",
    ),
    (
        "Solar Power Price Drop",
        "A significant drop in solar power costs accelerates adoption and boosts related stocks.",
    ),
    (
        "Water Scarcity Crisis",
        "A water scarcity crisis in a major region impacts agricultural and industrial stocks.",
    ),
    (
        "ESG Reporting Mandate",
        "A new mandate requiring ESG reporting increases transparency and investor confidence.",
    ),
    (
        "Green Tech IPO",
        "A green technology company goes public, drawing significant investor interest.",
    ),
    (
        "Ocean Cleanup Initiative",
        "A global ocean cleanup initiative gains traction, benefiting waste management and recycling stocks.",
    ),
    (
        "Climate Litigation",
        "A major corporation faces litigation over climate-related damages, causing stock volatility.",
    ),
    (
        "Green Hydrogen Expansion",
        "A major expansion in green hydrogen production attracts investor interest.",
    ),
    (
        "Plant-Based Food Surge",
        "A surge in demand for plant-based foods drives growth in alternative protein companies.",
    ),
];

/// Create one randomized event inside a single store transaction.
///
/// With no companies seeded the event is still created, unassigned — logged,
/// not fatal.
pub(crate) fn inject_event(
    store: &MarketStore,
    config: &MarketConfig,
    seeds: &SeedHierarchy,
    now: DateTime<Utc>,
    tick: u64,
) -> Result<EventId> {
    let mut rng = seeds.rng_for("events", "inject", tick);

    let (title, description) = EVENT_CATALOG[rng.gen_range(0..EVENT_CATALOG.len())];
    // Hundredths, matching the 2 dp quantization of the impact factor.
    let impact_factor = Decimal::new(
        rng.gen_range(config.event_impact_min_pct..=config.event_impact_max_pct),
        2,
    );
    let duration_minutes =
        rng.gen_range(config.event_duration_min_minutes..=config.event_duration_max_minutes);

    store.write(|t| {
        let company_ids: Vec<CompanyId> = t.companies.keys().copied().collect();
        let affected: Vec<CompanyId> = if company_ids.is_empty() {
            warn!(title, "no companies available to assign to event");
            Vec::new()
        } else {
            let subset_size = rng.gen_range(1..=(company_ids.len() / 2).max(1));
            company_ids
                .choose_multiple(&mut rng, subset_size)
                .copied()
                .collect()
        };

        let id = t.alloc_event_id();
        info!(
            %id,
            title,
            impact = %impact_factor,
            duration_minutes,
            affected = affected.len(),
            "market event injected"
        );
        t.events.push(MarketEvent {
            id,
            title: title.to_string(),
            description: description.to_string(),
            impact_factor,
            created_at: now,
            duration_minutes,
            affected_companies: affected,
        });
        Ok(id)
    })
}
