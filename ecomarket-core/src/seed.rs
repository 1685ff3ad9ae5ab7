//! Seed catalog of eco-themed companies for bootstrapping a fresh market.

use crate::domain::{CompanyId, CompanySpec, PricePoint};
use crate::store::MarketStore;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

struct SeedCompany {
    name: &'static str,
    description: &'static str,
    sector: &'static str,
    // Rating in tenths, price in cents, so the catalog stays const-friendly.
    rating_tenths: i64,
    price_cents: i64,
}

const COMPANY_CATALOG: &[SeedCompany] = &[
    SeedCompany {
        name: "EcoGreen Energy",
        description: "A renewable energy company focusing on wind and solar power solutions.",
        sector: "Energy",
        rating_tenths: 90,
        price_cents: 15000,
    },
    SeedCompany {
        name: "Sustainable Farms",
        description: "An enterprise practicing organic and regenerative farming.",
        sector: "Agriculture",
        rating_tenths: 85,
        price_cents: 12000,
    },
    SeedCompany {
        name: "Green Urban Solutions",
        description: "Innovative sustainable urban planning and green construction.",
        sector: "Construction",
        rating_tenths: 75,
        price_cents: 20000,
    },
    SeedCompany {
        name: "EcoTech Innovations",
        description: "Develops cutting-edge eco-friendly technology products.",
        sector: "Technology",
        rating_tenths: 80,
        price_cents: 18000,
    },
    SeedCompany {
        name: "Renewable Power Inc.",
        description: "Specializes in wind and solar power installations.",
        sector: "Energy",
        rating_tenths: 92,
        price_cents: 21000,
    },
    SeedCompany {
        name: "Clean Air Initiatives",
        description: "Works on reducing air pollution through innovative technology.",
        sector: "Environmental Services",
        rating_tenths: 78,
        price_cents: 16000,
    },
    SeedCompany {
        name: "BioGreen Solutions",
        description: "Focuses on biotechnological solutions for environmental cleanup.",
        sector: "Biotechnology",
        rating_tenths: 83,
        price_cents: 17500,
    },
    SeedCompany {
        name: "WaterWise Systems",
        description: "Develops sustainable water management and conservation technologies.",
        sector: "Utilities",
        rating_tenths: 86,
        price_cents: 19000,
    },
    SeedCompany {
        name: "Green Future Materials",
        description: "Produces environmentally friendly building materials.",
        sector: "Materials",
        rating_tenths: 79,
        price_cents: 15500,
    },
    SeedCompany {
        name: "Eco-Friendly Transport",
        description: "Invests in electric and hybrid transportation solutions.",
        sector: "Transportation",
        rating_tenths: 81,
        price_cents: 16500,
    },
    SeedCompany {
        name: "SolarWave Energy",
        description: "Focuses on advanced solar panel technology and energy storage.",
        sector: "Energy",
        rating_tenths: 91,
        price_cents: 20500,
    },
    SeedCompany {
        name: "Nature's Touch",
        description: "Promotes sustainable and organic personal care products.",
        sector: "Consumer Goods",
        rating_tenths: 74,
        price_cents: 14000,
    },
    SeedCompany {
        name: "Urban Eco Systems",
        description: "Provides eco-friendly urban landscaping and waste management solutions.",
        sector: "Environmental Services",
        rating_tenths: 80,
        price_cents: 16500,
    },
    SeedCompany {
        name: "Green Horizon Ventures",
        description: "Invests in next-generation sustainable technology startups.",
        sector: "Finance",
        rating_tenths: 87,
        price_cents: 22000,
    },
    SeedCompany {
        name: "Pure Earth Resources",
        description: "Specializes in recycling and sustainable resource management.",
        sector: "Environmental Services",
        rating_tenths: 78,
        price_cents: 15000,
    },
    SeedCompany {
        name: "Eco Innovations Group",
        description: "A leader in eco-friendly product design and sustainable development.",
        sector: "Technology",
        rating_tenths: 82,
        price_cents: 17000,
    },
    SeedCompany {
        name: "Green Tech Solutions",
        description: "Provides smart, sustainable tech solutions for urban challenges.",
        sector: "Technology",
        rating_tenths: 84,
        price_cents: 18500,
    },
    SeedCompany {
        name: "Sustainable Logistics",
        description: "Focuses on eco-friendly logistics and supply chain optimization.",
        sector: "Transportation",
        rating_tenths: 76,
        price_cents: 14500,
    },
    SeedCompany {
        name: "Organic Harvest Co.",
        description: "Produces organic foods and supports sustainable farming practices.",
        sector: "Agriculture",
        rating_tenths: 80,
        price_cents: 13000,
    },
    SeedCompany {
        name: "Renewable Innovations",
        description: "Researches and develops breakthrough renewable energy technologies.",
        sector: "Energy",
        rating_tenths: 89,
        price_cents: 19500,
    },
];

/// Full catalog as insertable specs, in catalog order.
pub fn company_catalog() -> Vec<CompanySpec> {
    COMPANY_CATALOG
        .iter()
        .map(|c| CompanySpec {
            name: c.name.to_string(),
            description: c.description.to_string(),
            sector: Some(c.sector.to_string()),
            sustainability_rating: Decimal::new(c.rating_tenths, 1),
            initial_price: Decimal::new(c.price_cents, 2),
        })
        .collect()
}

/// Number of companies in the catalog.
pub fn catalog_len() -> usize {
    COMPANY_CATALOG.len()
}

/// Insert the first `count` catalog companies, each with an initial price
/// history point so charts start at the listing price.
pub fn seed_companies(store: &MarketStore, count: usize, now: DateTime<Utc>) -> Vec<CompanyId> {
    let specs: Vec<CompanySpec> = company_catalog().into_iter().take(count).collect();
    let ids: Vec<CompanyId> = specs
        .into_iter()
        .map(|spec| {
            let price = spec.initial_price;
            let id = store.insert_company(spec);
            store.write(|t| {
                t.price_history.push(PricePoint {
                    company: id,
                    price,
                    timestamp: now,
                });
            });
            id
        })
        .collect();
    info!(companies = ids.len(), "market seeded");
    ids
}
