use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Development product type. Descriptive only; no formula branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    #[default]
    Residential,
    Commercial,
    MixedUse,
    Industrial,
    Retail,
    Office,
    Hotel,
    Multifamily,
    SingleFamily,
    LandDevelopment,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Residential => "residential",
            ProjectType::Commercial => "commercial",
            ProjectType::MixedUse => "mixed-use",
            ProjectType::Industrial => "industrial",
            ProjectType::Retail => "retail",
            ProjectType::Office => "office",
            ProjectType::Hotel => "hotel",
            ProjectType::Multifamily => "multifamily",
            ProjectType::SingleFamily => "single-family",
            ProjectType::LandDevelopment => "land-development",
        }
    }
}

/// Independent 1–10 risk scores, 10 being the most severe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskFactors {
    pub construction_risk: u8,
    pub market_risk: u8,
    pub financing_risk: u8,
    pub regulatory_risk: u8,
    pub environmental_risk: u8,
    pub weather_risk: u8,
    pub labor_risk: u8,
    pub material_risk: u8,
}

impl Default for RiskFactors {
    fn default() -> Self {
        Self {
            construction_risk: 5,
            market_risk: 4,
            financing_risk: 3,
            regulatory_risk: 4,
            environmental_risk: 2,
            weather_risk: 3,
            labor_risk: 4,
            material_risk: 5,
        }
    }
}

impl RiskFactors {
    /// All eight scores paired with a display name, in declaration order.
    pub fn named(&self) -> [(&'static str, u8); 8] {
        [
            ("construction", self.construction_risk),
            ("market", self.market_risk),
            ("financing", self.financing_risk),
            ("regulatory", self.regulatory_risk),
            ("environmental", self.environmental_risk),
            ("weather", self.weather_risk),
            ("labor", self.labor_risk),
            ("material", self.material_risk),
        ]
    }
}

/// Flat record of every assumption the pro-forma reads.
///
/// Percent fields are whole percentages (`5.0` = 5%). Period fields are in
/// months except `hold_period` (years) and `loan_term` (years). Missing
/// fields deserialize to the defaults of a 50,000 sq ft residential scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputAssumptions {
    // --- Project ---
    pub project_name: String,
    pub project_type: ProjectType,
    /// Rentable building area in sq ft
    pub project_size: f64,
    /// Site area in acres
    pub land_size: f64,
    /// Units per acre
    pub density: f64,
    /// Storeys
    pub building_height: f64,

    // --- One-time costs ---
    pub land_cost: Money,
    pub acquisition_costs: Money,
    /// Hard construction cost per sq ft
    pub construction_cost: Money,
    /// Soft costs as a % of hard construction cost
    pub soft_costs: Percent,
    /// Contingency as a % of land, acquisition, construction and soft costs
    pub contingency: Percent,
    pub financing_costs: Money,
    pub marketing_costs: Money,
    pub legal_costs: Money,
    pub insurance_costs: Money,

    // --- Recurring operating costs (annual) ---
    pub property_taxes: Money,
    pub utilities: Money,
    pub maintenance_costs: Money,
    /// Management fee as a % of effective gross income
    pub management_fees: Percent,

    // --- Revenue ---
    /// Monthly rent per sq ft
    pub market_rent: Money,
    pub vacancy_rate: Percent,
    pub rent_growth_rate: Percent,
    pub expense_growth_rate: Percent,
    pub inflation_rate: Percent,

    // --- Financing ---
    pub loan_amount: Money,
    pub interest_rate: Percent,
    /// Amortization term in years
    pub loan_term: u32,
    pub loan_to_cost: Percent,
    pub equity_contribution: Money,
    pub equity_return: Percent,

    // --- Market ---
    pub market_cap_rate: Percent,
    pub market_vacancy: Percent,
    pub market_appreciation: Percent,

    // --- Risk ---
    pub risk_factors: RiskFactors,

    // --- Timeline ---
    pub construction_start_date: NaiveDate,
    pub construction_duration: u32,
    pub lease_up_period: u32,
    pub stabilization_period: u32,
    /// Hold after stabilization, in years
    pub hold_period: u32,
    pub discount_rate: Percent,
    pub exit_cap_rate: Percent,
    /// Selling costs as a % of the exit value
    pub exit_costs: Percent,
}

impl Default for InputAssumptions {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            project_type: ProjectType::Residential,
            project_size: 50_000.0,
            land_size: 5.0,
            density: 20.0,
            building_height: 3.0,

            land_cost: 1_000_000.0,
            acquisition_costs: 50_000.0,
            construction_cost: 200.0,
            soft_costs: 15.0,
            contingency: 10.0,
            financing_costs: 100_000.0,
            marketing_costs: 50_000.0,
            legal_costs: 25_000.0,
            insurance_costs: 15_000.0,

            property_taxes: 20_000.0,
            utilities: 10_000.0,
            maintenance_costs: 15_000.0,
            management_fees: 5.0,

            market_rent: 2.5,
            vacancy_rate: 5.0,
            rent_growth_rate: 3.0,
            expense_growth_rate: 2.0,
            inflation_rate: 2.5,

            loan_amount: 8_000_000.0,
            interest_rate: 6.5,
            loan_term: 30,
            loan_to_cost: 75.0,
            equity_contribution: 3_000_000.0,
            equity_return: 15.0,

            market_cap_rate: 6.0,
            market_vacancy: 5.0,
            market_appreciation: 3.0,

            risk_factors: RiskFactors::default(),

            construction_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            construction_duration: 18,
            lease_up_period: 12,
            stabilization_period: 6,
            hold_period: 5,
            discount_rate: 10.0,
            exit_cap_rate: 6.0,
            exit_costs: 6.0,
        }
    }
}

impl InputAssumptions {
    /// Occupancy once lease-up completes, as a percentage.
    pub fn stabilized_occupancy(&self) -> Percent {
        100.0 - self.vacancy_rate
    }

    /// Construction, lease-up and stabilization months. Saturates at `u32::MAX`.
    pub fn development_months(&self) -> u32 {
        self.construction_duration
            .saturating_add(self.lease_up_period)
            .saturating_add(self.stabilization_period)
    }

    /// Development months plus the hold period. Saturates at `u32::MAX`.
    pub fn total_months(&self) -> u32 {
        self.development_months()
            .saturating_add(self.hold_period.saturating_mul(12))
    }
}
