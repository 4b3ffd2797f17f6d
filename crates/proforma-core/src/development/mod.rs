pub mod analysis;
pub mod assumptions;
pub mod cash_flow;
pub mod metrics;
pub mod pro_forma;
pub mod risk;
pub mod viability;
