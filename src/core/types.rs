use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PropertyType {
    Neuf,
    Ancien,
}

impl PropertyType {
    // Only "neuf" selects the new-build notary rate; every other name,
    // typos included, behaves as "ancien".
    pub fn from_name(name: &str) -> Self {
        if name == "neuf" {
            PropertyType::Neuf
        } else {
            PropertyType::Ancien
        }
    }
}

// Rates are annual percentages (3.5 means 3.5%); amounts are euros.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub property_price: f64,
    pub down_payment: f64,
    pub interest_rate: f64,
    pub term_years: u32,
    pub appreciation_rate: f64,
    pub property_tax: f64,
    pub service_charges: f64,
    pub maintenance: f64,
    pub property_type: PropertyType,
    pub inflation_rate: f64,
    pub monthly_rent: f64,
    pub reinvestment_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseYear {
    pub year: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub cumulative_principal: f64,
    pub property_tax: f64,
    pub service_charges: f64,
    pub maintenance: f64,
    pub appreciation: f64,
    pub capital_total: f64,
    pub property_value: f64,
}

#[derive(Debug, Clone)]
pub struct PurchaseSchedule {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub years: Vec<PurchaseYear>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalYear {
    pub year: u32,
    pub rent: f64,
    pub difference: f64,
    pub reinvestment_interest: f64,
    pub capital_total: f64,
}

#[derive(Debug, Clone)]
pub struct RentalSchedule {
    pub total_rent_paid: f64,
    pub years: Vec<RentalYear>,
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub notary_fee: f64,
    pub total_amount_with_fees: f64,
    pub loan_amount: f64,
    pub purchase: PurchaseSchedule,
    pub rental: RentalSchedule,
}
