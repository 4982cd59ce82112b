use super::types::{
    Comparison, Inputs, PropertyType, PurchaseSchedule, PurchaseYear, RentalSchedule, RentalYear,
};

const NOTARY_RATE_NEUF: f64 = 0.025;
const NOTARY_RATE_ANCIEN: f64 = 0.075;

pub fn notary_fee(property_price: f64, property_type: PropertyType) -> f64 {
    match property_type {
        PropertyType::Neuf => property_price * NOTARY_RATE_NEUF,
        PropertyType::Ancien => property_price * NOTARY_RATE_ANCIEN,
    }
}

// Fixed monthly payment M = P * r(1+r)^n / ((1+r)^n - 1). The annuity
// formula divides by zero at r = 0, where the loan degenerates to P / n.
fn annuity_monthly_payment(principal: f64, monthly_rate: f64, periods: u32) -> f64 {
    let n = periods.max(1);
    if monthly_rate.abs() < 1e-12 {
        return principal / n as f64;
    }
    let growth = (1.0 + monthly_rate).powi(n as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

#[allow(clippy::too_many_arguments)]
pub fn purchase_schedule(
    property_price: f64,
    principal: f64,
    interest_rate: f64,
    term_years: u32,
    appreciation_rate: f64,
    property_tax: f64,
    service_charges: f64,
    maintenance: f64,
    down_payment: f64,
    notary_fee: f64,
    inflation_rate: f64,
) -> PurchaseSchedule {
    let monthly_rate = interest_rate / 100.0 / 12.0;
    let periods = term_years * 12;
    let monthly_payment = annuity_monthly_payment(principal, monthly_rate, periods);

    let mut years = Vec::with_capacity(term_years as usize);
    let mut remaining_balance = principal;
    let mut cumulative_principal = 0.0;
    let mut capital_total = down_payment - notary_fee;

    for year in 1..=term_years {
        let mut yearly_interest = 0.0;
        let mut yearly_principal = 0.0;

        for _ in 0..12 {
            let interest_payment = remaining_balance * monthly_rate;
            let principal_payment = monthly_payment - interest_payment;

            yearly_interest += interest_payment;
            yearly_principal += principal_payment;
            cumulative_principal += principal_payment;
            remaining_balance -= principal_payment;
        }

        let property_value =
            property_price * (1.0 + appreciation_rate / 100.0).powi(year as i32 - 1);
        let appreciation = property_value * (appreciation_rate / 100.0);

        // Each base cost compounds with inflation independently.
        let cost_inflation = (1.0 + inflation_rate / 100.0).powi(year as i32 - 1);

        capital_total += yearly_principal + appreciation;

        years.push(PurchaseYear {
            year,
            payment: monthly_payment * 12.0,
            principal: yearly_principal,
            interest: yearly_interest,
            cumulative_principal,
            property_tax: property_tax * cost_inflation,
            service_charges: service_charges * cost_inflation,
            maintenance: maintenance * cost_inflation,
            appreciation,
            capital_total,
            property_value,
        });
    }

    let total_payment = monthly_payment * periods as f64;
    PurchaseSchedule {
        monthly_payment,
        total_payment,
        total_interest: total_payment - principal,
        years,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn rental_schedule(
    monthly_rent: f64,
    inflation_rate: f64,
    reinvestment_rate: f64,
    term_years: u32,
    first_year_purchase_payment: f64,
    property_tax: f64,
    service_charges: f64,
    maintenance: f64,
    down_payment: f64,
) -> RentalSchedule {
    // The ownership baseline stays at year-1 levels for the whole term:
    // the loan payment is the first year's, and the three costs are the
    // base amounts even though the purchase side inflates its own copies.
    let ownership_baseline =
        first_year_purchase_payment + property_tax + service_charges + maintenance;

    let mut years = Vec::with_capacity(term_years as usize);
    let mut capital_total = down_payment;
    let mut total_rent_paid = 0.0;

    for year in 1..=term_years {
        let rent = monthly_rent * 12.0 * (1.0 + inflation_rate / 100.0).powi(year as i32 - 1);
        let difference = ownership_baseline - rent;
        let reinvestment_interest = capital_total * (reinvestment_rate / 100.0);

        capital_total += difference + reinvestment_interest;
        total_rent_paid += rent;

        years.push(RentalYear {
            year,
            rent,
            difference,
            reinvestment_interest,
            capital_total,
        });
    }

    RentalSchedule {
        total_rent_paid,
        years,
    }
}

pub fn run_comparison(inputs: &Inputs) -> Comparison {
    let fee = notary_fee(inputs.property_price, inputs.property_type);
    let total_amount_with_fees = inputs.property_price + fee;
    let loan_amount = total_amount_with_fees - inputs.down_payment;

    let purchase = purchase_schedule(
        inputs.property_price,
        loan_amount,
        inputs.interest_rate,
        inputs.term_years,
        inputs.appreciation_rate,
        inputs.property_tax,
        inputs.service_charges,
        inputs.maintenance,
        inputs.down_payment,
        fee,
        inputs.inflation_rate,
    );

    let first_year_payment = purchase
        .years
        .first()
        .map(|y| y.payment)
        .unwrap_or(purchase.monthly_payment * 12.0);

    let rental = rental_schedule(
        inputs.monthly_rent,
        inputs.inflation_rate,
        inputs.reinvestment_rate,
        inputs.term_years,
        first_year_payment,
        inputs.property_tax,
        inputs.service_charges,
        inputs.maintenance,
        inputs.down_payment,
    );

    Comparison {
        notary_fee: fee,
        total_amount_with_fees,
        loan_amount,
        purchase,
        rental,
    }
}
