mod engine;
mod types;

pub use engine::{notary_fee, purchase_schedule, rental_schedule, run_comparison};
pub use types::{
    Comparison, Inputs, PropertyType, PurchaseSchedule, PurchaseYear, RentalSchedule, RentalYear,
};
