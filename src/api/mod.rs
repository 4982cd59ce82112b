use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Comparison, Inputs, PropertyType, PurchaseYear, RentalYear, notary_fee, run_comparison,
};

const LOAN_DURATIONS: [u32; 4] = [10, 15, 20, 25];

// Yearly cost presets behind the surface auto-fill, in €/m².
const PROPERTY_TAX_PER_M2: f64 = 12.5;
const MAINTENANCE_PER_M2: f64 = 15.0;
const SERVICE_CHARGES_PER_M2: f64 = 10.0;

#[derive(Parser, Debug)]
#[command(
    name = "buyrent",
    about = "Buy vs rent comparison (amortization schedule + reinvested savings baseline)"
)]
struct Cli {
    #[arg(long, default_value_t = 200_000.0, help = "Property price in euros")]
    amount: f64,
    #[arg(long, default_value_t = 20_000.0, help = "Down payment in euros")]
    apport: f64,
    #[arg(
        long,
        default_value_t = 3.5,
        help = "Annual loan interest rate in percent"
    )]
    taux: f64,
    #[arg(
        long,
        default_value_t = 25,
        help = "Loan duration in years: 10, 15, 20 or 25"
    )]
    duration: u32,
    #[arg(
        long,
        default_value_t = 0.5,
        help = "Annual property appreciation in percent"
    )]
    plus_value: f64,
    #[arg(long, default_value_t = 1_000.0, help = "Annual property tax in euros")]
    taxe_fonciere: f64,
    #[arg(
        long,
        default_value_t = 1_000.0,
        help = "Annual co-ownership charges in euros"
    )]
    charges: f64,
    #[arg(
        long,
        default_value_t = 1_500.0,
        help = "Annual maintenance works in euros"
    )]
    travaux: f64,
    #[arg(
        long,
        default_value = "ancien",
        help = "Property type for notary fees: neuf (2.5%), anything else is ancien (7.5%)"
    )]
    property_type: String,
    #[arg(
        long,
        default_value_t = 2.0,
        help = "Annual inflation applied to rent and ownership costs, in percent"
    )]
    inflation_rate: f64,
    #[arg(long, default_value_t = 700.0, help = "Monthly rent in euros")]
    loyer: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual return on reinvested savings in percent"
    )]
    taux_placement: f64,
    #[arg(
        long,
        help = "Living surface in m²; replaces taxe-fonciere, travaux and charges with per-m² presets"
    )]
    surface: Option<f64>,
}

// Wire names match the shareable page URL, so a copied query string can be
// replayed against GET /api/compare unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    amount: Option<f64>,
    apport: Option<f64>,
    taux: Option<f64>,
    duration: Option<u32>,
    plus_value: Option<f64>,
    taxe_fonciere: Option<f64>,
    charges: Option<f64>,
    travaux: Option<f64>,
    property_type: Option<String>,
    inflation_rate: Option<f64>,
    loyer: Option<f64>,
    taux_placement: Option<f64>,
    surface: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonRow {
    year: u32,
    purchase_investment: f64,
    purchase_costs: f64,
    purchase_savings: f64,
    purchase_appreciation: f64,
    purchase_capital_total: f64,
    rental_investment: f64,
    rent: f64,
    rental_savings: f64,
    reinvestment_interest: f64,
    rental_capital_total: f64,
    rental_leads: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    monthly_payment: f64,
    total_payment: f64,
    total_interest: f64,
    total_rent_paid: f64,
    notary_fee: f64,
    total_amount_with_fees: f64,
    loan_amount: f64,
    purchase_years: Vec<PurchaseYear>,
    rental_years: Vec<RentalYear>,
    rows: Vec<ComparisonRow>,
}

#[derive(Debug, Serialize)]
struct IndexResponse {
    service: &'static str,
    usage: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    for (name, value) in [
        ("--amount", cli.amount),
        ("--apport", cli.apport),
        ("--taux", cli.taux),
        ("--plus-value", cli.plus_value),
        ("--taxe-fonciere", cli.taxe_fonciere),
        ("--charges", cli.charges),
        ("--travaux", cli.travaux),
        ("--inflation-rate", cli.inflation_rate),
        ("--loyer", cli.loyer),
        ("--taux-placement", cli.taux_placement),
    ] {
        if !value.is_finite() {
            return Err(format!("{name} must be a finite number"));
        }
    }

    if cli.amount <= 0.0 {
        return Err("--amount must be > 0".to_string());
    }

    if cli.apport < 0.0 {
        return Err("--apport must be >= 0".to_string());
    }

    if !LOAN_DURATIONS.contains(&cli.duration) {
        return Err("--duration must be one of 10, 15, 20 or 25".to_string());
    }

    if cli.taux < 0.0 {
        return Err("--taux must be >= 0".to_string());
    }

    if cli.taxe_fonciere < 0.0 || cli.charges < 0.0 || cli.travaux < 0.0 {
        return Err("--taxe-fonciere, --charges and --travaux must be >= 0".to_string());
    }

    if cli.loyer < 0.0 {
        return Err("--loyer must be >= 0".to_string());
    }

    let (property_tax, service_charges, maintenance) = match cli.surface {
        Some(surface) if !surface.is_finite() || surface <= 0.0 => {
            return Err("--surface must be > 0".to_string());
        }
        Some(surface) => (
            surface * PROPERTY_TAX_PER_M2,
            surface * SERVICE_CHARGES_PER_M2,
            surface * MAINTENANCE_PER_M2,
        ),
        None => (cli.taxe_fonciere, cli.charges, cli.travaux),
    };

    let property_type = PropertyType::from_name(&cli.property_type);
    let fee = notary_fee(cli.amount, property_type);
    if cli.apport > cli.amount + fee {
        return Err("--apport cannot exceed the purchase price plus notary fees".to_string());
    }

    Ok(Inputs {
        property_price: cli.amount,
        down_payment: cli.apport,
        interest_rate: cli.taux,
        term_years: cli.duration,
        appreciation_rate: cli.plus_value,
        property_tax,
        service_charges,
        maintenance,
        property_type,
        inflation_rate: cli.inflation_rate,
        monthly_rent: cli.loyer,
        reinvestment_rate: cli.taux_placement,
    })
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<ComparePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ComparePayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.amount {
        cli.amount = v;
    }
    if let Some(v) = payload.apport {
        cli.apport = v;
    }
    if let Some(v) = payload.taux {
        cli.taux = v;
    }
    if let Some(v) = payload.duration {
        cli.duration = v;
    }
    if let Some(v) = payload.plus_value {
        cli.plus_value = v;
    }
    if let Some(v) = payload.taxe_fonciere {
        cli.taxe_fonciere = v;
    }
    if let Some(v) = payload.charges {
        cli.charges = v;
    }
    if let Some(v) = payload.travaux {
        cli.travaux = v;
    }
    if let Some(v) = payload.property_type {
        cli.property_type = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.loyer {
        cli.loyer = v;
    }
    if let Some(v) = payload.taux_placement {
        cli.taux_placement = v;
    }
    if let Some(v) = payload.surface {
        cli.surface = Some(v);
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        amount: 200_000.0,
        apport: 20_000.0,
        taux: 3.5,
        duration: 25,
        plus_value: 0.5,
        taxe_fonciere: 1_000.0,
        charges: 1_000.0,
        travaux: 1_500.0,
        property_type: "ancien".to_string(),
        inflation_rate: 2.0,
        loyer: 700.0,
        taux_placement: 3.0,
        surface: None,
    }
}

// Display rows derived from the two index-aligned schedules. The rental
// side reuses the purchase investment figure, and its savings column is
// the schedule's own difference (computed against the uninflated cost
// baseline), so the two are not linked by rent alone.
fn comparison_rows(comparison: &Comparison) -> Vec<ComparisonRow> {
    comparison
        .purchase
        .years
        .iter()
        .zip(comparison.rental.years.iter())
        .map(|(buy, rent)| {
            let investment =
                buy.payment + buy.property_tax + buy.service_charges + buy.maintenance;
            ComparisonRow {
                year: buy.year,
                purchase_investment: investment,
                purchase_costs: buy.property_tax
                    + buy.service_charges
                    + buy.maintenance
                    + buy.interest,
                purchase_savings: buy.principal,
                purchase_appreciation: buy.appreciation,
                purchase_capital_total: buy.capital_total,
                rental_investment: investment,
                rent: rent.rent,
                rental_savings: rent.difference,
                reinvestment_interest: rent.reinvestment_interest,
                rental_capital_total: rent.capital_total,
                rental_leads: rent.capital_total > buy.capital_total,
            }
        })
        .collect()
}

fn build_compare_response(comparison: &Comparison) -> CompareResponse {
    CompareResponse {
        monthly_payment: comparison.purchase.monthly_payment,
        total_payment: comparison.purchase.total_payment,
        total_interest: comparison.purchase.total_interest,
        total_rent_paid: comparison.rental.total_rent_paid,
        notary_fee: comparison.notary_fee,
        total_amount_with_fees: comparison.total_amount_with_fees,
        loan_amount: comparison.loan_amount,
        purchase_years: comparison.purchase.years.clone(),
        rental_years: comparison.rental.years.clone(),
        rows: comparison_rows(comparison),
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("buyrent HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/compare");

    axum::serve(listener, app).await
}

async fn index_handler() -> Response {
    json_response(
        StatusCode::OK,
        IndexResponse {
            service: "buyrent",
            usage: "GET or POST /api/compare with the simulator parameters",
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compare_get_handler(Query(payload): Query<ComparePayload>) -> Response {
    compare_handler_impl(payload)
}

async fn compare_post_handler(Json(payload): Json<ComparePayload>) -> Response {
    compare_handler_impl(payload)
}

fn compare_handler_impl(payload: ComparePayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let comparison = run_comparison(&inputs);
    json_response(StatusCode::OK, build_compare_response(&comparison))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

pub fn run_report() -> Result<(), String> {
    let cli = Cli::parse();
    let inputs = build_inputs(cli)?;
    let comparison = run_comparison(&inputs);
    print!("{}", render_report(&comparison));
    Ok(())
}

// French-style currency: space-grouped thousands, comma decimals, e.g.
// "1 234,56 €". Values are only rounded here, at display time.
fn format_eur(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{fraction:02} €")
}

fn render_report(comparison: &Comparison) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Notary fee:          {}",
        format_eur(comparison.notary_fee)
    );
    let _ = writeln!(
        out,
        "Total with fees:     {}",
        format_eur(comparison.total_amount_with_fees)
    );
    let _ = writeln!(
        out,
        "Loan amount:         {}",
        format_eur(comparison.loan_amount)
    );
    let _ = writeln!(
        out,
        "Monthly payment:     {}",
        format_eur(comparison.purchase.monthly_payment)
    );
    let _ = writeln!(
        out,
        "Total loan payments: {}",
        format_eur(comparison.purchase.total_payment)
    );
    let _ = writeln!(
        out,
        "Total interest:      {}",
        format_eur(comparison.purchase.total_interest)
    );
    let _ = writeln!(
        out,
        "Total rent paid:     {}",
        format_eur(comparison.rental.total_rent_paid)
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>4}  {:>16} {:>16} {:>16}  | {:>16} {:>16} {:>16}  {}",
        "Year",
        "Buy invest",
        "Buy costs",
        "Buy capital",
        "Rent",
        "Rent savings",
        "Rent capital",
        "Leader"
    );

    for row in comparison_rows(comparison) {
        let leader = if row.rental_leads { "rent" } else { "buy" };
        let _ = writeln!(
            out,
            "{:>4}  {:>16} {:>16} {:>16}  | {:>16} {:>16} {:>16}  {}",
            row.year,
            format_eur(row.purchase_investment),
            format_eur(row.purchase_costs),
            format_eur(row.purchase_capital_total),
            format_eur(row.rent),
            format_eur(row.rental_savings),
            format_eur(row.rental_capital_total),
            leader,
        );
    }

    out
}
