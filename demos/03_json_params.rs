/// json params - load a deposit from json and dump the outcome as json
use calc_core_rs::{DepositEngine, DepositParams};

const PARAMS: &str = r#"{
    "amount": "250000",
    "term": 365,
    "term_unit": "Days",
    "annual_rate_percent": "12.5",
    "tax_rate_multiplier": "16",
    "scheme": "First",
    "frequency": "Month",
    "start_date": { "day": 15, "month": 6, "year": 2024 },
    "operations": [
        { "date": { "day": 1, "month": 10, "year": 2024 }, "amount": "50000", "kind": "Refill" },
        { "date": { "day": 1, "month": 2, "year": 2025 }, "amount": "100000", "kind": "Withdrawal" }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json params ===\n");

    let params = DepositParams::from_json(PARAMS)?;
    let outcome = DepositEngine::new(params)?.run()?;

    println!("{}", outcome.to_json_pretty()?);

    Ok(())
}
