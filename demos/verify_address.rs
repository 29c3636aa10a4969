//! Looks up one address over GET and a small batch over POST.
//!
//! Credentials are read from `SMARTY_AUTH_ID` and `SMARTY_AUTH_TOKEN`.
//!
//! Run with: `cargo run --example verify_address`

use smarty_street::{AddressInput, AddressOptional, Client, Credentials, Error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("smarty_street=debug,verify_address=info")
        .init();

    let auth_id = std::env::var("SMARTY_AUTH_ID")?;
    let auth_token = std::env::var("SMARTY_AUTH_TOKEN")?;

    let client = Client::builder()
        .credentials(Credentials::new(auth_id, auth_token))
        .build()?;

    println!("=== Single lookup ===");
    let input = AddressInput::new()
        .street("3214 N University Ave")
        .city("Provo")
        .state("UT")
        .candidates(3);

    let response = client.get_address(&input, None).await?;
    for candidate in response.iter() {
        println!("{}", candidate.delivery_line_1);
        println!("{}", candidate.last_line);
        if let Some((lat, lon)) = candidate.metadata.coordinates() {
            println!("  at {:.5}, {:.5}", lat, lon);
        }
        println!("  DPV: {:?}", candidate.analysis.dpv_match());
    }
    tracing::info!(
        candidates = response.data.len(),
        latency_ms = response.latency.as_millis(),
        "Single lookup finished"
    );
    println!();

    println!("=== Batch lookup ===");
    let inputs = vec![
        AddressInput::new().freeform("1 Rosedale, Baltimore, MD"),
        AddressInput::new().street("1600 Amphitheatre Pkwy").zipcode("94043"),
        AddressInput::new().street("nowhere"),
    ];
    let optionals = vec![
        Some(AddressOptional::new().input_id("rosedale")),
        Some(AddressOptional::new().input_id("google")),
        None,
    ];

    match client.post_addresses(&inputs, Some(&optionals)).await {
        Ok(response) => {
            for (index, _) in inputs.iter().enumerate() {
                let matches: Vec<_> = response.for_input(index).collect();
                tracing::info!(input = index, candidates = matches.len(), "Batch input matched");
            }
        }
        Err(Error::InvalidBatch { failures, .. }) => {
            println!("Batch rejected before sending:");
            for failure in failures {
                println!("  {}", failure);
            }
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
