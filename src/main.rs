#[tokio::main]
async fn main() {
    if let Err(e) = bch_slp_toolkit::cli::run().await {
        eprintln!("Error: {}", e);
        if let Some(payload) = e.backend_payload() {
            eprintln!("Backend response: {}", payload);
        }
        std::process::exit(1);
    }
}
