#[tokio::main]
async fn main() {
    if let Err(e) = table_availability::run().await {
        eprintln!("table_availability failed to start: {}", e);
        std::process::exit(1);
    }
}
