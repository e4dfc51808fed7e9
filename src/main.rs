#[tokio::main]
async fn main() {
    if let Err(e) = garage_gate::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
