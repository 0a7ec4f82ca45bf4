#[tokio::main]
async fn main() {
    carbon::load_emissions(12).await;
}
