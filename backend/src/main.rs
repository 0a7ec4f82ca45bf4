#[tokio::main]
async fn main() {
    #[cfg(feature = "ingest")]
    {
        carbon::load_emissions(12).await;
    }

    server::start_server().await;
}
