use anyhow::Error;
use prost::Message;
use reqwest::get;

use crate::snapshot::Ledger;

const REMOTE_LEDGER_PATH: &str = "https://data.greencart.dev/ledger.bin";

pub struct RemoteLedger {
    pub ledger: Ledger,
    pub product_id_to_name: Vec<String>,
}

pub async fn get_remote_ledger() -> Result<RemoteLedger, Error> {
    let response = get(REMOTE_LEDGER_PATH).await?;
    let bytes = response.bytes().await?;

    let ledger = Ledger::decode(&*bytes)?;

    let mut product_id_to_name: Vec<String> =
        vec!["".to_string(); ledger.next_product_id as usize];
    for (name, product) in &ledger.products {
        product_id_to_name[product.id as usize] = name.clone();
    }

    Ok(RemoteLedger {
        ledger,
        product_id_to_name,
    })
}
