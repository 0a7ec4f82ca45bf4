use serde::Deserialize;

pub const ENDPOINT: &str = "https://orders.greencart.dev/v2/GraphQL";

pub const QUERY: &str = r#"
    query getOrderHistory($from: Date!, $to: Date!) {
        orders(from: $from, to: $to) {
            userId
            sustainable
            carbonKg
            items {
                product {
                    name
                    retailer
                }
            }
        }
    }
"#;

#[derive(Deserialize)]
pub struct Response {
    pub data: Data,
}

#[derive(Deserialize)]
pub struct Data {
    pub orders: Vec<Order>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub user_id: String,
    pub sustainable: bool,
    pub carbon_kg: f64,
    pub items: Vec<ItemShell>,
}

#[derive(Deserialize)]
pub struct ItemShell {
    pub product: ProductInfo,
}

#[derive(Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub retailer: String,
}
