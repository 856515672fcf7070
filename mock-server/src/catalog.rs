//! Fixed catalog served by the store routes.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: String,
    pub amount_without_discount: String,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirtualPrice {
    pub sku: String,
    pub amount: u64,
    pub amount_without_discount: u64,
    pub is_default: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub external_id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub sku: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: u64,
}

/// One sellable entry. Currencies, packages and physical goods share the
/// shape; the package-only fields are omitted elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub sku: String,
    pub name: String,
    pub groups: Vec<Group>,
    pub attributes: Vec<serde_json::Value>,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_item_type: Option<String>,
    pub description: String,
    pub image_url: String,
    pub is_free: bool,
    pub price: Option<Price>,
    pub virtual_prices: Vec<VirtualPrice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Content>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
}

fn usd(amount: &str) -> Option<Price> {
    Some(Price {
        amount: amount.to_string(),
        amount_without_discount: amount.to_string(),
        currency: "USD".to_string(),
    })
}

fn group(external_id: &str, name: &str) -> Group {
    Group {
        external_id: external_id.to_string(),
        name: name.to_string(),
    }
}

fn item(sku: &str, name: &str, item_type: &str, price: Option<Price>) -> CatalogItem {
    CatalogItem {
        sku: sku.to_string(),
        name: name.to_string(),
        groups: Vec::new(),
        attributes: Vec::new(),
        item_type: item_type.to_string(),
        virtual_item_type: None,
        description: format!("{name} from the mock catalog"),
        image_url: format!("https://cdn.mock.test/{sku}.png"),
        is_free: false,
        price,
        virtual_prices: Vec::new(),
        bundle_type: None,
        content: None,
    }
}

pub fn virtual_items() -> Vec<CatalogItem> {
    let mut sword = item("sword", "Sword", "virtual_good", usd("1.99"));
    sword.groups = vec![group("weapons", "Weapons")];
    sword.virtual_item_type = Some("non_consumable".to_string());

    let mut shield = item("shield", "Shield", "virtual_good", usd("2.99"));
    shield.groups = vec![group("weapons", "Weapons")];
    shield.virtual_item_type = Some("non_consumable".to_string());

    let mut potion = item("potion", "Potion", "virtual_good", None);
    potion.groups = vec![group("consumables", "Consumables")];
    potion.virtual_item_type = Some("consumable".to_string());
    potion.virtual_prices = vec![VirtualPrice {
        sku: "gold".to_string(),
        amount: 10,
        amount_without_discount: 10,
        is_default: true,
    }];

    vec![sword, shield, potion]
}

pub fn virtual_currency() -> Vec<CatalogItem> {
    vec![
        item("gold", "Gold", "virtual_currency", usd("0.10")),
        item("crystals", "Crystals", "virtual_currency", usd("1.00")),
    ]
}

pub fn virtual_currency_packages() -> Vec<CatalogItem> {
    let mut pack = item("gold_100", "100 Gold", "bundle", usd("9.99"));
    pack.bundle_type = Some("virtual_currency_package".to_string());
    pack.content = Some(vec![Content {
        sku: "gold".to_string(),
        item_type: "virtual_currency".to_string(),
        quantity: 100,
    }]);
    vec![pack]
}

pub fn physical_items() -> Vec<CatalogItem> {
    vec![item("t_shirt", "T-Shirt", "physical_good", usd("19.99"))]
}

/// Any sellable entry by sku.
pub fn find(sku: &str) -> Option<CatalogItem> {
    virtual_items()
        .into_iter()
        .chain(virtual_currency())
        .chain(virtual_currency_packages())
        .chain(physical_items())
        .find(|item| item.sku == sku)
}
