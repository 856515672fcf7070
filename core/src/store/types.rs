//! Store DTOs.
//!
//! # Design
//! Field names follow the wire one-to-one; `type` is the only rename.
//! Every optional or collection field tolerates being missing or `null`,
//! and unknown fields are ignored. The mock server defines its own copies
//! of these shapes; integration tests catch drift between the two.

use serde::{Deserialize, Serialize};

use crate::wire::null_default;

/// Real-money price. Amounts are decimal strings on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    #[serde(default, deserialize_with = "null_default")]
    pub amount: String,
    #[serde(default, deserialize_with = "null_default")]
    pub amount_without_discount: String,
    #[serde(default, deserialize_with = "null_default")]
    pub currency: String,
}

/// Price expressed in a virtual currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualPrice {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub amount: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub amount_without_discount: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub external_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Free-form item attribute. Kept as raw JSON.
pub type Attribute = serde_json::Value;

/// A virtual item from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualItem {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "null_default")]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub virtual_item_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "null_default")]
    pub virtual_prices: Vec<VirtualPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualItemsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<VirtualItem>,
}

/// A virtual currency the project sells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualCurrency {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "null_default")]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "null_default")]
    pub virtual_prices: Vec<VirtualPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualCurrencyResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<VirtualCurrency>,
}

/// One entry of a currency package: which currency, how much of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageContent {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualCurrencyPackage {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "null_default")]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub bundle_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "null_default")]
    pub virtual_prices: Vec<VirtualPrice>,
    #[serde(default, deserialize_with = "null_default")]
    pub content: Vec<PackageContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualCurrencyPackageResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<VirtualCurrencyPackage>,
}

/// A physical good that ships to the buyer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalItem {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "null_default")]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "null_default")]
    pub virtual_prices: Vec<VirtualPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalItemsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<PhysicalItem>,
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub groups: Vec<Group>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub is_bonus: bool,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "null_default")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub cart_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<CartItem>,
}

/// One line of a fill-cart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillCartItem {
    pub sku: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillCartBody {
    pub items: Vec<FillCartItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCartItemBody {
    pub quantity: u32,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: String,
    #[serde(default, deserialize_with = "null_default")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(default)]
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContent {
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_free: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default)]
    pub content: Option<OrderContent>,
}

// ---------------------------------------------------------------------------
// Inventory & balance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "null_default")]
    pub attributes: Vec<Attribute>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub virtual_item_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub remaining_uses: Option<u64>,
    #[serde(default)]
    pub instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<InventoryItem>,
}

/// Consume `quantity` of a consumable, or a single non-stackable instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeItemBody {
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualBalance {
    pub sku: String,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub amount: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualBalanceResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<VirtualBalance>,
}

// ---------------------------------------------------------------------------
// Coupons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemCouponBody {
    pub coupon_code: String,
    /// Chosen reward when the coupon lets the user pick one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_unit_items: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemedItem {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemCouponResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<RedeemedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWORD: &str = r#"{
        "sku": "sword",
        "name": "Sword",
        "groups": [{"external_id": "weapons", "name": "Weapons"}],
        "attributes": [],
        "type": "virtual_good",
        "virtual_item_type": "non_consumable",
        "description": "Sharp.",
        "image_url": "https://cdn.example/sword.png",
        "is_free": false,
        "price": {"amount": "1.99", "amount_without_discount": "2.99", "currency": "USD"},
        "virtual_prices": [{"sku": "gold", "amount": 100, "amount_without_discount": 120, "is_default": true}],
        "media_list": [{"type": "image", "url": "ignored"}],
        "can_be_bought": true
    }"#;

    #[test]
    fn virtual_item_maps_wire_names() {
        let item: VirtualItem = serde_json::from_str(SWORD).unwrap();
        assert_eq!(item.sku, "sword");
        assert_eq!(item.item_type.as_deref(), Some("virtual_good"));
        assert_eq!(item.groups[0].external_id, "weapons");
        assert_eq!(item.price.as_ref().unwrap().amount, "1.99");
        assert_eq!(item.virtual_prices[0].amount, 100);
        assert!(item.virtual_prices[0].is_default);
    }

    #[test]
    fn missing_optionals_become_defaults() {
        let item: VirtualItem = serde_json::from_str(r#"{"sku":"bare"}"#).unwrap();
        assert_eq!(item.sku, "bare");
        assert!(item.name.is_none());
        assert!(item.groups.is_empty());
        assert!(item.price.is_none());
        assert!(!item.is_free);

        let cart: Cart = serde_json::from_str(r#"{"cart_id":"42"}"#).unwrap();
        assert!(cart.items.is_empty());
    }

    #[test]
    fn explicit_nulls_become_defaults() {
        let raw = r#"{"items":[{"sku":"a","groups":null,"attributes":null,"is_free":null,
            "virtual_prices":null,
            "price":{"amount":"1.00","amount_without_discount":null,"currency":"USD"}}]}"#;
        let items: VirtualItemsResponse = serde_json::from_str(raw).unwrap();
        let item = &items.items[0];
        assert!(item.groups.is_empty());
        assert!(item.virtual_prices.is_empty());
        assert!(!item.is_free);
        let price = item.price.as_ref().unwrap();
        assert_eq!(price.amount, "1.00");
        assert_eq!(price.amount_without_discount, "");

        let cart: Cart = serde_json::from_str(
            r#"{"cart_id":"1","items":[{"sku":"b","quantity":null,"is_bonus":null}]}"#,
        )
        .unwrap();
        assert_eq!(cart.items[0].quantity, 0);

        let order: Order = serde_json::from_str(r#"{"order_id":7,"status":null}"#).unwrap();
        assert_eq!(order.status, "");
    }

    #[test]
    fn missing_identity_is_rejected() {
        assert!(serde_json::from_str::<VirtualItem>(r#"{"name":"no sku"}"#).is_err());
        assert!(serde_json::from_str::<Order>(r#"{"status":"new"}"#).is_err());
    }

    #[test]
    fn item_survives_serialize_then_deserialize() {
        let item: VirtualItem = serde_json::from_str(SWORD).unwrap();
        let json = serde_json::to_string(&item).unwrap();
        let back: VirtualItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
        assert!(json.contains(r#""type":"virtual_good""#));
        assert!(!json.contains("media_list"));
    }

    #[test]
    fn package_content_parses() {
        let raw = r#"{"items":[{"sku":"gold_100","bundle_type":"virtual_currency_package",
            "content":[{"sku":"gold","type":"virtual_currency","quantity":100}]}]}"#;
        let packages: VirtualCurrencyPackageResponse = serde_json::from_str(raw).unwrap();
        let content = &packages.items[0].content[0];
        assert_eq!(content.sku, "gold");
        assert_eq!(content.quantity, 100);
        assert_eq!(packages.items[0].bundle_type.as_deref(), Some("virtual_currency_package"));
    }

    #[test]
    fn consume_body_omits_absent_fields() {
        let body = ConsumeItemBody {
            sku: "potion".to_string(),
            quantity: Some(1),
            instance_id: None,
        };
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"sku": "potion", "quantity": 1}));
    }

    #[test]
    fn coupon_body_omits_selection_when_absent() {
        let body = RedeemCouponBody {
            coupon_code: "WINTER2021".to_string(),
            selected_unit_items: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("selected_unit_items").is_none());
    }
}
