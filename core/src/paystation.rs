//! Payment UI access data.
//!
//! The payment UI is opened with a JSON document describing the user, the
//! project and optionally what is being bought. `AccessData` builds that
//! document; the host passes it to the payment page form-encoded.

use serde::Serialize;
use url::form_urlencoded;

use crate::error::{ApiError, ApiResult};

/// A virtual item to put into the purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseItem {
    pub sku: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessData {
    project_id: u32,
    user_id: String,
    sandbox: bool,
    theme: Option<String>,
    external_id: Option<String>,
    virtual_items: Option<Vec<PurchaseItem>>,
}

#[derive(Debug, Clone, Default)]
pub struct AccessDataBuilder {
    project_id: Option<u32>,
    user_id: Option<String>,
    sandbox: Option<bool>,
    theme: Option<String>,
    external_id: Option<String>,
    virtual_items: Option<Vec<PurchaseItem>>,
}

impl AccessDataBuilder {
    #[must_use]
    pub fn project_id(mut self, project_id: u32) -> Self {
        self.project_id = Some(project_id);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sandbox mode is on unless turned off here.
    #[must_use]
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = Some(sandbox);
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    #[must_use]
    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    #[must_use]
    pub fn virtual_items(mut self, items: Vec<PurchaseItem>) -> Self {
        self.virtual_items = Some(items);
        self
    }

    pub fn build(self) -> ApiResult<AccessData> {
        Ok(AccessData {
            project_id: self.project_id.ok_or_else(|| ApiError::missing("project_id"))?,
            user_id: self.user_id.ok_or_else(|| ApiError::missing("user_id"))?,
            sandbox: self.sandbox.unwrap_or(true),
            theme: self.theme,
            external_id: self.external_id,
            virtual_items: self.virtual_items,
        })
    }
}

// Wire shape of the document.

#[derive(Serialize)]
struct Document<'a> {
    user: User<'a>,
    settings: Settings<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purchase: Option<Purchase<'a>>,
}

#[derive(Serialize)]
struct User<'a> {
    id: Value<'a>,
}

#[derive(Serialize)]
struct Value<'a> {
    value: &'a str,
}

#[derive(Serialize)]
struct Settings<'a> {
    project_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<&'static str>,
    ui: Ui<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
}

#[derive(Serialize)]
struct Ui<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<&'a str>,
}

#[derive(Serialize)]
struct Purchase<'a> {
    virtual_items: VirtualItems<'a>,
}

#[derive(Serialize)]
struct VirtualItems<'a> {
    items: &'a [PurchaseItem],
}

impl AccessData {
    pub fn builder() -> AccessDataBuilder {
        AccessDataBuilder::default()
    }

    pub fn to_json(&self) -> ApiResult<String> {
        let document = Document {
            user: User {
                id: Value {
                    value: &self.user_id,
                },
            },
            settings: Settings {
                project_id: self.project_id,
                mode: self.sandbox.then_some("sandbox"),
                ui: Ui {
                    theme: self.theme.as_deref(),
                },
                external_id: self.external_id.as_deref(),
            },
            purchase: self.virtual_items.as_deref().map(|items| Purchase {
                virtual_items: VirtualItems { items },
            }),
        };
        serde_json::to_string(&document).map_err(|e| ApiError::Serialization(e.to_string()))
    }

    /// `to_json`, form-urlencoded.
    pub fn to_urlencoded(&self) -> ApiResult<String> {
        let json = self.to_json()?;
        Ok(form_urlencoded::byte_serialize(json.as_bytes()).collect())
    }
}
