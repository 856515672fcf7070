//! Optional per-call parameters.
//!
//! Every field is optional and `None` means "let the server decide"; an
//! options value never turns an absent field into zero or an empty string.

use serde::{Deserialize, Serialize};

use crate::endpoint::Query;

/// Pagination, locale and filtering for catalog listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemsRequestOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub locale: Option<String>,
    pub additional_fields: Vec<String>,
    /// Group identifier, used by the items-by-group listing only.
    pub external_id: Option<String>,
}

impl ItemsRequestOptions {
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_additional_field(mut self, field: impl Into<String>) -> Self {
        self.additional_fields.push(field.into());
        self
    }

    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Query parameters for a listing call. `external_id` travels in the
    /// path, never in the query.
    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("limit", self.limit)
            .with_opt("offset", self.offset)
            .with_opt("locale", self.locale.as_deref())
            .with_all("additional_fields[]", self.additional_fields.as_slice())
    }
}

/// Currency and locale for cart reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartRequestOptions {
    pub currency: Option<String>,
    pub locale: Option<String>,
}

impl CartRequestOptions {
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("currency", self.currency.as_deref())
            .with_opt("locale", self.locale.as_deref())
    }
}
