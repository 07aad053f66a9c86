//! Product create/edit form: client-side field rules.
//!
//! The server re-validates everything; these checks only keep obviously bad
//! input from being posted.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posboard_core::{CategoryId, KeystrokeFilter, NumericInput, ValidationError};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_CODE_LEN: usize = 2;
pub const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

/// Which server action a form posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormAction {
    Add,
    Edit,
}

impl FormAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormAction::Add => "add",
            FormAction::Edit => "edit",
        }
    }
}

/// Raw form state, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub code: String,
    pub category: Option<CategoryId>,
    pub reference: String,
    pub flag: String,
    pub description: String,
    /// File name of a newly chosen image, if any.
    pub image: Option<String>,
    pub inventoried: bool,
    pub price: String,
    pub pvp: String,
}

/// A field name paired with the rule it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub error: ValidationError,
}

/// Form state after every field rule passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProductForm {
    fields: BTreeMap<String, String>,
    pub price: Option<Decimal>,
    pub pvp: Decimal,
}

impl ValidProductForm {
    /// Flat form fields to post alongside the price list.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

/// Product codes are typed upper-case, letters and digits only.
pub fn normalize_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| KeystrokeFilter::NumbersLetters.accepts(*c, ""))
        .collect::<String>()
        .to_uppercase()
}

impl ProductForm {
    /// Rule for the sale price; its floor follows a valid purchase price.
    pub fn pvp_input(&self) -> NumericInput {
        let base = NumericInput::unit_price();
        match self.parsed_price() {
            Some(price) => base.with_min(price),
            None => base,
        }
    }

    /// Whether the purchase price control is shown (inventoried products only).
    pub fn shows_price(&self) -> bool {
        self.inventoried
    }

    fn parsed_price(&self) -> Option<Decimal> {
        if !self.inventoried {
            return None;
        }
        NumericInput::unit_price()
            .parse(&self.price)
            .ok()
            .map(|v| v.as_decimal())
    }

    /// Check every field, collecting all failures in field order.
    pub fn validate(&self) -> Result<ValidProductForm, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut fail = |field: &'static str, error: ValidationError| {
            errors.push(FieldError { field, error });
        };

        let name = self.name.trim();
        if name.is_empty() {
            fail("name", ValidationError::Required("name"));
        } else if name.chars().count() < MIN_NAME_LEN {
            fail("name", ValidationError::TooShort { field: "name", min: MIN_NAME_LEN });
        }

        let code = self.code.trim();
        if code.is_empty() {
            fail("code", ValidationError::Required("code"));
        } else if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            fail("code", ValidationError::InvalidCharacters("code"));
        } else if code.chars().count() < MIN_CODE_LEN {
            fail("code", ValidationError::TooShort { field: "code", min: MIN_CODE_LEN });
        }

        if self.category.is_none() {
            fail("category", ValidationError::Required("category"));
        }

        if let Some(image) = &self.image {
            let ext = image.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
            match ext {
                Some(e) if IMAGE_EXTENSIONS.contains(&e.as_str()) => {}
                other => fail("image", ValidationError::InvalidExtension(other.unwrap_or_default())),
            }
        }

        let price = if self.inventoried {
            match NumericInput::unit_price().parse(&self.price) {
                Ok(v) => Some(v.as_decimal()),
                Err(e) => {
                    fail("price", e);
                    None
                }
            }
        } else {
            None
        };

        let pvp = match NumericInput::unit_price().parse(&self.pvp) {
            Ok(v) => {
                let pvp = v.as_decimal();
                if price.is_some_and(|p| pvp < p) {
                    fail("pvp", ValidationError::PvpBelowPrice);
                }
                Some(pvp)
            }
            Err(e) => {
                fail("pvp", e);
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let pvp = pvp.unwrap_or_default();
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), name.to_string());
        fields.insert("code".to_string(), normalize_code(code));
        if let Some(category) = self.category {
            fields.insert("category".to_string(), category.to_string());
        }
        fields.insert("ref".to_string(), self.reference.trim().to_string());
        fields.insert("flag".to_string(), self.flag.trim().to_string());
        fields.insert("description".to_string(), self.description.trim().to_string());
        fields.insert("inventoried".to_string(), if self.inventoried { "on" } else { "" }.to_string());
        if let Some(price) = price {
            fields.insert("price".to_string(), price.to_string());
        }
        fields.insert("pvp".to_string(), pvp.to_string());

        Ok(ValidProductForm { fields, price, pvp })
    }
}

/// Server-side uniqueness probe (`validate_data`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniquenessCheck {
    /// Name must be unique within a category.
    Name { name: String, category: CategoryId },
    Code { code: String },
}

impl UniquenessCheck {
    /// Name probe; there is nothing to check until a category is chosen.
    pub fn name(name: &str, category: Option<CategoryId>) -> Option<Self> {
        category.map(|category| Self::Name {
            name: name.trim().to_string(),
            category,
        })
    }

    pub fn code(code: &str) -> Self {
        Self::Code {
            code: normalize_code(code),
        }
    }

    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("action".to_string(), "validate_data".to_string())];
        match self {
            UniquenessCheck::Name { name, category } => {
                pairs.push(("pattern".to_string(), "name".to_string()));
                pairs.push(("name".to_string(), name.clone()));
                pairs.push(("category".to_string(), category.to_string()));
            }
            UniquenessCheck::Code { code } => {
                pairs.push(("pattern".to_string(), "code".to_string()));
                pairs.push(("code".to_string(), code.clone()));
            }
        }
        pairs
    }
}
