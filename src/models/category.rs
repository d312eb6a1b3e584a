// src/models/category.rs

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Text,
    Number,
    Date, // YYYY-MM-DD
    Boolean,
    Select,
    Multiselect,
}

// --- DEFINIÇÕES (O Molde) ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryField {
    #[validate(length(min = 1, max = 64))]
    #[schema(example = "videos")]
    pub key: String,

    #[validate(length(min = 1))]
    #[schema(example = "Quantidade de vídeos")]
    pub label: String,

    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    // Só para SELECT / MULTISELECT
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DynamicCategory {
    pub id: Uuid,

    #[schema(example = "shorts")]
    pub slug: String,
    pub name: String,

    #[schema(value_type = Vec<CategoryField>)]
    pub fields: Json<Vec<CategoryField>>,

    // Campo numérico que define a quantidade cobrada
    pub quantity_field: String,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl DynamicCategory {
    /// Valida o formulário e devolve a quantidade cobrável.
    pub fn validate_form_data(&self, data: &Map<String, Value>) -> Result<i64, AppError> {
        validate_form_data(&self.fields, &self.quantity_field, data)
    }
}

// Slugs já usados pelos produtos fixos
const RESERVED_SLUGS: [&str; 8] = [
    "place", "receipt", "kakaomap", "blog", "blog_auto", "cafe", "experience", "dynamic",
];

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if !well_formed {
        let mut err = ValidationError::new("invalid_slug");
        err.message = Some("Use apenas letras minúsculas, números e '_'.".into());
        return Err(err);
    }
    if RESERVED_SLUGS.contains(&slug) {
        let mut err = ValidationError::new("reserved_slug");
        err.message = Some("Este slug pertence a um produto fixo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(max = 64), custom(function = "validate_slug"))]
    #[schema(example = "shorts")]
    pub slug: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "Defina ao menos um campo."), nested)]
    pub fields: Vec<CategoryField>,

    #[schema(example = "videos")]
    pub quantity_field: String,
}

impl CreateCategoryPayload {
    /// Regras do esquema que dependem de mais de um campo.
    pub fn check_schema(&self) -> Result<(), AppError> {
        let mut errors: HashMap<String, String> = HashMap::new();
        let mut seen = HashSet::new();

        for field in &self.fields {
            if !seen.insert(field.key.as_str()) {
                errors.insert(field.key.clone(), "duplicated_key".to_string());
            }
            let needs_options = matches!(field.field_type, FieldType::Select | FieldType::Multiselect);
            if needs_options && field.options.as_ref().map_or(true, |o| o.is_empty()) {
                errors.insert(field.key.clone(), "missing_options".to_string());
            }
        }

        match self.fields.iter().find(|f| f.key == self.quantity_field) {
            Some(f) if f.field_type == FieldType::Number && f.required => {}
            Some(_) => {
                errors.insert(self.quantity_field.clone(), "quantity_must_be_required_number".to_string());
            }
            None => {
                errors.insert("quantityField".to_string(), "unknown_field".to_string());
            }
        }

        if !errors.is_empty() {
            return Err(AppError::CustomDataValidationError(errors));
        }
        Ok(())
    }
}

// --- MOTOR DE VALIDAÇÃO ---

fn type_matches(field: &CategoryField, val: &Value) -> bool {
    let options = field.options.as_deref().unwrap_or(&[]);
    match field.field_type {
        FieldType::Text => val.is_string(),
        FieldType::Number => val.is_number(),
        FieldType::Boolean => val.is_boolean(),
        FieldType::Date => val
            .as_str()
            .map_or(false, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
        FieldType::Select => val
            .as_str()
            .map_or(false, |s| options.iter().any(|o| o == s)),
        FieldType::Multiselect => val.as_array().map_or(false, |items| {
            items
                .iter()
                .all(|item| item.as_str().map_or(false, |s| options.iter().any(|o| o == s)))
        }),
    }
}

fn error_code(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Number => "invalid_number",
        FieldType::Date => "invalid_date_format",
        FieldType::Boolean => "invalid_boolean",
        FieldType::Select => "invalid_option",
        FieldType::Multiselect => "invalid_list",
        FieldType::Text => "invalid_text",
    }
}

/// Valida `data` contra o esquema. Erros vão por chave de campo, como códigos.
pub fn validate_form_data(
    fields: &[CategoryField],
    quantity_field: &str,
    data: &Map<String, Value>,
) -> Result<i64, AppError> {
    let mut errors: HashMap<String, String> = HashMap::new();

    for key in data.keys() {
        if !fields.iter().any(|f| &f.key == key) {
            errors.insert(key.clone(), "unknown_field".to_string());
        }
    }

    for field in fields {
        let value = data.get(&field.key).filter(|v| !v.is_null());

        match value {
            None if field.required => {
                errors.insert(field.key.clone(), "required".to_string());
            }
            None => {}
            Some(val) => {
                if !type_matches(field, val) {
                    errors.insert(field.key.clone(), error_code(field.field_type).to_string());
                }
            }
        }
    }

    let quantity = data
        .get(quantity_field)
        .and_then(Value::as_i64)
        .filter(|q| *q > 0);

    if quantity.is_none() && !errors.contains_key(quantity_field) {
        errors.insert(quantity_field.to_string(), "invalid_quantity".to_string());
    }

    match quantity {
        Some(q) if errors.is_empty() => Ok(q),
        _ => Err(AppError::CustomDataValidationError(errors)),
    }
}
