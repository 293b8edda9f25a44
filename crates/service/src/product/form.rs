//! Form descriptors for the create and edit screens.

use models::product::{self, DESCRIPTION_MIN_CHARS, TITLE_MIN_CHARS};
use serde::Serialize;

use crate::storage::image::ACCEPTED_TYPES;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub input: &'static str,
    pub required: bool,
    pub rules: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProductForm {
    pub action: String,
    pub method: &'static str,
    pub enctype: &'static str,
    pub fields: Vec<FormField>,
}

impl ProductForm {
    /// Empty creation form.
    pub fn create(max_image_kb: u64) -> Self {
        Self {
            action: "/products".into(),
            method: "POST",
            enctype: "multipart/form-data",
            fields: fields(true, max_image_kb, None),
        }
    }

    /// Edit form pre-filled from the stored row; the image may be left out.
    pub fn edit(existing: &product::Model, max_image_kb: u64) -> Self {
        Self {
            action: format!("/products/{}", existing.id),
            method: "PUT",
            enctype: "multipart/form-data",
            fields: fields(false, max_image_kb, Some(existing)),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn fields(image_required: bool, max_image_kb: u64, current: Option<&product::Model>) -> Vec<FormField> {
    vec![
        FormField {
            name: "image",
            input: "file",
            required: image_required,
            rules: format!("image of type {ACCEPTED_TYPES}, at most {max_image_kb} KB"),
            value: current.map(|m| m.image.clone()),
        },
        FormField {
            name: "title",
            input: "text",
            required: true,
            rules: format!("at least {TITLE_MIN_CHARS} characters"),
            value: current.map(|m| m.title.clone()),
        },
        FormField {
            name: "description",
            input: "textarea",
            required: true,
            rules: format!("at least {DESCRIPTION_MIN_CHARS} characters"),
            value: current.map(|m| m.description.clone()),
        },
        FormField {
            name: "price",
            input: "number",
            required: true,
            rules: "number, 0 or more".into(),
            value: current.map(|m| format!("{:.2}", m.price)),
        },
        FormField {
            name: "stock",
            input: "number",
            required: true,
            rules: "whole number, 0 or more".into(),
            value: current.map(|m| m.stock.to_string()),
        },
    ]
}
