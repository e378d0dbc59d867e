use std::collections::BTreeMap;

use crate::config::DEFAULT_PIECES;

pub const IMAGE_FIELD: &str = "image";
pub const PIECES_FIELD: &str = "pieces";

/// Text fields of the upload form. `reset` puts every field back to the
/// value it had when the form was built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormFields {
    defaults: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
}

impl Default for FormFields {
    fn default() -> Self {
        Self::with_defaults([(PIECES_FIELD, DEFAULT_PIECES.to_string())])
    }
}

impl FormFields {
    pub fn with_defaults<K, V>(defaults: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let defaults: BTreeMap<String, String> = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: defaults.clone(),
            defaults,
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Everything that goes into one multipart POST.
#[derive(Clone, Debug)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
