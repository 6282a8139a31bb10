use std::collections::HashMap;

use axum::{body::Bytes, extract::Multipart};
use jiff::civil::Date;
use serde::de::DeserializeOwned;

use crate::{error::AppResult, validation::Violations};

#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Lower-cased extension with the leading dot, if the client name carries a sane one.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.file_name.rsplit_once('.')?;
        let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| format!(".{}", ext.to_ascii_lowercase()))
    }
}

/// A drained multipart body: text parts by name plus uploaded files by name.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    // Browsers submit an empty part for an untouched file input.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(name, UploadedFile { file_name, bytes });
                },
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                },
            }
        }

        Ok(form)
    }

    #[cfg(test)]
    pub fn insert_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    #[cfg(test)]
    pub fn insert_file(&mut self, name: &str, file: UploadedFile) {
        self.files.insert(name.to_string(), file);
    }

    /// Trimmed text value; blank values read as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    pub fn flag(&self, name: &str, violations: &mut Violations) -> bool {
        match self.text(name) {
            None => false,
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("on") => true,
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" || v.eq_ignore_ascii_case("off") => false,
            Some(_) => {
                violations.push(name, "must be true or false");
                false
            },
        }
    }

    pub fn date(&self, name: &str, violations: &mut Violations) -> Option<Date> {
        let raw = self.text(name)?;
        // Accept full timestamps from date pickers by keeping the calendar part.
        let day = raw.get(..10).unwrap_or(raw);
        match day.parse::<Date>() {
            Ok(date) => Some(date),
            Err(_) => {
                violations.push(name, "must be a date in YYYY-MM-DD format");
                None
            },
        }
    }

    /// Parses a JSON-encoded part such as `genresIds=[1,2]`; absent parts yield the default.
    pub fn json<T: DeserializeOwned + Default>(&self, name: &str, violations: &mut Violations) -> T {
        let Some(raw) = self.text(name) else {
            return T::default();
        };
        match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                violations.push(name, format_args!("invalid JSON ({err})"));
                T::default()
            },
        }
    }
}
