// src/model/row.rs
//! The remote property bag and its typed extractors.
//!
//! A [`Row`] is one record from a Notion database query: an ordered map
//! from field name to a typed-but-heterogeneous [`PropertyValue`]. The
//! extractor methods are the only way values leave this module — each
//! returns a documented default for absent or malformed input and never
//! errors, which is the contract every downstream component relies on.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::types::PageId;

/// One record returned by a database query, with its property bag.
#[derive(Debug, Clone, Deserialize)]
pub struct Row {
    pub id: PageId,
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: IndexMap<String, PropertyValue>,
}

/// The specific value types for properties, keyed on the Notion `type`
/// discriminator. `Unsupported` absorbs property types this crate does
/// not read (rollup, formula, people, ...) so they degrade to extractor
/// defaults instead of failing the whole row.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        title: Vec<RichTextItem>,
    },
    RichText {
        rich_text: Vec<RichTextItem>,
    },
    Number {
        number: Option<f64>,
    },
    Checkbox {
        checkbox: bool,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        multi_select: Vec<SelectOption>,
    },
    Url {
        url: Option<String>,
    },
    Email {
        email: Option<String>,
    },
    PhoneNumber {
        phone_number: Option<String>,
    },
    Date {
        date: Option<DateValue>,
    },
    Files {
        files: Vec<FileEntry>,
    },
    Relation {
        relation: Vec<RelationRef>,
    },
    #[serde(other)]
    Unsupported,
}

/// Deserializes a property bag one value at a time so a single
/// malformed property degrades to [`PropertyValue::Unsupported`]
/// rather than rejecting the row.
fn lenient_properties<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, PropertyValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let parsed = serde_json::from_value(value).unwrap_or(PropertyValue::Unsupported);
            (name, parsed)
        })
        .collect())
}

/// One run of text inside a title or rich-text property.
#[derive(Debug, Clone, Deserialize)]
pub struct RichTextItem {
    #[serde(default)]
    pub plain_text: String,
}

/// A select or multi-select option label.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

/// A date property payload; only the ISO start date is used.
#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: Option<String>,
}

/// One entry of a files property: an external link or a Notion-hosted file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileEntry {
    External { external: ExternalFile },
    File { file: HostedFile },
}

impl FileEntry {
    /// The resolved source URL, if the entry carries one.
    pub fn url(&self) -> Option<&str> {
        let url = match self {
            FileEntry::External { external } => external.url.as_str(),
            FileEntry::File { file } => file.url.as_str(),
        };
        (!url.is_empty()).then_some(url)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalFile {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostedFile {
    #[serde(default)]
    pub url: String,
}

/// A reference to a related record.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationRef {
    pub id: PageId,
}

fn join_plain_text(runs: &[RichTextItem]) -> String {
    runs.iter().map(|r| r.plain_text.as_str()).collect()
}

impl Row {
    fn prop(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Concatenated text runs of a title or rich-text field; `""` if
    /// absent or of another type.
    pub fn plain_text(&self, name: &str) -> String {
        match self.prop(name) {
            Some(PropertyValue::Title { title }) => join_plain_text(title),
            Some(PropertyValue::RichText { rich_text }) => join_plain_text(rich_text),
            _ => String::new(),
        }
    }

    /// Text from the first of `names` with a non-empty value, `""`
    /// otherwise. Mirrors how renamed-over-time text columns are read.
    pub fn plain_text_any(&self, names: &[&str]) -> String {
        names
            .iter()
            .map(|n| self.plain_text(n))
            .find(|t| !t.is_empty())
            .unwrap_or_default()
    }

    /// The numeric value, or `0` if absent.
    pub fn number(&self, name: &str) -> f64 {
        match self.prop(name) {
            Some(PropertyValue::Number { number }) => number.unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// The first field among `names` with a non-zero number, else `0`.
    ///
    /// Mirrors how renamed-over-time numeric columns are read: the new
    /// name first, falling back to the legacy one.
    pub fn number_any(&self, names: &[&str]) -> f64 {
        names
            .iter()
            .map(|n| self.number(n))
            .find(|v| *v != 0.0)
            .unwrap_or(0.0)
    }

    /// The checkbox value, or `false` if absent.
    pub fn checkbox(&self, name: &str) -> bool {
        match self.prop(name) {
            Some(PropertyValue::Checkbox { checkbox }) => *checkbox,
            _ => false,
        }
    }

    /// The selected option's label, or `""`.
    pub fn select(&self, name: &str) -> String {
        match self.prop(name) {
            Some(PropertyValue::Select { select }) => {
                select.as_ref().map(|o| o.name.clone()).unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    /// Ordered labels of the selected options, `[]` if absent.
    pub fn multi_select(&self, name: &str) -> Vec<String> {
        match self.prop(name) {
            Some(PropertyValue::MultiSelect { multi_select }) => {
                multi_select.iter().map(|o| o.name.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// The URL scalar, or `""`.
    pub fn url(&self, name: &str) -> String {
        match self.prop(name) {
            Some(PropertyValue::Url { url }) => url.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// The email scalar, or `""`.
    pub fn email(&self, name: &str) -> String {
        match self.prop(name) {
            Some(PropertyValue::Email { email }) => email.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// The phone-number scalar, or `""`.
    pub fn phone(&self, name: &str) -> String {
        match self.prop(name) {
            Some(PropertyValue::PhoneNumber { phone_number }) => {
                phone_number.clone().unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    /// The ISO start date string, or `""`.
    pub fn date(&self, name: &str) -> String {
        match self.prop(name) {
            Some(PropertyValue::Date { date }) => date
                .as_ref()
                .and_then(|d| d.start.clone())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Ordered resolved URLs of a files field. Entries with no URL are
    /// dropped; `[]` if the field is absent.
    pub fn files(&self, name: &str) -> Vec<String> {
        match self.prop(name) {
            Some(PropertyValue::Files { files }) => files
                .iter()
                .filter_map(|f| f.url().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Files from the first of `names` that yields any, `[]` otherwise.
    pub fn files_any(&self, names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|n| self.files(n))
            .find(|urls| !urls.is_empty())
            .unwrap_or_default()
    }

    /// Ordered related-record identifiers, `[]` if absent.
    pub fn relation_ids(&self, name: &str) -> Vec<PageId> {
        match self.prop(name) {
            Some(PropertyValue::Relation { relation }) => {
                relation.iter().map(|r| r.id.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// The text of whichever field is the title-type field, located by
    /// type rather than by fixed name — the schema may rename its title
    /// column freely. `None` when the row has no title field at all.
    pub fn title(&self) -> Option<String> {
        self.properties.values().find_map(|value| match value {
            PropertyValue::Title { title } => Some(join_plain_text(title)),
            _ => None,
        })
    }

    /// Like [`Row::title`] but substituting a per-entity default label.
    pub fn title_or(&self, default: &str) -> String {
        match self.title() {
            Some(t) if !t.is_empty() => t,
            _ => default.to_string(),
        }
    }
}
