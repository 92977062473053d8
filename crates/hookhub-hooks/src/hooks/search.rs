//! Search index hooks: plugins contribute field sets to a host's search
//! index.
//!
//! Field sets are plain (neither an index nor indexable). The host builds
//! the final index from its own base index with
//! [`SearchIndexHooks::build_search_index`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use hookhub_core::{HooksError, HooksResult};

use super::members::MemberList;
use super::model::{FieldKind, FieldMerge};

/// Name of every index built by [`SearchIndexHooks::build_search_index`].
pub const COMPOSITE_INDEX_NAME: &str = "SearchIndexHook";

/// One indexed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchField {
    pub name: String,
    pub kind: FieldKind,
    /// Whether this is the index's main document field.
    #[serde(default)]
    pub document: bool,
    /// Entity attribute the value is read from, when it differs from `name`.
    #[serde(default)]
    pub model_attr: Option<String>,
}

impl SearchField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            document: false,
            model_attr: None,
        }
    }

    pub fn document(mut self) -> Self {
        self.document = true;
        self
    }

    pub fn model_attr(mut self, attr: impl Into<String>) -> Self {
        self.model_attr = Some(attr.into());
        self
    }
}

/// A named set of search fields, optionally marked as an index and/or
/// indexable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexSchema {
    pub name: String,
    pub is_search_index: bool,
    pub is_indexable: bool,
    pub fields: Vec<SearchField>,
}

impl SearchIndexSchema {
    /// A plain field set, the only shape plugins may register.
    pub fn field_set(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_search_index: false,
            is_indexable: false,
            fields: Vec::new(),
        }
    }

    /// A base search index.
    pub fn search_index(name: impl Into<String>) -> Self {
        Self {
            is_search_index: true,
            ..Self::field_set(name)
        }
    }

    pub fn indexable(mut self) -> Self {
        self.is_indexable = true;
        self
    }

    pub fn with_field(mut self, field: SearchField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

fn field_name(field: &SearchField) -> &str {
    &field.name
}

/// Registry of search field sets. Duplicates are kept.
#[derive(Default)]
pub struct SearchIndexHooks {
    field_sets: MemberList<Arc<SearchIndexSchema>>,
}

impl SearchIndexHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field set.
    ///
    /// Returns a `Contract` error when `field_set` is itself an index or
    /// indexable.
    pub fn register(&self, field_set: SearchIndexSchema) -> HooksResult<Arc<SearchIndexSchema>> {
        if field_set.is_search_index || field_set.is_indexable {
            return Err(HooksError::contract(format!(
                "{} can not be a search index or indexable",
                field_set.name
            )));
        }

        let field_set = Arc::new(field_set);
        self.field_sets.push(field_set.clone());
        Ok(field_set)
    }

    /// Removes the first registration of `field_set`.
    pub fn unregister(&self, field_set: &Arc<SearchIndexSchema>) -> bool {
        self.field_sets.remove(field_set)
    }

    /// Registered field sets in order.
    pub fn field_sets(&self) -> Vec<Arc<SearchIndexSchema>> {
        self.field_sets.snapshot()
    }

    pub fn len(&self) -> usize {
        self.field_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_sets.is_empty()
    }

    /// Builds an indexable index from `base` followed by every registered
    /// field set.
    pub fn build_search_index(&self, base: &SearchIndexSchema) -> HooksResult<SearchIndexSchema> {
        if !base.is_search_index {
            return Err(HooksError::contract(format!(
                "{} must be a search index",
                base.name
            )));
        }

        let field_sets = self.field_sets.snapshot();
        let names: Vec<&str> = field_sets.iter().map(|s| s.name.as_str()).collect();
        info!(base = %base.name, field_sets = ?names, "Building search index");

        let mut merge = FieldMerge::new();
        merge.extend(&base.name, &base.fields, field_name)?;
        for set in &field_sets {
            merge.extend(&set.name, &set.fields, field_name)?;
        }

        Ok(SearchIndexSchema {
            name: COMPOSITE_INDEX_NAME.to_string(),
            is_search_index: true,
            is_indexable: true,
            fields: merge.into_fields(),
        })
    }
}

impl fmt::Debug for SearchIndexHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchIndexHooks")
            .field("field_sets", &self.field_sets.len())
            .finish()
    }
}
