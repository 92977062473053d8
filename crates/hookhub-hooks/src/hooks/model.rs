//! Model hooks: plugins contribute abstract field sets (mixins) to a host
//! entity.
//!
//! Two ways to consume the registry:
//!
//! - **simple**: [`ModelHooks::mixins`] hands back the registered schemas
//!   and the host combines them itself;
//! - **composing**: [`ModelHooks::plugins`] merges every mixin into one
//!   abstract schema, and [`ModelHooks::compose`] extends it with the
//!   host's own fields into the concrete entity.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hookhub_core::config::hooks::ModelHookConfig;
use hookhub_core::{HooksError, HooksResult};

use super::members::{Identity, MemberList};

/// Storage type of a declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Boolean,
    Integer,
    Float,
    Char { max_length: u32 },
    Text,
    DateTime,
    Json,
    ForeignKey { to: String },
}

/// A named, typed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for a `Char` field.
    pub fn char(name: impl Into<String>, max_length: u32) -> Self {
        Self::new(name, FieldKind::Char { max_length })
    }

    /// Shorthand for a `Text` field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }
}

/// What a schema ultimately derives from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelBase {
    /// The recognized persistable-entity capability.
    Model,
    /// Anything else, named for error messages.
    Other(String),
}

impl fmt::Display for ModelBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "Model"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Declared shape of an entity or mixin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    pub base: ModelBase,
    pub is_abstract: bool,
    pub fields: Vec<FieldDef>,
}

impl ModelSchema {
    /// A concrete schema deriving from `Model`.
    pub fn model(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: ModelBase::Model,
            is_abstract: false,
            fields: Vec::new(),
        }
    }

    /// An abstract schema deriving from `Model`, i.e. a valid mixin.
    pub fn abstract_model(name: impl Into<String>) -> Self {
        Self::model(name).with_abstract(true)
    }

    pub fn with_base(mut self, base: ModelBase) -> Self {
        self.base = base;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Accumulates fields from several owners, refusing name collisions.
pub(crate) struct FieldMerge<T> {
    fields: Vec<T>,
    owners: HashMap<String, String>,
}

impl<T: Clone> FieldMerge<T> {
    pub(crate) fn new() -> Self {
        Self {
            fields: Vec::new(),
            owners: HashMap::new(),
        }
    }

    pub(crate) fn extend<'a>(
        &mut self,
        owner: &str,
        fields: impl IntoIterator<Item = &'a T>,
        name_of: fn(&T) -> &str,
    ) -> HooksResult<()>
    where
        T: 'a,
    {
        for field in fields {
            let name = name_of(field);
            if let Some(previous) = self.owners.get(name) {
                return Err(HooksError::conflict(format!(
                    "Field '{name}' is declared by both {previous} and {owner}"
                )));
            }
            self.owners.insert(name.to_string(), owner.to_string());
            self.fields.push(field.clone());
        }
        Ok(())
    }

    pub(crate) fn into_fields(self) -> Vec<T> {
        self.fields
    }
}

fn field_name(field: &FieldDef) -> &str {
    &field.name
}

/// Fails unless `schema` is an abstract schema deriving from `Model`.
fn check_abstract_model(schema: &ModelSchema) -> HooksResult<()> {
    if schema.base != ModelBase::Model {
        return Err(HooksError::contract(format!(
            "{} must inherit from {}",
            schema.name,
            ModelBase::Model
        )));
    }
    if !schema.is_abstract {
        return Err(HooksError::contract(format!(
            "{} must be abstract",
            schema.name
        )));
    }
    Ok(())
}

/// Registered mixins are identified by name; two different schemas may not
/// share one.
#[derive(Clone)]
struct Mixin(Arc<ModelSchema>);

impl Identity for Mixin {
    fn is_same(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

/// Registry of abstract mixins. Registration is idempotent.
pub struct ModelHooks {
    composite_name: String,
    mixins: MemberList<Mixin>,
}

impl ModelHooks {
    /// Creates an empty registry with the default composite name.
    pub fn new() -> Self {
        Self::from_config(&ModelHookConfig::default())
    }

    /// Creates an empty registry named by `config`.
    pub fn from_config(config: &ModelHookConfig) -> Self {
        Self {
            composite_name: config.composite_name.clone(),
            mixins: MemberList::new(),
        }
    }

    /// Registers a mixin.
    ///
    /// Returns `Ok(false)` if the same schema is already registered, a
    /// `Conflict` error if a different schema already uses its name, and a
    /// `Contract` error unless the schema is abstract and derives from
    /// `Model`.
    pub fn register(&self, schema: ModelSchema) -> HooksResult<bool> {
        check_abstract_model(&schema)?;

        let schema = Arc::new(schema);
        match self.mixins.push_or_get(Mixin(schema.clone())) {
            None => {
                info!(mixin = %schema.name, "Model mixin registered");
                Ok(true)
            }
            Some(existing) if *existing.0 == *schema => {
                debug!(mixin = %schema.name, "Model mixin already registered");
                Ok(false)
            }
            Some(_) => Err(HooksError::conflict(format!(
                "Mixin '{}' is already registered with a different shape",
                schema.name
            ))),
        }
    }

    /// Unregisters the mixin named `name`.
    pub fn unregister(&self, name: &str) -> bool {
        self.mixins.remove_where(|m| m.0.name == name) > 0
    }

    /// Returns whether a mixin named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.mixins.snapshot().iter().any(|m| m.0.name == name)
    }

    /// The registered mixins in registration order.
    pub fn mixins(&self) -> Vec<Arc<ModelSchema>> {
        self.mixins.snapshot().into_iter().map(|m| m.0).collect()
    }

    pub fn len(&self) -> usize {
        self.mixins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mixins.is_empty()
    }

    pub fn clear(&self) {
        self.mixins.clear();
    }

    /// Synthesizes a fresh abstract schema holding every mixin's fields.
    pub fn plugins(&self) -> HooksResult<ModelSchema> {
        let mut merge = FieldMerge::new();
        for mixin in self.mixins.snapshot() {
            merge.extend(&mixin.0.name, &mixin.0.fields, field_name)?;
        }

        Ok(ModelSchema::abstract_model(self.composite_name.as_str())
            .with_fields(merge.into_fields()))
    }

    /// Builds the concrete entity `name` from every mixin plus its own
    /// fields.
    pub fn compose(
        &self,
        name: &str,
        own_fields: impl IntoIterator<Item = FieldDef>,
    ) -> HooksResult<ModelSchema> {
        let plugins = self.plugins()?;
        let own_fields: Vec<FieldDef> = own_fields.into_iter().collect();

        let mut merge = FieldMerge::new();
        merge.extend(&plugins.name, &plugins.fields, field_name)?;
        merge.extend(name, &own_fields, field_name)?;

        debug!(model = %name, mixins = self.len(), "Model composed");

        Ok(ModelSchema::model(name).with_fields(merge.into_fields()))
    }
}

impl Default for ModelHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModelHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .mixins
            .snapshot()
            .iter()
            .map(|m| m.0.name.clone())
            .collect();
        f.debug_struct("ModelHooks")
            .field("composite_name", &self.composite_name)
            .field("mixins", &names)
            .finish()
    }
}
