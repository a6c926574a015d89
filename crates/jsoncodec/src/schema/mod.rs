//! Property schemas for typed (de)serialization.
//!
//! Rust has no runtime reflection, so a type lists its members in a
//! [`TypeDescriptor`] through the [`Describe`] trait: accessor methods with
//! their declared types and callable bindings, plus field declarations (own
//! and inherited) that may carry annotations. [`build_schema`] resolves that
//! table into an ordered [`Schema`] of [`PropertyReference`]s:
//!
//! 1. Methods are classified as getters or setters by naming convention (see
//!    [`naming`]) and grouped by logical property name. A second getter or
//!    setter for a name, or a getter/setter pair whose types disagree, is a
//!    [`SchemaConflict`].
//! 2. An ignore marker on any accessor or field removes the property. Ignored
//!    names stay excluded for the rest of the build.
//! 3. Fields are visited from the most-derived type outwards. Each visit
//!    replaces the field override of the property of the same name, so the
//!    outermost declaring ancestor decides it.
//! 4. At most one of {field, getter, setter} may carry an override. The
//!    override sets the JSON name and may restrict the property to one
//!    direction.
//! 5. Two properties may share a JSON name only when no direction is
//!    enabled on both, such as a serialize-only and a deserialize-only one.
//!
//! Schemas are immutable once built; [`registry`] memoizes them per type.
//!
//! # Examples
//!
//! ```rust
//! use jsoncodec::schema::{build_schema, DeclaredType, Describe, TypeDescriptor};
//! use jsoncodec::Value;
//!
//! #[derive(Default)]
//! struct Point { x: i64, y: i64 }
//!
//! impl Describe for Point {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::<Self>::new("Point")
//!             .getter("getX", DeclaredType::Integer, |p| p.x.into())
//!             .setter("setX", DeclaredType::Integer, |p, v| {
//!                 p.x = v.as_i64().unwrap_or_default();
//!                 Ok(())
//!             })
//!             .getter("getY", DeclaredType::Integer, |p| p.y.into())
//!     }
//! }
//!
//! let schema = build_schema::<Point>().unwrap();
//! let names: Vec<_> = schema.iter().map(|p| p.json_name()).collect();
//! assert_eq!(names, ["x", "y"]);
//! assert!(!schema.get("y").unwrap().deserialize_enabled());
//! ```

pub(crate) mod naming;
pub mod registry;

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::{error::Error, value::Value};
use naming::{AccessorKind, classify};
pub use registry::{SchemaRegistry, schema_for};

/// Reads a property from an instance.
pub type Getter<T> = fn(&T) -> Value;
/// Stores a decoded, type-checked value into an instance.
pub type Setter<T> = fn(&mut T, Value) -> Result<(), Error>;

/// The value type an accessor declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Bool,
    Integer,
    Float,
    String,
    Sequence(Box<DeclaredType>),
    /// String-keyed mapping with values of the inner type.
    Mapping(Box<DeclaredType>),
    /// A nested described type, by name.
    Object(&'static str),
    /// Any JSON value.
    Any,
}

impl DeclaredType {
    /// Whether a decoded value can be stored in a property of this type.
    ///
    /// `null` is accepted only by types that have an absent state (strings,
    /// containers, nested objects and `Any`). Integers are accepted where a
    /// float is declared.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (DeclaredType::Any, _)
            | (DeclaredType::Bool, Value::Boolean(_))
            | (DeclaredType::Integer, Value::Integer(_))
            | (DeclaredType::Float, Value::Integer(_) | Value::Float(_))
            | (DeclaredType::String, Value::String(_))
            | (DeclaredType::Object(_), Value::Object(_)) => true,
            (
                DeclaredType::String
                | DeclaredType::Sequence(_)
                | DeclaredType::Mapping(_)
                | DeclaredType::Object(_),
                Value::Null,
            ) => true,
            (DeclaredType::Sequence(inner), Value::Array(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (DeclaredType::Mapping(inner), Value::Object(members)) => {
                members.values().all(|v| inner.accepts(v))
            }
            _ => false,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Bool => f.write_str("boolean"),
            DeclaredType::Integer => f.write_str("integer"),
            DeclaredType::Float => f.write_str("float"),
            DeclaredType::String => f.write_str("string"),
            DeclaredType::Sequence(inner) => write!(f, "sequence<{inner}>"),
            DeclaredType::Mapping(inner) => write!(f, "mapping<{inner}>"),
            DeclaredType::Object(name) => f.write_str(name),
            DeclaredType::Any => f.write_str("any"),
        }
    }
}

/// Which directions a property takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Both,
    /// Written but never read back; the setter is dropped.
    SerializeOnly,
    /// Read but never written; the getter is dropped.
    DeserializeOnly,
}

/// Explicit JSON name and/or direction for one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyOverride {
    /// JSON name to use instead of the logical name. `None` or an empty
    /// string keeps the logical name.
    pub name: Option<&'static str>,
    pub direction: Direction,
}

impl PropertyOverride {
    #[must_use]
    pub fn renamed(name: &'static str) -> Self {
        Self {
            name: Some(name),
            direction: Direction::Both,
        }
    }

    #[must_use]
    pub fn direction(direction: Direction) -> Self {
        Self {
            name: None,
            direction,
        }
    }
}

/// Markers attached to a method or field declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotations {
    pub ignore: bool,
    pub property: Option<PropertyOverride>,
}

/// Callable body of an accessor.
pub enum Binding<T> {
    Get(Getter<T>),
    Set(Setter<T>),
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Get(_) => f.write_str("Get(..)"),
            Binding::Set(_) => f.write_str("Set(..)"),
        }
    }
}

/// One method of a described type.
///
/// Methods that are neither getters nor setters are allowed and ignored by
/// the schema builder.
pub struct MethodDecl<T> {
    pub name: &'static str,
    pub is_static: bool,
    pub params: Vec<DeclaredType>,
    /// `None` for methods returning nothing.
    pub returns: Option<DeclaredType>,
    pub annotations: Annotations,
    pub binding: Option<Binding<T>>,
}

impl<T> fmt::Debug for MethodDecl<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDecl")
            .field("name", &self.name)
            .field("is_static", &self.is_static)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("annotations", &self.annotations)
            .field("binding", &self.binding)
            .finish()
    }
}

/// One field of a described type or one of its ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    /// 0 for the described type itself, 1 for its parent, and so on.
    pub depth: usize,
    pub annotations: Annotations,
}

#[derive(Debug, Clone, Copy)]
enum Member {
    Method(usize),
    Field(usize),
}

/// Declaration table for a type, built with chained calls.
///
/// Annotation helpers ([`ignored`](Self::ignored),
/// [`with_override`](Self::with_override)) apply to the member added last.
/// [`superclass`](Self::superclass) switches subsequent
/// [`field`](Self::field) calls to the next ancestor.
pub struct TypeDescriptor<T> {
    type_name: &'static str,
    ancestors: Vec<&'static str>,
    methods: Vec<MethodDecl<T>>,
    fields: Vec<FieldDecl>,
    last: Option<Member>,
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("ancestors", &self.ancestors)
            .field("methods", &self.methods)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<T> TypeDescriptor<T> {
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            ancestors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            last: None,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Adds an arbitrary method declaration.
    #[must_use]
    pub fn method(mut self, method: MethodDecl<T>) -> Self {
        self.last = Some(Member::Method(self.methods.len()));
        self.methods.push(method);
        self
    }

    /// Adds a bound, no-argument accessor returning `ty`.
    #[must_use]
    pub fn getter(self, name: &'static str, ty: DeclaredType, get: Getter<T>) -> Self {
        self.method(MethodDecl {
            name,
            is_static: false,
            params: Vec::new(),
            returns: Some(ty),
            annotations: Annotations::default(),
            binding: Some(Binding::Get(get)),
        })
    }

    /// Adds a bound, one-argument accessor taking `ty`.
    #[must_use]
    pub fn setter(self, name: &'static str, ty: DeclaredType, set: Setter<T>) -> Self {
        self.method(MethodDecl {
            name,
            is_static: false,
            params: vec![ty],
            returns: None,
            annotations: Annotations::default(),
            binding: Some(Binding::Set(set)),
        })
    }

    /// Adds a field of the type currently being declared (the described type
    /// until [`superclass`](Self::superclass) is called).
    #[must_use]
    pub fn field(mut self, name: &'static str) -> Self {
        self.last = Some(Member::Field(self.fields.len()));
        self.fields.push(FieldDecl {
            name,
            depth: self.ancestors.len(),
            annotations: Annotations::default(),
        });
        self
    }

    /// Starts declaring the fields of the next ancestor type.
    #[must_use]
    pub fn superclass(mut self, name: &'static str) -> Self {
        self.ancestors.push(name);
        self.last = None;
        self
    }

    /// Marks the last added member as ignored.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        if let Some(annotations) = self.last_annotations() {
            annotations.ignore = true;
        }
        self
    }

    /// Attaches a property override to the last added member.
    #[must_use]
    pub fn with_override(mut self, property: PropertyOverride) -> Self {
        if let Some(annotations) = self.last_annotations() {
            annotations.property = Some(property);
        }
        self
    }

    fn last_annotations(&mut self) -> Option<&mut Annotations> {
        match self.last? {
            Member::Method(i) => self.methods.get_mut(i).map(|m| &mut m.annotations),
            Member::Field(i) => self.fields.get_mut(i).map(|f| &mut f.annotations),
        }
    }
}

/// A type whose members can be described for schema discovery.
pub trait Describe: Sized + 'static {
    fn describe() -> TypeDescriptor<Self>;
}

/// Configuration errors found while building a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaConflict {
    #[error("duplicate getter methods: {type_name}.{accessor}")]
    DuplicateGetter {
        type_name: &'static str,
        accessor: &'static str,
    },
    #[error("duplicate setter methods: {type_name}.{accessor}")]
    DuplicateSetter {
        type_name: &'static str,
        accessor: &'static str,
    },
    #[error("type mismatch between getter and setter methods: {type_name}.{accessor}")]
    TypeMismatch {
        type_name: &'static str,
        accessor: &'static str,
    },
    #[error(
        "conflicting property overrides between field and getter/setter: {type_name}.{property}"
    )]
    ConflictingOverrides {
        type_name: &'static str,
        property: String,
    },
    #[error("properties `{first}` and `{second}` of {type_name} share the JSON name `{json_name}`")]
    DuplicateJsonName {
        type_name: &'static str,
        json_name: String,
        first: String,
        second: String,
    },
}

/// One resolved property of a type.
pub struct PropertyReference<T> {
    name: String,
    json_name: String,
    declared_type: DeclaredType,
    getter_present: bool,
    setter_present: bool,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
}

impl<T> PropertyReference<T> {
    /// Logical name derived from the accessor names.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn json_name(&self) -> &str {
        &self.json_name
    }

    #[must_use]
    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    /// Whether the type declares a getter, regardless of direction.
    #[must_use]
    pub fn getter_present(&self) -> bool {
        self.getter_present
    }

    #[must_use]
    pub fn setter_present(&self) -> bool {
        self.setter_present
    }

    /// Whether the property is written on output.
    #[must_use]
    pub fn serialize_enabled(&self) -> bool {
        self.getter.is_some()
    }

    /// Whether the property is read from input.
    #[must_use]
    pub fn deserialize_enabled(&self) -> bool {
        self.setter.is_some()
    }

    /// Reads the property, or `None` if it is not serialized.
    pub fn get(&self, target: &T) -> Option<Value> {
        self.getter.map(|get| get(target))
    }

    /// Stores `value` after checking it against the declared type.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if the value does not fit, or whatever the
    /// setter itself returns. Properties that are not deserialized ignore the
    /// value.
    pub fn set(&self, target: &mut T, value: Value) -> Result<(), Error> {
        let Some(set) = self.setter else {
            return Ok(());
        };
        if !self.declared_type.accepts(&value) {
            return Err(Error::TypeMismatch {
                property: self.json_name.clone(),
                expected: self.declared_type.to_string(),
                found: value.kind_name(),
            });
        }
        set(target, value)
    }
}

impl<T> fmt::Debug for PropertyReference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyReference")
            .field("name", &self.name)
            .field("json_name", &self.json_name)
            .field("declared_type", &self.declared_type)
            .field("getter_present", &self.getter_present)
            .field("setter_present", &self.setter_present)
            .field("serialize_enabled", &self.serialize_enabled())
            .field("deserialize_enabled", &self.deserialize_enabled())
            .finish()
    }
}

/// The ordered properties of one type, with a lookup by JSON name.
pub struct Schema<T> {
    type_name: &'static str,
    properties: Vec<PropertyReference<T>>,
    by_json_name: IndexMap<String, usize>,
}

impl<T> Schema<T> {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Properties in first-discovery order of their accessors.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyReference<T>> {
        self.properties.iter()
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyReference<T>] {
        &self.properties
    }

    /// Looks up a property by JSON name. When a serialize-only and a
    /// deserialize-only property share the name, the deserializing one is
    /// returned.
    #[must_use]
    pub fn get(&self, json_name: &str) -> Option<&PropertyReference<T>> {
        self.by_json_name
            .get(json_name)
            .and_then(|&i| self.properties.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .finish()
    }
}

/// A property while accessors and fields are still being collected.
struct Draft<T> {
    declared_type: DeclaredType,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
    getter_override: Option<PropertyOverride>,
    setter_override: Option<PropertyOverride>,
    field_override: Option<PropertyOverride>,
}

/// Builds the schema of `T` from its [`Describe`] table.
///
/// # Errors
///
/// [`Error::SchemaConflict`] for contradictory declarations and
/// [`Error::UnsupportedType`] when an accessor has no callable binding.
pub fn build_schema<T: Describe>() -> Result<Schema<T>, Error> {
    build_from_descriptor(T::describe())
}

/// Builds a schema from an explicit descriptor.
///
/// # Errors
///
/// See [`build_schema`].
pub fn build_from_descriptor<T>(descriptor: TypeDescriptor<T>) -> Result<Schema<T>, Error> {
    let TypeDescriptor {
        type_name,
        methods,
        mut fields,
        ..
    } = descriptor;

    let mut drafts: IndexMap<String, Draft<T>> = IndexMap::new();
    let mut ignored: HashSet<String> = HashSet::new();

    for method in &methods {
        let Some((kind, name)) = classify(method) else {
            continue;
        };
        if ignored.contains(&name) {
            continue;
        }
        if method.annotations.ignore {
            tracing::debug!(
                target: "jsoncodec::schema",
                type_name,
                property = %name,
                accessor = method.name,
                "property ignored"
            );
            drafts.shift_remove(&name);
            ignored.insert(name);
            continue;
        }

        let unbound = || Error::UnsupportedType {
            type_name,
            reason: format!("accessor `{}` has no callable binding", method.name),
        };
        let (declared_type, bound) = match kind {
            AccessorKind::Getter => match (&method.returns, &method.binding) {
                (Some(ty), Some(Binding::Get(get))) => (ty, Binding::Get(*get)),
                _ => return Err(unbound()),
            },
            AccessorKind::Setter => match (method.params.first(), &method.binding) {
                (Some(ty), Some(Binding::Set(set))) => (ty, Binding::Set(*set)),
                _ => return Err(unbound()),
            },
        };

        let draft = drafts.entry(name).or_insert_with(|| Draft {
            declared_type: declared_type.clone(),
            getter: None,
            setter: None,
            getter_override: None,
            setter_override: None,
            field_override: None,
        });

        match bound {
            Binding::Get(get) => {
                if draft.getter.is_some() {
                    return Err(SchemaConflict::DuplicateGetter {
                        type_name,
                        accessor: method.name,
                    }
                    .into());
                }
                if draft.declared_type != *declared_type {
                    return Err(SchemaConflict::TypeMismatch {
                        type_name,
                        accessor: method.name,
                    }
                    .into());
                }
                draft.getter = Some(get);
                draft.getter_override = method.annotations.property;
            }
            Binding::Set(set) => {
                if draft.setter.is_some() {
                    return Err(SchemaConflict::DuplicateSetter {
                        type_name,
                        accessor: method.name,
                    }
                    .into());
                }
                if draft.declared_type != *declared_type {
                    return Err(SchemaConflict::TypeMismatch {
                        type_name,
                        accessor: method.name,
                    }
                    .into());
                }
                draft.setter = Some(set);
                draft.setter_override = method.annotations.property;
            }
        }
    }

    // Walked outward from the described type, so the outermost declaring
    // ancestor has the last word on the field override.
    fields.sort_by_key(|f| f.depth);
    for field in &fields {
        if ignored.contains(field.name) {
            continue;
        }
        let Some(draft) = drafts.get_mut(field.name) else {
            continue;
        };
        if field.annotations.ignore {
            tracing::debug!(
                target: "jsoncodec::schema",
                type_name,
                property = field.name,
                depth = field.depth,
                "property ignored by field"
            );
            drafts.shift_remove(field.name);
            ignored.insert(field.name.to_owned());
            continue;
        }
        draft.field_override = field.annotations.property;
    }

    let mut properties = Vec::with_capacity(drafts.len());
    let mut by_json_name: IndexMap<String, usize> = IndexMap::with_capacity(drafts.len());
    let mut writers: HashMap<String, usize> = HashMap::new();
    let mut readers: HashMap<String, usize> = HashMap::new();
    for (name, draft) in drafts {
        let overrides = [draft.field_override, draft.getter_override, draft.setter_override];
        let mut present = overrides.into_iter().flatten();
        let resolved = present.next();
        if present.next().is_some() {
            return Err(SchemaConflict::ConflictingOverrides {
                type_name,
                property: name,
            }
            .into());
        }

        let mut property = PropertyReference {
            json_name: name.clone(),
            name,
            declared_type: draft.declared_type,
            getter_present: draft.getter.is_some(),
            setter_present: draft.setter.is_some(),
            getter: draft.getter,
            setter: draft.setter,
        };
        if let Some(resolved) = resolved {
            match resolved.direction {
                Direction::Both => {}
                Direction::SerializeOnly => property.setter = None,
                Direction::DeserializeOnly => property.getter = None,
            }
            if let Some(json_name) = resolved.name.filter(|n| !n.is_empty()) {
                json_name.clone_into(&mut property.json_name);
            }
        }

        // Names only clash within one direction.
        let clash = [
            (property.serialize_enabled(), &writers),
            (property.deserialize_enabled(), &readers),
        ]
        .into_iter()
        .find_map(|(enabled, seen)| {
            enabled
                .then(|| seen.get(&property.json_name))
                .flatten()
        });
        if let Some(&first) = clash {
            let first: &PropertyReference<T> = &properties[first];
            return Err(SchemaConflict::DuplicateJsonName {
                type_name,
                json_name: property.json_name,
                first: first.name.clone(),
                second: property.name,
            }
            .into());
        }

        let index = properties.len();
        if property.serialize_enabled() {
            writers.insert(property.json_name.clone(), index);
        }
        if property.deserialize_enabled() {
            readers.insert(property.json_name.clone(), index);
            by_json_name.insert(property.json_name.clone(), index);
        } else {
            by_json_name.entry(property.json_name.clone()).or_insert(index);
        }
        properties.push(property);
    }

    tracing::debug!(
        target: "jsoncodec::schema",
        type_name,
        properties = properties.len(),
        "schema built"
    );

    Ok(Schema {
        type_name,
        properties,
        by_json_name,
    })
}

#[cfg(test)]
mod tests;
