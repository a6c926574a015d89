use super::*;
use crate::error::ErrorKind;

#[derive(Debug, Default)]
struct Person {
    name: String,
    age: i64,
    active: bool,
}

fn get_name(p: &Person) -> Value {
    p.name.as_str().into()
}

fn set_name(p: &mut Person, v: Value) -> Result<(), Error> {
    p.name = v.as_str().unwrap_or_default().to_owned();
    Ok(())
}

fn get_age(p: &Person) -> Value {
    p.age.into()
}

fn set_age(p: &mut Person, v: Value) -> Result<(), Error> {
    p.age = v.as_i64().unwrap_or_default();
    Ok(())
}

fn is_active(p: &Person) -> Value {
    p.active.into()
}

fn person() -> TypeDescriptor<Person> {
    TypeDescriptor::new("Person")
        .getter("getName", DeclaredType::String, get_name)
        .setter("setName", DeclaredType::String, set_name)
        .getter("getAge", DeclaredType::Integer, get_age)
        .setter("setAge", DeclaredType::Integer, set_age)
        .getter("isActive", DeclaredType::Bool, is_active)
}

fn build(descriptor: TypeDescriptor<Person>) -> Result<Schema<Person>, Error> {
    build_from_descriptor(descriptor)
}

fn conflict(descriptor: TypeDescriptor<Person>) -> SchemaConflict {
    match build(descriptor) {
        Err(Error::SchemaConflict(c)) => c,
        other => panic!("expected a schema conflict, got {other:?}"),
    }
}

fn json_names(schema: &Schema<Person>) -> Vec<&str> {
    schema.iter().map(PropertyReference::json_name).collect()
}

#[test]
fn discovers_accessor_pairs_in_order() {
    let schema = build(person()).unwrap();
    assert_eq!(json_names(&schema), ["name", "age", "active"]);

    let name = schema.get("name").unwrap();
    assert!(name.getter_present() && name.setter_present());
    assert!(name.serialize_enabled() && name.deserialize_enabled());
    assert_eq!(name.declared_type(), &DeclaredType::String);

    let active = schema.get("active").unwrap();
    assert!(active.serialize_enabled());
    assert!(!active.deserialize_enabled());
}

#[test]
fn getters_and_setters_are_callable() {
    let schema = build(person()).unwrap();
    let mut p = Person::default();
    schema.get("age").unwrap().set(&mut p, Value::Integer(41)).unwrap();
    assert_eq!(schema.get("age").unwrap().get(&p), Some(Value::Integer(41)));
}

#[test]
fn set_checks_declared_type() {
    let schema = build(person()).unwrap();
    let mut p = Person::default();
    let err = schema
        .get("age")
        .unwrap()
        .set(&mut p, Value::String("old".into()))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "property `age` expects integer, found string"
    );
}

#[test]
fn non_accessors_and_static_methods_are_skipped() {
    let schema = build(
        person()
            .method(MethodDecl {
                name: "getInstance",
                is_static: true,
                params: Vec::new(),
                returns: Some(DeclaredType::Object("Person")),
                annotations: Annotations::default(),
                binding: None,
            })
            .method(MethodDecl {
                name: "toString",
                is_static: false,
                params: Vec::new(),
                returns: Some(DeclaredType::String),
                annotations: Annotations::default(),
                binding: None,
            }),
    )
    .unwrap();
    assert_eq!(schema.len(), 3);
}

#[test]
fn get_and_is_for_same_name_conflict() {
    let c = conflict(person().getter("getActive", DeclaredType::Bool, is_active));
    assert_eq!(
        c,
        SchemaConflict::DuplicateGetter {
            type_name: "Person",
            accessor: "getActive"
        }
    );
}

#[test]
fn duplicate_setter_conflicts() {
    let c = conflict(person().setter("set_name", DeclaredType::String, set_name));
    assert_eq!(
        c,
        SchemaConflict::DuplicateSetter {
            type_name: "Person",
            accessor: "set_name"
        }
    );
}

#[test]
fn getter_setter_type_mismatch_conflicts() {
    let c = conflict(person().setter("setActive", DeclaredType::String, set_name));
    assert_eq!(
        c,
        SchemaConflict::TypeMismatch {
            type_name: "Person",
            accessor: "setActive"
        }
    );
}

#[test]
fn unbound_accessor_is_unsupported() {
    let err = build(person().method(MethodDecl {
        name: "getNickname",
        is_static: false,
        params: Vec::new(),
        returns: Some(DeclaredType::String),
        annotations: Annotations::default(),
        binding: None,
    }))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
}

#[test]
fn ignored_getter_removes_property_even_with_setter_after() {
    let schema = build(
        TypeDescriptor::new("Person")
            .getter("getName", DeclaredType::String, get_name)
            .ignored()
            .setter("setName", DeclaredType::String, set_name)
            .getter("getAge", DeclaredType::Integer, get_age),
    )
    .unwrap();
    assert_eq!(json_names(&schema), ["age"]);
}

#[test]
fn ignored_setter_removes_already_discovered_property() {
    let schema = build(
        person()
            .setter("setActive", DeclaredType::Bool, |_, _| Ok(()))
            .ignored(),
    )
    .unwrap();
    assert_eq!(json_names(&schema), ["name", "age"]);
}

#[test]
fn ignore_beats_override_on_other_accessor() {
    let schema = build(
        TypeDescriptor::new("Person")
            .getter("getName", DeclaredType::String, get_name)
            .with_override(PropertyOverride::renamed("fullName"))
            .setter("setName", DeclaredType::String, set_name)
            .ignored(),
    )
    .unwrap();
    assert!(schema.is_empty());
}

#[test]
fn ignored_field_removes_property() {
    let schema = build(person().field("age").ignored()).unwrap();
    assert_eq!(json_names(&schema), ["name", "active"]);
}

#[test]
fn ignored_ancestor_field_removes_property() {
    let schema = build(
        person()
            .field("name")
            .superclass("Entity")
            .field("name")
            .ignored(),
    )
    .unwrap();
    assert_eq!(json_names(&schema), ["age", "active"]);
}

#[test]
fn field_override_renames() {
    let schema = build(
        person()
            .field("name")
            .with_override(PropertyOverride::renamed("full_name")),
    )
    .unwrap();
    assert_eq!(json_names(&schema), ["full_name", "age", "active"]);
    assert_eq!(schema.get("full_name").unwrap().name(), "name");
    assert!(schema.get("name").is_none());
}

#[test]
fn empty_rename_keeps_logical_name() {
    let schema = build(
        person().field("age").with_override(PropertyOverride {
            name: Some(""),
            direction: Direction::SerializeOnly,
        }),
    )
    .unwrap();
    let age = schema.get("age").unwrap();
    assert!(age.serialize_enabled());
    assert!(!age.deserialize_enabled());
    assert!(age.setter_present());
}

#[test]
fn deserialize_only_drops_getter() {
    let schema = build(
        TypeDescriptor::new("Person")
            .getter("getName", DeclaredType::String, get_name)
            .setter("setName", DeclaredType::String, set_name)
            .with_override(PropertyOverride::direction(Direction::DeserializeOnly)),
    )
    .unwrap();
    let name = schema.get("name").unwrap();
    assert!(!name.serialize_enabled());
    assert!(name.deserialize_enabled());
    assert!(name.getter_present());
    assert_eq!(name.get(&Person::default()), None);
}

#[test]
fn outermost_field_override_wins() {
    let schema = build(
        person()
            .superclass("Entity")
            .field("name")
            .with_override(PropertyOverride::renamed("entityName"))
            .superclass("Object")
            .field("name")
            .with_override(PropertyOverride::renamed("objectName")),
    )
    .unwrap();
    assert_eq!(json_names(&schema), ["objectName", "age", "active"]);
}

#[test]
fn unannotated_ancestor_field_clears_override() {
    let schema = build(
        person()
            .field("name")
            .with_override(PropertyOverride::renamed("ownName"))
            .superclass("Entity")
            .field("name"),
    )
    .unwrap();
    assert_eq!(json_names(&schema), ["name", "age", "active"]);
}

#[test]
fn field_walk_does_not_depend_on_declaration_order() {
    // The type's own field declared last is still visited before its ancestors.
    let mut descriptor = person().superclass("Entity").field("name");
    descriptor = descriptor.with_override(PropertyOverride::renamed("entityName"));
    descriptor.fields.push(FieldDecl {
        name: "name",
        depth: 0,
        annotations: Annotations {
            ignore: false,
            property: Some(PropertyOverride::renamed("ownName")),
        },
    });
    let schema = build(descriptor).unwrap();
    assert_eq!(json_names(&schema), ["entityName", "age", "active"]);
}

#[test]
fn overrides_on_two_members_conflict() {
    let c = conflict(
        TypeDescriptor::new("Person")
            .getter("getName", DeclaredType::String, get_name)
            .with_override(PropertyOverride::renamed("a"))
            .setter("setName", DeclaredType::String, set_name)
            .field("name")
            .with_override(PropertyOverride::renamed("a")),
    );
    assert_eq!(
        c,
        SchemaConflict::ConflictingOverrides {
            type_name: "Person",
            property: "name".into()
        }
    );
}

#[test]
fn getter_and_setter_overrides_conflict_even_when_equal() {
    let c = conflict(
        TypeDescriptor::new("Person")
            .getter("getName", DeclaredType::String, get_name)
            .with_override(PropertyOverride::renamed("n"))
            .setter("setName", DeclaredType::String, set_name)
            .with_override(PropertyOverride::renamed("n")),
    );
    assert!(matches!(c, SchemaConflict::ConflictingOverrides { .. }));
}

#[test]
fn renamed_collision_is_a_conflict() {
    let c = conflict(
        person()
            .field("age")
            .with_override(PropertyOverride::renamed("name")),
    );
    assert_eq!(
        c,
        SchemaConflict::DuplicateJsonName {
            type_name: "Person",
            json_name: "name".into(),
            first: "name".into(),
            second: "age".into(),
        }
    );
}

#[test]
fn shared_name_across_directions_is_allowed() {
    let schema = build(
        TypeDescriptor::new("Person")
            .getter("getName", DeclaredType::String, get_name)
            .with_override(PropertyOverride {
                name: Some("label"),
                direction: Direction::SerializeOnly,
            })
            .setter("setTitle", DeclaredType::String, set_name)
            .with_override(PropertyOverride {
                name: Some("label"),
                direction: Direction::DeserializeOnly,
            }),
    )
    .unwrap();
    assert_eq!(json_names(&schema), ["label", "label"]);

    let label = schema.get("label").unwrap();
    assert_eq!(label.name(), "title");
    assert!(label.deserialize_enabled());
    assert!(schema.properties()[0].serialize_enabled());
}

#[test]
fn shared_name_with_overlapping_direction_conflicts() {
    let c = conflict(
        person()
            .setter("setTitle", DeclaredType::String, set_name)
            .with_override(PropertyOverride::renamed("name")),
    );
    assert_eq!(
        c,
        SchemaConflict::DuplicateJsonName {
            type_name: "Person",
            json_name: "name".into(),
            first: "name".into(),
            second: "title".into(),
        }
    );
}

#[test]
fn fields_without_accessors_are_skipped() {
    let schema = build(
        person()
            .field("internalCounter")
            .with_override(PropertyOverride::renamed("counter")),
    )
    .unwrap();
    assert_eq!(schema.len(), 3);
}

#[test]
fn declared_type_acceptance() {
    let seq = DeclaredType::Sequence(Box::new(DeclaredType::Integer));
    assert!(seq.accepts(&Value::Array(vec![Value::Integer(1)])));
    assert!(!seq.accepts(&Value::Array(vec![Value::Float(1.5)])));
    assert!(seq.accepts(&Value::Null));
    assert!(!DeclaredType::Integer.accepts(&Value::Null));
    assert!(DeclaredType::Float.accepts(&Value::Integer(3)));
    assert!(!DeclaredType::Integer.accepts(&Value::Float(3.0)));
    assert_eq!(
        DeclaredType::Mapping(Box::new(seq)).to_string(),
        "mapping<sequence<integer>>"
    );
}

struct Opaque;

#[test]
fn descriptors_debug_without_debug_target() {
    let descriptor = TypeDescriptor::<Opaque>::new("Opaque")
        .getter("getId", DeclaredType::Integer, |_| Value::Integer(1))
        .ignored();
    let shown = format!("{descriptor:?}");
    assert!(shown.contains(r#"name: "getId""#));
    assert!(shown.contains("binding: Some(Get(..))"));
    assert!(shown.contains("ignore: true"));
}
