//! # Structure Properties
//!
//! Property tests over generated declarations:
//!
//! - required and optional names partition the declared fields;
//! - supplying every required field (and nothing else) always constructs;
//! - every stored value re-validates against its own field.

use proptest::prelude::*;
use typd_core::Value;
use typd_field::{Field, TypeSpec};
use typd_structure::Schema;

#[derive(Debug, Clone, Copy)]
enum Kind {
    Int,
    Str,
    OptionalInt,
    Defaulted,
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Int),
        Just(Kind::Str),
        Just(Kind::OptionalInt),
        Just(Kind::Defaulted),
    ]
}

fn spec(kind: Kind) -> TypeSpec {
    match kind {
        Kind::Int => TypeSpec::Int,
        Kind::Str => TypeSpec::Str,
        Kind::OptionalInt => TypeSpec::optional(TypeSpec::Int),
        Kind::Defaulted => Field::string().with_default("d").into(),
    }
}

fn sample(kind: Kind, seed: i64) -> Value {
    match kind {
        Kind::Int | Kind::OptionalInt => Value::Int(seed),
        Kind::Str | Kind::Defaulted => Value::from(format!("v{seed}")),
    }
}

proptest! {
    #[test]
    fn required_and_optional_partition_the_fields(
        kinds in prop::collection::vec(kind(), 1..8),
        optional_mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let names: Vec<String> = (0..kinds.len()).map(|i| format!("f{i}")).collect();
        let listed: Vec<&String> = names
            .iter()
            .zip(&optional_mask)
            .filter(|(_, listed)| **listed)
            .map(|(name, _)| name)
            .collect();

        let mut builder = Schema::builder("Generated");
        for (name, kind) in names.iter().zip(&kinds) {
            builder = builder.field(name.as_str(), spec(*kind));
        }
        let schema = builder.optional(listed.iter().map(|n| n.as_str())).build().unwrap();

        for name in &names {
            let required = schema.required().contains(name);
            let optional = schema.optional().contains(name);
            prop_assert!(required != optional, "{name} must be in exactly one set");
        }
        prop_assert_eq!(schema.required().len() + schema.optional().len(), names.len());
        for name in listed {
            prop_assert!(schema.optional().contains(name));
        }
    }

    #[test]
    fn required_fields_suffice_and_values_revalidate(
        kinds in prop::collection::vec(kind(), 1..8),
        seed in -1000i64..1000,
    ) {
        let mut builder = Schema::builder("Generated");
        for (i, kind) in kinds.iter().enumerate() {
            builder = builder.field(format!("f{i}"), spec(*kind));
        }
        let schema = builder.build().unwrap();

        let args: Vec<(String, Value)> = kinds
            .iter()
            .enumerate()
            .filter(|(i, _)| schema.is_required(&format!("f{i}")))
            .map(|(i, kind)| (format!("f{i}"), sample(*kind, seed)))
            .collect();
        let instance = schema.construct(args).unwrap();
        prop_assert!(instance.revalidate().is_ok());

        for (i, kind) in kinds.iter().enumerate() {
            let value = instance.get(&format!("f{i}")).unwrap();
            match kind {
                Kind::Defaulted => prop_assert_eq!(value, &Value::from("d")),
                Kind::OptionalInt => prop_assert!(value.is_none()),
                Kind::Int | Kind::Str => prop_assert_eq!(value, &sample(*kind, seed)),
            }
        }
    }
}
