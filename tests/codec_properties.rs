//! Property tests for the value codec, STAR text quoting and row broadcasting.

use nmrstar::category::{BuildContext, CategorySpec, TagCategory};
use nmrstar::codec::{decode, decode_column, encode, encode_column, SENTINEL};
use nmrstar::naming::CategoryNaming;
use nmrstar::star::{parse, render};
use nmrstar::value::{Format, Value};
use nmrstar::{bind, Block, FieldSpec, Table};
use proptest::prelude::*;

#[derive(Debug, Default, PartialEq)]
struct Probe {
    frq: Option<f64>,
    values: Vec<Option<i64>>,
}

const PROBE: CategoryNaming = nmrstar::naming!(Some("Probe"), [
    "Frq" => "Frq",
    "Val" => "Val",
]);

fn probe_category() -> TagCategory<Probe> {
    let spec = CategorySpec::looped(
        "Probe",
        vec![
            FieldSpec::attr("Frq", bind!(Probe, frq)).float(),
            FieldSpec::attr("Val", bind!(Probe, values)).int(),
        ],
    );
    TagCategory::new(spec, &PROBE).unwrap()
}

fn context() -> BuildContext<'static> {
    BuildContext {
        marker: "probe",
        framecode: "probe 1",
        list_id: 1,
    }
}

#[test]
fn test_sentinel_idempotence() {
    for format in [Format::Str, Format::Int, Format::Float] {
        assert_eq!(decode(&encode(None), format).unwrap(), None);
        let decoded = decode(SENTINEL, format).unwrap();
        assert_eq!(encode(decoded.as_ref()), SENTINEL);
        assert_eq!(decode(".", format).unwrap(), None);
    }
}

proptest! {
    #[test]
    fn prop_int_round_trip(n in any::<i64>()) {
        let text = encode(Some(&Value::Int(n)));
        prop_assert_eq!(decode(&text, Format::Int).unwrap(), Some(Value::Int(n)));
    }

    #[test]
    fn prop_float_round_trip(x in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let text = encode(Some(&Value::Float(x)));
        prop_assert_eq!(decode(&text, Format::Float).unwrap(), Some(Value::Float(x)));
    }

    #[test]
    fn prop_column_keeps_missing_positions(
        column in prop::collection::vec(prop::option::of(-1000i64..1000), 0..50)
    ) {
        let values: Vec<Option<Value>> = column.iter().map(|v| v.map(Value::Int)).collect();
        let texts = encode_column(&values);
        prop_assert_eq!(texts.len(), column.len());
        prop_assert_eq!(decode_column(&texts, Format::Int).unwrap(), values);
    }

    #[test]
    fn prop_text_survives_quoting(
        words in prop::collection::vec("[A-Za-z0-9 .,;:'\"()_$#/+\\\\\n-]{1,24}", 1..8)
    ) {
        prop_assume!(words.iter().all(|w| w != "?" && w != "."));

        let mut free = Table::new(true);
        free.push_column("_Probe_list.Details".into(), vec![words[0].clone()]);
        let mut looped = Table::new(false);
        looped.push_column("_Probe.Text".into(), words.clone());
        looped.push_column("_Probe.ID".into(), (1..=words.len()).map(|i| i.to_string()).collect());
        let mut block = Block::new("probe_1");
        block.tables = vec![free, looped];

        let text = render("properties", std::slice::from_ref(&block));
        let document = parse(&text).unwrap();
        prop_assert_eq!(document.blocks, vec![block]);
    }

    #[test]
    fn prop_scalar_broadcasts_to_list_length(
        frq in 1.0f64..1000.0,
        values in prop::collection::vec(prop::option::of(any::<i64>()), 1..40)
    ) {
        let category = probe_category();
        let probe = Probe { frq: Some(frq), values: values.clone() };
        let table = category.build(&probe, &context()).unwrap();

        prop_assert_eq!(table.nrows(), values.len());
        let expected = encode(Some(&Value::Float(frq)));
        let column = table.column("_Probe.Frq").unwrap();
        prop_assert!(column.iter().all(|text| *text == expected));

        let mut decoded = Probe::default();
        category.extract(&table, &mut decoded).unwrap();
        prop_assert_eq!(decoded.frq, Some(frq));
        prop_assert_eq!(decoded.values.len(), if values.iter().all(Option::is_none) { 0 } else { values.len() });
    }

    #[test]
    fn prop_mismatched_lists_are_rejected(n in 1usize..20, extra in 1usize..5) {
        #[derive(Debug, Default)]
        struct Pair {
            left: Vec<Option<i64>>,
            right: Vec<Option<i64>>,
        }
        const PAIR: CategoryNaming = nmrstar::naming!(Some("Pair"), ["Left" => "Left", "Right" => "Right"]);
        let spec = CategorySpec::looped(
            "Pair",
            vec![
                FieldSpec::attr("Left", bind!(Pair, left)).int().required(),
                FieldSpec::attr("Right", bind!(Pair, right)).int(),
            ],
        );
        let category = TagCategory::new(spec, &PAIR).unwrap();
        let pair = Pair {
            left: vec![Some(1); n],
            right: vec![Some(2); n + extra],
        };
        let err = category.build(&pair, &context()).unwrap_err();
        let is_length_mismatch = matches!(
            err,
            nmrstar::StarError::LengthMismatch { expected, found, .. } if expected == n && found == n + extra
        );
        prop_assert!(is_length_mismatch);
    }
}
