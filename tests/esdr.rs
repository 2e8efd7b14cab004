use hdc::esdr::{Esdr, Record, Value};
use hdc::{NumericEncoder, SymbolEncoder};

#[test]
fn similar_records_score_higher_than_dissimilar_ones() {
    let mut field_encoder = SymbolEncoder::new(2048, 0.02, 123).unwrap();
    let mut symbol_encoder = SymbolEncoder::new(2048, 0.02, 123).unwrap();
    let mut numeric_encoder = NumericEncoder::new(2048, 0.02, 1.0, 123).unwrap();

    let mut alice = Record::new();
    alice.insert("name".to_string(), Value::Str("alice".to_string()));
    alice.insert("age".to_string(), Value::Int(30));

    let mut alice_older = Record::new();
    alice_older.insert("name".to_string(), Value::Str("alice".to_string()));
    alice_older.insert("age".to_string(), Value::Int(31));

    let mut bob = Record::new();
    bob.insert("name".to_string(), Value::Str("bob".to_string()));
    bob.insert("age".to_string(), Value::Int(80));

    let mut a = Esdr::new();
    a.set_value(&alice, &mut field_encoder, &mut symbol_encoder, &mut numeric_encoder)
        .unwrap();
    let mut b = Esdr::new();
    b.set_value(
        &alice_older,
        &mut field_encoder,
        &mut symbol_encoder,
        &mut numeric_encoder,
    )
    .unwrap();
    let mut c = Esdr::new();
    c.set_value(&bob, &mut field_encoder, &mut symbol_encoder, &mut numeric_encoder)
        .unwrap();

    assert!(a.similarity(&b) > a.similarity(&c));
}

#[test]
fn list_fields_encode_each_element_under_a_synthesized_name() {
    let mut field_encoder = SymbolEncoder::new(2048, 0.02, 123).unwrap();
    let mut symbol_encoder = SymbolEncoder::new(2048, 0.02, 123).unwrap();
    let mut numeric_encoder = NumericEncoder::new(2048, 0.02, 1.0, 123).unwrap();

    let mut record = Record::new();
    record.insert(
        "tags".to_string(),
        Value::List(vec![
            Value::Str("admin".to_string()),
            Value::Str("operator".to_string()),
        ]),
    );

    let mut esdr = Esdr::new();
    esdr.set_value(&record, &mut field_encoder, &mut symbol_encoder, &mut numeric_encoder)
        .unwrap();

    assert_eq!(field_encoder.symbols().len(), 2);
    assert!(esdr.bits().len() > 0);
}

#[test]
fn learning_moves_memory_toward_the_target() {
    let mut a = Esdr::from_bits([1, 2, 3]);
    let b = Esdr::from_bits([4, 5, 6]);
    let before = a.similarity(&b);
    a.learn(&b, 0.9).unwrap();
    let after = a.similarity(&b);
    assert!(after > before);
}

#[test]
fn bundling_with_a_label_keeps_sources_distinguishable() {
    let mut memory = Esdr::new();
    let left = Esdr::from_bits([1, 2, 3]);
    let right = Esdr::from_bits([1, 2, 3]);

    memory.bundle(&left, Some("left"));
    memory.bundle(&right, Some("right"));

    assert_eq!(memory.bits().len(), 6);
}
