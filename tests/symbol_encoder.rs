use hdc::SymbolEncoder;

#[test]
fn distinct_symbols_get_distinct_patterns() {
    let mut enc = SymbolEncoder::new(2048, 0.02, 123).unwrap();
    let a = enc.encode("alpha", None).unwrap();
    let b = enc.encode("beta", None).unwrap();
    assert_ne!(
        a.keys().collect::<Vec<_>>(),
        b.keys().collect::<Vec<_>>()
    );
}

#[test]
fn integer_and_string_symbols_coexist() {
    let mut enc = SymbolEncoder::new(2048, 0.02, 123).unwrap();
    let s = enc.encode("7", None).unwrap();
    let n = enc.encode(7, None).unwrap();
    assert_ne!(s.keys().collect::<Vec<_>>(), n.keys().collect::<Vec<_>>());
}

#[test]
fn encoding_restricted_to_a_population_stays_within_it() {
    let mut enc = SymbolEncoder::new(2048, 0.02, 123).unwrap();
    let mut population = hdc::BitPattern::new();
    for b in 0..100 {
        population.set(b, 1.0);
    }
    let p = enc.encode("scoped", Some(&population)).unwrap();
    assert!(p.keys().all(|&b| b < 100));
}

#[test]
fn symbols_lists_encounter_order() {
    let mut enc = SymbolEncoder::new(2048, 0.02, 123).unwrap();
    enc.encode("first", None).unwrap();
    enc.encode("second", None).unwrap();
    enc.encode("first", None).unwrap();
    assert_eq!(enc.symbols().len(), 2);
}
