//! Value container behaviour of properties.

use metadoc::{DType, Error, ErrorKind, PropertyBuilder, Store, Value};

const KNOWN_ID: &str = "79b613eb-a256-46bf-84f6-207df465b8f7";

#[test]
fn test_simple_attributes() {
    let mut store = Store::new();
    let r = PropertyBuilder::new("propertyName")
        .value_origin("from over there")
        .unit("pears")
        .uncertainty("+-12")
        .reference("4 8 15 16 23")
        .definition("a test property")
        .dependency("yes")
        .dependency_value("42")
        .build(&mut store)
        .unwrap();

    let prop = store.property(r).unwrap();
    assert_eq!(prop.name(), "propertyName");
    assert_eq!(prop.value_origin(), Some("from over there"));
    assert_eq!(prop.unit(), Some("pears"));
    assert_eq!(prop.uncertainty(), Some("+-12"));
    assert_eq!(prop.reference(), Some("4 8 15 16 23"));
    assert_eq!(prop.definition(), Some("a test property"));
    assert_eq!(prop.dependency(), Some("yes"));
    assert_eq!(prop.dependency_value(), Some("42"));

    store.rename_property(r, "propertyName_edit").unwrap();
    let prop = store.property_mut(r).unwrap();
    prop.set_value_origin("");
    prop.set_uncertainty("");
    prop.set_reference("");
    prop.set_dependency("");
    assert_eq!(prop.name(), "propertyName_edit");
    assert_eq!(prop.value_origin(), None);
    assert_eq!(prop.uncertainty(), None);
    assert_eq!(prop.reference(), None);
    assert_eq!(prop.dependency(), None);
}

#[test]
fn test_value_container() {
    let mut store = Store::new();
    let r = PropertyBuilder::new("property").value(100).build(&mut store).unwrap();
    let p = store.property_mut(r).unwrap();
    assert_eq!(p[0], Value::Int(100));

    p.append(10, true).unwrap();
    assert_eq!(p.len(), 2);
    assert_eq!(
        p.append(vec![1, 2, 3], true).unwrap_err(),
        Error::MultipleValues { count: 3 }
    );

    p.extend(vec![Value::from(20), Value::from(30), Value::from("40")], true).unwrap();
    assert_eq!(p.len(), 5);
    assert_eq!(p[4], Value::Int(40));

    assert!(p.append("invalid", true).is_err());
    let err = p
        .extend(vec![Value::from("5"), Value::from(6), Value::from(7)], true)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueConflict);
    assert_eq!(p.len(), 5);

    let other = PropertyBuilder::new("property 2").value(3).build(&mut store).unwrap();
    store.extend_property(r, other, true).unwrap();
    assert_eq!(store.property(r).unwrap().len(), 6);
}

#[test]
fn test_empty_inputs_clear() {
    let mut store = Store::new();
    let r = store.create_property("p");
    let p = store.property_mut(r).unwrap();

    p.set_value(vec![1, 2, 3]).unwrap();
    p.set_value(None::<i64>).unwrap();
    assert_eq!(p.len(), 0);

    p.set_value(vec![1, 2, 3]).unwrap();
    p.set_value("").unwrap();
    assert_eq!(p.len(), 0);

    p.set_value(vec![1, 2, 3]).unwrap();
    p.set_value(Vec::<i64>::new()).unwrap();
    assert_eq!(p.len(), 0);

    p.set_value(vec![1, 2, 3]).unwrap();
    p.set_value(()).unwrap();
    assert!(p.is_empty());
    assert_eq!(p.dtype(), Some(DType::Int));
}

#[test]
fn test_strict_and_lenient_inserts() {
    let mut store = Store::new();
    let r = PropertyBuilder::new("p").value(vec![1, 2]).build(&mut store).unwrap();
    let p = store.property_mut(r).unwrap();
    p.set_value(()).unwrap();

    assert!(matches!(p.append(5.5, true), Err(Error::TypeMismatch { .. })));
    p.append(5.5, false).unwrap();
    assert_eq!(p.values(), &[Value::Int(5)]);

    assert!(p.extend(vec![3.25, 6.5], true).is_err());
    p.extend(vec![3.25, 6.5], false).unwrap();
    assert_eq!(p.len(), 3);
    assert_eq!(p.dtype(), Some(DType::Int));
}

#[test]
fn test_list_literal_strings() {
    let mut store = Store::new();
    let r = PropertyBuilder::new("test").value("a string").build(&mut store).unwrap();
    let p = store.property_mut(r).unwrap();

    p.append("Freude", true).unwrap();
    assert_eq!(p.len(), 2);
    assert!(p.append("[a, b, c]", true).is_err());
    p.extend("[a, b, c]", true).unwrap();
    assert_eq!(p.len(), 5);
    assert_eq!(p[4], Value::from("c"));
}

#[test]
fn test_unit_mismatch_on_extend() {
    let mut store = Store::new();
    let hz = PropertyBuilder::new("test").value(2).unit("Hz").build(&mut store).unwrap();
    let s = PropertyBuilder::new("test").value(5.5).unit("s").build(&mut store).unwrap();

    let err = store.extend_property(hz, s, true).unwrap_err();
    assert!(matches!(err, Error::UnitMismatch { .. }));
    assert_eq!(store.property(hz).unwrap().len(), 1);
}

#[test]
fn test_get_set_by_index() {
    let values = vec![1, 2, 3, 4, 5];
    let mut store = Store::new();
    let r = PropertyBuilder::new("property").value(values.clone()).build(&mut store).unwrap();
    let p = store.property_mut(r).unwrap();

    assert_eq!(p.len(), values.len());
    for (expected, actual) in values.iter().zip(p.iter()) {
        assert_eq!(actual.as_int(), Some(i64::from(*expected)));
    }
    assert_eq!((&*p).into_iter().count(), values.len());

    p.set(0, 10).unwrap();
    assert_eq!(p[0], Value::Int(10));
    assert!(p.set(1, "stringval").is_err());
    assert_eq!(p.get(1), Some(&Value::Int(2)));
    assert_eq!(p.get(5), None);
}

#[test]
fn test_int_to_bool_conversion() {
    let mut store = Store::new();
    let r = PropertyBuilder::new("received").value(vec![1, 0, 1, 0, 1]).build(&mut store).unwrap();
    let p = store.property_mut(r).unwrap();
    assert_eq!(p.dtype(), Some(DType::Int));

    p.set_dtype(DType::Boolean).unwrap();
    assert_eq!(p.dtype(), Some(DType::Boolean));
    let expected: Vec<Value> = [true, false, true, false, true].into_iter().map(Value::from).collect();
    assert_eq!(p.values(), expected.as_slice());

    let r = PropertyBuilder::new("received").value(vec![3, 0, 1, 0, 8]).build(&mut store).unwrap();
    let p = store.property_mut(r).unwrap();
    assert!(p.set_dtype(DType::Boolean).is_err());
    assert_eq!(p.dtype(), Some(DType::Int));
    assert_eq!(p[0], Value::Int(3));
    assert_eq!(p[4], Value::Int(8));
}

#[test]
fn test_str_to_bool_conversion() {
    let mut store = Store::new();
    let tokens = vec![
        Value::from("False"),
        Value::from(true),
        Value::from("TRUE"),
        Value::from("0"),
        Value::from("t"),
        Value::from("F"),
        Value::from("1"),
    ];
    let r = PropertyBuilder::new("sent").value(tokens).build(&mut store).unwrap();
    let q = store.property_mut(r).unwrap();
    assert_eq!(q.dtype(), Some(DType::String));
    assert_eq!(q[1], Value::from("true"));

    q.set_dtype("boolean").unwrap();
    let expected: Vec<Value> = [false, true, true, false, true, false, true]
        .into_iter()
        .map(Value::from)
        .collect();
    assert_eq!(q.values(), expected.as_slice());

    let r = PropertyBuilder::new("sent")
        .value(vec!["False", "TRUE", "12", "Ft"])
        .build(&mut store)
        .unwrap();
    let q = store.property_mut(r).unwrap();
    assert!(q.set_dtype(DType::Boolean).is_err());
    assert_eq!(q.dtype(), Some(DType::String));
}

#[test]
fn test_str_to_int_conversion() {
    let mut store = Store::new();
    let r = PropertyBuilder::new("cats_onboard")
        .value(vec!["3", "0", "1", "0", "8"])
        .build(&mut store)
        .unwrap();
    let p = store.property_mut(r).unwrap();
    p.set_dtype(DType::Int).unwrap();
    assert_eq!(p.values().iter().filter_map(Value::as_int).collect::<Vec<_>>(), vec![3, 0, 1, 0, 8]);

    let r = PropertyBuilder::new("dogs_onboard")
        .value(vec!["7", "20", "1 Dog", "Seven"])
        .build(&mut store)
        .unwrap();
    let p = store.property_mut(r).unwrap();
    assert!(p.set_dtype(DType::Int).is_err());
    assert_eq!(p.dtype(), Some(DType::String));
    assert_eq!(p[2], Value::from("1 Dog"));
}

#[test]
fn test_dtype_assignment() {
    let mut store = Store::new();
    let r = store.create_property("prop");
    let p = store.property_mut(r).unwrap();

    for dtype in DType::SCALARS {
        p.set_dtype(dtype).unwrap();
        assert_eq!(p.dtype(), Some(dtype));
    }
    p.set_dtype("bool").unwrap();
    assert_eq!(p.dtype(), Some(DType::Boolean));
    p.set_dtype("str").unwrap();
    assert_eq!(p.dtype(), Some(DType::String));
    p.set_dtype("2-tuple").unwrap();
    assert_eq!(p.dtype(), Some(DType::Tuple(2)));

    p.clear_dtype();
    assert_eq!(p.dtype(), None);

    for bad in ["crash and burn", "x-tuple"] {
        let err = p.set_dtype(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDType);
    }
    assert_eq!(p.dtype(), None);
}

#[test]
fn test_tuple_values() {
    let mut store = Store::new();
    let r = PropertyBuilder::new("Location")
        .dtype("2-tuple")
        .value("(39.12; 67.19)")
        .build(&mut store)
        .unwrap();
    let tuple = store.property(r).unwrap()[0].as_tuple().unwrap().to_vec();
    assert_eq!(tuple, vec!["39.12".to_string(), "67.19".to_string()]);

    let err = PropertyBuilder::new("Public-Key")
        .dtype("2-tuple")
        .value("(5689; 1254; 687)")
        .build(&mut store)
        .unwrap_err();
    assert_eq!(err, Error::TupleLength { expected: 2, found: 3 });
}

#[test]
fn test_ids() {
    let mut store = Store::new();
    let r = PropertyBuilder::new("P").id(KNOWN_ID).build(&mut store).unwrap();
    assert_eq!(store.property(r).unwrap().id_str(), KNOWN_ID);

    let r = PropertyBuilder::new("P2").id("id").build(&mut store).unwrap();
    let p = store.property_mut(r).unwrap();
    assert_ne!(p.id_str(), "id");

    let old = p.id();
    p.new_id(None).unwrap();
    assert_ne!(p.id(), old);

    p.new_id(Some(KNOWN_ID)).unwrap();
    assert_eq!(p.id_str(), KNOWN_ID);

    let err = p.new_id(Some("crash and burn")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentityMalformed);
    assert_eq!(p.id_str(), KNOWN_ID);
}
