use odata_core::json::JsonParseNode;
use odata_core::{
    AdditionalData, AdditionalDataHolder, DecodeError, EncodeError, Parsable, Record, Serializable,
    SerializationWriter, Value, cbor, json, model,
};
use serde_json::json;

#[model]
pub struct Base {
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    id: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
pub struct Shape {
    #[odata(base)]
    base: Base,
    name: Option<String>,
    tags: Option<Vec<String>>,
}

#[model]
#[odata(type_tag = "#test.circle")]
pub struct Circle {
    #[odata(base)]
    base: Shape,
    radius: Option<f64>,
}

#[model]
#[odata(type_tag = "#test.square")]
pub struct Square {
    #[odata(base)]
    base: Shape,
    side: Option<i32>,
    color: Option<Color>,
}

#[model]
pub enum Color {
    Red,
    DarkBlue,
    #[odata(rename = "UNKNOWN")]
    Unknown,
}

#[model]
pub enum Shapeable {
    #[odata(fallback)]
    Shape(Shape),
    Circle(Circle),
    Square(Square),
}

#[model]
pub struct Drawing {
    #[odata(base)]
    base: Base,
    shapes: Option<Vec<Shapeable>>,
    primary: Option<Shapeable>,
    #[odata(skip)]
    scratch: u32,
}

fn circle(id: &str, radius: f64) -> Circle {
    let mut circle = Circle::new();
    circle.set_id(Some(id.to_string()));
    circle.set_radius(Some(radius));
    circle
}

#[test]
fn new_sets_type_tag_through_base_chain() {
    assert_eq!(Circle::new().odata_type(), Some("#test.circle"));
    assert_eq!(Circle::ODATA_TYPE, Some("#test.circle"));
    assert_eq!(Shape::new().odata_type(), None);
    assert_eq!(Shape::ODATA_TYPE, None);
    assert!(Circle::new().additional_data().is_empty());
}

#[test]
fn decodes_declared_fields_and_captures_unknown_ones() {
    let shape: Shape = json::from_str(r#"{"id": "1", "name": "n", "extra": {"a": 1}}"#).unwrap();
    assert_eq!(shape.id(), Some("1"));
    assert_eq!(shape.name(), Some("n"));

    let mut expected = indexmap::IndexMap::new();
    expected.insert("a".to_string(), Value::Integer(1));
    assert_eq!(shape.additional_data().get("extra"), Some(&Value::Object(expected)));
}

#[test]
fn bag_round_trips() {
    let base: Base = json::from_str(r#"{"foo": "bar"}"#).unwrap();
    assert_eq!(base.additional_data().get("foo"), Some(&Value::from("bar")));

    let out = json::to_value(&base).unwrap();
    assert_eq!(out, json!({"@odata.type": null, "id": null, "foo": "bar"}));
}

#[test]
fn encodes_ancestor_fields_first() {
    let out = json::to_string(&circle("1", 2.5)).unwrap();
    assert_eq!(
        out,
        r##"{"@odata.type":"#test.circle","id":"1","name":null,"radius":2.5}"##
    );
}

#[test]
fn table_composition_matches_encode_order() {
    let names: Vec<_> = Circle::field_deserializers().names().collect();
    assert_eq!(names, ["@odata.type", "id", "name", "tags", "radius"]);

    let names: Vec<_> = Drawing::field_deserializers().names().collect();
    assert_eq!(names, ["@odata.type", "id", "shapes", "primary"]);
}

#[test]
fn absent_scalars_are_null_and_absent_collections_omitted() {
    let out = json::to_value(&Shape::new()).unwrap();
    assert_eq!(out, json!({"@odata.type": null, "id": null, "name": null}));

    let mut shape = Shape::new();
    shape.set_tags(Some(Vec::new()));
    let out = json::to_value(&shape).unwrap();
    assert_eq!(out, json!({"@odata.type": null, "id": null, "name": null, "tags": []}));
}

#[test]
fn set_none_equals_never_set() {
    let mut shape = Shape::new();
    shape.set_name(Some("temp".to_string()));
    shape.set_name(None);
    assert_eq!(json::to_value(&shape).unwrap(), json::to_value(&Shape::new()).unwrap());
    assert_eq!(shape, Shape::new());
}

#[test]
fn family_dispatches_on_tag() {
    let decoded: Shapeable =
        json::from_str(r##"{"@odata.type": "#test.square", "side": 3, "name": "s"}"##).unwrap();
    let Shapeable::Square(square) = &decoded else {
        panic!("expected a square, got {}", decoded.type_name());
    };
    assert_eq!(square.side(), Some(3));
    assert_eq!(square.name(), Some("s"));
    assert_eq!(square.odata_type(), Some("#test.square"));
    assert_eq!(decoded.type_name(), "Square");
}

#[test]
fn family_falls_back_to_base() {
    for payload in [
        json!({"name": "plain"}),
        json!({"@odata.type": 42, "name": "plain"}),
        json!({"@odata.type": null, "name": "plain"}),
        json!({"@odata.type": "#test.hexagon", "name": "plain"}),
    ] {
        let decoded: Shapeable = json::from_value(&payload).unwrap();
        let Shapeable::Shape(shape) = decoded else {
            panic!("expected the base type for {payload}");
        };
        assert_eq!(shape.name(), Some("plain"));
    }

    let decoded: Shapeable = json::from_str(r##"{"@odata.type": "#test.hexagon"}"##).unwrap();
    let Shapeable::Shape(shape) = decoded else {
        panic!("expected the base type");
    };
    assert_eq!(shape.odata_type(), Some("#test.hexagon"));
}

#[test]
fn families_nest_inside_collections_and_fields() {
    let payload = json!({
        "shapes": [
            {"@odata.type": "#test.circle", "radius": 1.0},
            null,
            {"@odata.type": "#test.square", "side": 2},
            {"name": "other"}
        ],
        "primary": {"@odata.type": "#test.circle", "radius": 4.5}
    });
    let drawing: Drawing = json::from_value(&payload).unwrap();

    let kinds: Vec<_> = drawing.shapes().unwrap().iter().map(|s| s.type_name()).collect();
    assert_eq!(kinds, ["Circle", "Square", "Shape"]);
    assert!(matches!(drawing.primary(), Some(Shapeable::Circle(c)) if c.radius() == Some(4.5)));
}

#[test]
fn null_nested_record_reads_as_absent() {
    let drawing: Drawing = json::from_str(r#"{"primary": null}"#).unwrap();
    assert!(drawing.primary().is_none());
    let out = json::to_value(&drawing).unwrap();
    assert_eq!(out["primary"], json!(null));
    assert!(out.get("shapes").is_none());
}

#[test]
fn skipped_fields_stay_off_the_wire() {
    let mut drawing = Drawing::new();
    drawing.scratch = 9;
    let out = json::to_value(&drawing).unwrap();
    assert!(out.get("scratch").is_none());

    let decoded: Drawing = json::from_str(r#"{"scratch": 3}"#).unwrap();
    assert_eq!(decoded.scratch, 0);
    assert_eq!(decoded.additional_data().get("scratch"), Some(&Value::Integer(3)));
}

#[test]
fn enums_use_wire_names_and_are_omitted_when_absent() {
    let mut square = Square::new();
    square.set_color(Some(Color::DarkBlue));
    let out = json::to_value(&square).unwrap();
    assert_eq!(out["color"], json!("darkBlue"));

    square.set_color(None);
    let out = json::to_value(&square).unwrap();
    assert!(out.get("color").is_none());
    assert_eq!(out["side"], json!(null));

    let decoded: Square = json::from_str(r#"{"color": "UNKNOWN"}"#).unwrap();
    assert_eq!(decoded.color(), Some(&Color::Unknown));
    assert_eq!(Color::Red.to_string(), "red");
}

#[test]
fn unknown_enum_value_is_an_error() {
    let err = json::from_str::<Square>(r#"{"color": "green"}"#).unwrap_err();
    assert_eq!(err.field_path().as_deref(), Some("color"));
    let DecodeError::Field { source, .. } = err else {
        panic!("expected field context");
    };
    assert!(matches!(*source, DecodeError::UnknownEnumValue { enum_name: "Color", .. }));
}

#[test]
fn decode_errors_carry_the_field_path() {
    let payload = json!({"shapes": [{"@odata.type": "#test.square", "side": "wide"}]});
    let err = json::from_value::<Drawing>(&payload).unwrap_err();
    assert_eq!(err.field_path().as_deref(), Some("shapes.0.side"));
}

#[test]
fn fields_assigned_before_an_error_remain_set() {
    let payload = json!({"name": "kept", "tags": 5, "id": "never"});
    let mut shape = Shape::new();
    let err = shape.deserialize_fields(&JsonParseNode::new(&payload)).unwrap_err();
    assert_eq!(err.field_path().as_deref(), Some("tags"));
    assert_eq!(shape.name(), Some("kept"));
    assert_eq!(shape.id(), None);
}

#[test]
fn top_level_null_and_malformed_input_are_errors() {
    assert!(matches!(
        json::from_str::<Shape>("null"),
        Err(DecodeError::TypeMismatch { expected: "object", .. })
    ));
    assert!(matches!(json::from_str::<Shape>("{"), Err(DecodeError::Syntax(_))));
    assert!(matches!(
        json::from_str::<Shape>("[]"),
        Err(DecodeError::TypeMismatch { expected: "object", found: "array" })
    ));
}

#[test]
fn round_trip_is_stable() {
    let payload = json!({
        "@odata.type": null,
        "id": "d1",
        "shapes": [
            {"@odata.type": "#test.circle", "id": "c", "name": null, "radius": 1.5},
            {
                "@odata.type": "#test.square",
                "id": "s",
                "name": "sq",
                "tags": ["a", "b"],
                "side": 2,
                "color": "red"
            }
        ],
        "primary": null,
        "note": {"nested": [1, 2.5, "x", true, null]}
    });
    let drawing: Drawing = json::from_value(&payload).unwrap();
    let first = json::to_value(&drawing).unwrap();
    assert_eq!(first, payload);

    let again: Drawing = json::from_value(&first).unwrap();
    assert_eq!(again, drawing);
    assert_eq!(json::to_value(&again).unwrap(), first);
}

#[test]
fn round_trips_through_cbor() {
    let mut square = Square::new();
    square.set_side(Some(7));
    square.set_tags(Some(vec!["x".to_string()]));
    square
        .additional_data_mut()
        .insert("blob".to_string(), Value::Bytes(vec![0, 1, 2]));

    let mut drawing = Drawing::new();
    drawing.set_shapes(Some(vec![circle("c", 0.25).into(), square.into()]));
    drawing.set_primary(Some(Shape::new().into()));

    let bytes = cbor::to_vec(&drawing).unwrap();
    let decoded: Drawing = cbor::from_slice(&bytes).unwrap();
    assert_eq!(decoded, drawing);

    let Some(Shapeable::Square(square)) = decoded.shapes().and_then(|s| s.get(1)) else {
        panic!("expected a square");
    };
    assert_eq!(square.additional_data().get("blob"), Some(&Value::Bytes(vec![0, 1, 2])));
}

/// Records each key written and fails when it reaches `fail_on`.
struct FailingWriter {
    written: Vec<String>,
    fail_on: &'static str,
}

impl FailingWriter {
    fn record(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        let key = key.unwrap_or("<element>").to_string();
        if key == self.fail_on {
            return Err(EncodeError::Unbalanced("injected failure"));
        }
        self.written.push(key);
        Ok(())
    }
}

impl SerializationWriter for FailingWriter {
    fn write_null_value(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.record(key)
    }

    fn write_string_value(&mut self, key: Option<&str>, _value: &str) -> Result<(), EncodeError> {
        self.record(key)
    }

    fn write_bool_value(&mut self, key: Option<&str>, _value: bool) -> Result<(), EncodeError> {
        self.record(key)
    }

    fn write_i64_value(&mut self, key: Option<&str>, _value: i64) -> Result<(), EncodeError> {
        self.record(key)
    }

    fn write_f64_value(&mut self, key: Option<&str>, _value: f64) -> Result<(), EncodeError> {
        self.record(key)
    }

    fn write_byte_array_value(
        &mut self,
        key: Option<&str>,
        _value: &[u8],
    ) -> Result<(), EncodeError> {
        self.record(key)
    }

    fn start_object(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.record(key)
    }

    fn end_object(&mut self) -> Result<(), EncodeError> {
        Ok(())
    }

    fn start_collection(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.record(key)
    }

    fn end_collection(&mut self) -> Result<(), EncodeError> {
        Ok(())
    }
}

#[test]
fn encode_stops_at_first_failing_write() {
    let mut record = circle("1", 3.0);
    record
        .additional_data_mut()
        .insert("extra".to_string(), Value::Bool(true));

    let mut writer = FailingWriter {
        written: Vec::new(),
        fail_on: "name",
    };
    let err = record.serialize(&mut writer).unwrap_err();
    assert!(matches!(err, EncodeError::Unbalanced("injected failure")));
    assert_eq!(writer.written, ["@odata.type", "id"]);
}

#[test]
fn encode_errors_propagate_from_nested_records() {
    let mut drawing = Drawing::new();
    drawing.set_primary(Some(circle("c", 1.0).into()));

    let mut writer = FailingWriter {
        written: Vec::new(),
        fail_on: "radius",
    };
    assert!(drawing.serialize(&mut writer).is_err());
    assert_eq!(writer.written, ["@odata.type", "id", "primary", "@odata.type", "id", "name"]);
}

#[test]
fn non_finite_floats_fail_the_encode() {
    let err = json::to_string(&circle("1", f64::INFINITY)).unwrap_err();
    assert!(matches!(err, EncodeError::NonFiniteFloat { key: Some(k) } if k == "radius"));
}
