use syster_integrity::model::{DefinitionKind, Model, UsageKind};
use syster_integrity::validate::{Category, Diagnostic, ValidationOptions, validate_model};
use syster_integrity::{Multiplicity, NewElement};

#[test]
fn serde_diagnostics_for_ui() {
    let mut model = Model::new();
    let loose = model.add(NewElement::usage(UsageKind::Part).with_name("loose"));
    model.add(NewElement::definition(DefinitionKind::Part));

    let report = validate_model(&model, ValidationOptions::collect_all()).unwrap();
    let diagnostics: Vec<Diagnostic> = report.diagnostics();
    let json = serde_json::to_value(&diagnostics).unwrap();

    assert_eq!(json[0]["category"], Category::UnresolvedDefinition.as_str());
    assert_eq!(json[0]["code"], Category::UnresolvedDefinition.code());
    assert_eq!(json[0]["elements"][0], serde_json::json!(loose.raw()));
    assert_eq!(json[1]["severity"], "Error");
}

#[test]
fn serde_element_round_trip() {
    let mut model = Model::new();
    let engine = model.add(NewElement::definition(DefinitionKind::Part).with_name("Engine"));
    let motor = model.add(
        NewElement::usage(UsageKind::Part)
            .with_name("motor")
            .typed_by(engine)
            .with_multiplicity(Multiplicity::ONE_OR_MORE),
    );

    let element = model.get(motor).unwrap();
    let text = serde_json::to_string(element).unwrap();
    let back: syster_integrity::Element = serde_json::from_str(&text).unwrap();
    assert_eq!(&back, element);
}

#[test]
fn serde_multiplicity_as_canonical_text() {
    let json = serde_json::to_value(Multiplicity::ONE_OR_MORE).unwrap();
    assert_eq!(json, serde_json::json!("1..*"));
    let back: Multiplicity = serde_json::from_value(json).unwrap();
    assert_eq!(back, Multiplicity::ONE_OR_MORE);
    assert!(serde_json::from_value::<Multiplicity>(serde_json::json!("0")).is_err());
}
