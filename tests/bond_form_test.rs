use concerto_form::config::{CustomClasses, FormOptions};
use concerto_form::render::tree::Component;
use concerto_form::render::{FormCallbacks, FormEvent};
use concerto_form::{FormError, FormGenerator};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const BOND_MODEL: &str = include_str!("fixtures/bond.json");
const BOND: &str = "org.acme.finance.Bond";

#[derive(Debug, Default)]
struct Calls {
    changes: Vec<(String, Value)>,
    added: Vec<(String, Value)>,
    removed: Vec<(String, usize)>,
}

fn generator_with(options: FormOptions) -> (FormGenerator, Arc<Mutex<Calls>>) {
    let calls = Arc::new(Mutex::new(Calls::default()));
    let (on_change, on_add, on_remove) = (calls.clone(), calls.clone(), calls.clone());
    let callbacks = FormCallbacks::new()
        .on_change(move |event, path| {
            on_change.lock().unwrap().changes.push((path.to_string(), event.value.clone()));
        })
        .add_element(move |_, path, default_value| {
            on_add.lock().unwrap().added.push((path.to_string(), default_value.clone()));
        })
        .remove_element(move |_, path, index| {
            on_remove.lock().unwrap().removed.push((path.to_string(), index));
        });

    let mut generator = FormGenerator::new(options).with_callbacks(callbacks);
    generator.load_from_text(BOND_MODEL).unwrap();
    (generator, calls)
}

fn generator() -> (FormGenerator, Arc<Mutex<Calls>>) {
    generator_with(FormOptions::default())
}

fn bond_instance() -> Value {
    json!({
        "$class": BOND,
        "instrumentId": [],
        "boolean": true,
        "maturity": "2030-06-30T12:00:00.000Z",
        "parValue": 100.0,
        "couponType": "FLOATING",
        "paymentFrequency": { "periodMultiplier": 6 },
        "issuer": "resource:org.acme.base.Organization#ACME"
    })
}

fn tree(generator: &FormGenerator, json: &Value) -> Component {
    generator.generate_tree(BOND, json).unwrap().unwrap()
}

#[test]
fn test_bond_end_to_end() {
    let (generator, _) = generator();
    let form = tree(&generator, &bond_instance());
    assert_eq!(form.tag, "form");
    assert_eq!(form.attr_value("data-type"), Some(BOND));

    let boolean = form.find_control("boolean", "change").unwrap();
    assert_eq!(boolean.attr_value("type"), Some("checkbox"));
    assert_eq!(boolean.attr_value("checked"), Some("true"));

    let maturity = form.find_control("maturity", "change").unwrap();
    assert_eq!(maturity.attr_value("type"), Some("datetime-local"));
    let local = maturity.attr_value("value").unwrap();
    assert_eq!(local.len(), "2030-06-30T12:00:00".len());
    assert!(local.starts_with("2030-06-30T") || local.starts_with("2030-07-01T"));

    let par_value = form.find_control("parValue", "change").unwrap();
    assert_eq!(par_value.attr_value("type"), Some("number"));
    assert_eq!(par_value.attr_value("value"), Some("100.0"));

    let add = form.find_control("instrumentId", "add").unwrap();
    assert_eq!(add.tag, "button");

    let issuer = form.find_control("issuer", "change").unwrap();
    assert_eq!(issuer.attr_value("type"), Some("text"));
    assert_eq!(issuer.attr_value("value"), Some("resource:org.acme.base.Organization#ACME"));

    let coupon = form.find_control("couponType", "change").unwrap();
    assert_eq!(coupon.tag, "select");
    let selected: Vec<_> = coupon
        .find_all(|c| c.tag == "option" && c.attr_value("selected").is_some())
        .into_iter()
        .map(|c| c.attr_value("value").unwrap())
        .collect();
    assert_eq!(selected, vec!["FLOATING"]);

    assert!(form.find_control("paymentFrequency.periodMultiplier", "change").is_some());
}

#[test]
fn test_add_element_defaults() {
    let (generator, calls) = generator();
    let form = tree(&generator, &bond_instance());

    assert!(form.find_control("instrumentId", "add").unwrap().fire(&FormEvent::default()));
    assert!(form.find_control("schedule", "add").unwrap().fire(&FormEvent::default()));

    let calls = calls.lock().unwrap();
    assert_eq!(calls.added[0], ("instrumentId".to_string(), json!("")));

    let (path, schedule_default) = &calls.added[1];
    assert_eq!(path, "schedule");
    assert_eq!(schedule_default["$class"], json!("org.acme.finance.PaymentFrequency"));
    assert!(schedule_default["periodMultiplier"].is_i64());
}

#[test]
fn test_array_elements_change_and_remove() {
    let (generator, calls) = generator();
    let mut json = bond_instance();
    json["instrumentId"] = json!(["XS0001", "XS0002"]);
    let form = tree(&generator, &json);

    let second = form.find_control("instrumentId[1]", "change").unwrap();
    assert_eq!(second.attr_value("value"), Some("XS0002"));
    second.fire(&FormEvent::new(json!("XS0003")));

    let removes = form.find_all(|c| c.attr_value("data-action") == Some("remove"));
    assert_eq!(removes.len(), 2);
    removes[1].fire(&FormEvent::default());

    let calls = calls.lock().unwrap();
    assert_eq!(calls.changes, vec![("instrumentId[1]".to_string(), json!("XS0003"))]);
    assert_eq!(calls.removed, vec![("instrumentId".to_string(), 1)]);
}

#[test]
fn test_rendering_is_idempotent() {
    let (generator, _) = generator();
    let json = bond_instance();
    let first = serde_json::to_value(tree(&generator, &json)).unwrap();
    let second = serde_json::to_value(tree(&generator, &json)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_html_uses_custom_classes() {
    let options = FormOptions {
        custom_classes: CustomClasses {
            field: "form-group".to_string(),
            input: "form-control".to_string(),
            ..CustomClasses::default()
        },
        wrap_html_form: true,
        ..FormOptions::default()
    };
    let (generator, _) = generator_with(options);
    let html = generator.generate_html(BOND, &bond_instance()).unwrap();

    assert!(html.starts_with("<form"));
    assert!(html.contains(r#"class="form-control""#));
    assert!(html.contains(r#"class="form-group required""#));
    // optional fields do not get the required modifier
    assert!(html.contains(r#"<div class="form-group"><label class="ui label">Description</label>"#));
    assert!(html.contains(
        r#"data-path="instrumentId" data-jsonpath="$.instrumentId" data-action="add" data-default="&quot;&quot;""#
    ));
    // the nested payment frequency sits in a fieldset
    assert!(html.contains(r#"<fieldset data-type="org.acme.finance.PaymentFrequency">"#));
}

#[test]
fn test_html_escapes_instance_values() {
    let (generator, _) = generator();
    let mut json = bond_instance();
    json["description"] = json!("<b>junk</b> & \"bonds\"");
    let html = generator.generate_html(BOND, &json).unwrap();
    assert!(html.contains("&lt;b&gt;junk&lt;"));
    assert!(html.contains("&amp; &quot;bonds&quot;"));
    assert!(!html.contains("<b>"));
}

#[test]
fn test_nested_resource_renders_inside_asset() {
    let (generator, _) = generator();
    let json = json!({ "ISINCode": "US0001", "bond": bond_instance() });
    let form = generator
        .generate_tree("org.acme.finance.BondAsset", &json)
        .unwrap()
        .unwrap();
    assert_eq!(
        form.find_control("bond.boolean", "change").unwrap().attr_value("checked"),
        Some("true")
    );
    assert!(form.find_control("bond.instrumentId", "add").is_some());
}

#[test]
fn test_empty_sample_instance_renders() {
    let (generator, _) = generator();
    let json = generator
        .sample_instance(BOND, concerto_form::factory::GenerateMode::Empty)
        .unwrap();
    let form = tree(&generator, &json);
    assert_eq!(
        form.find_control("parValue", "change").unwrap().attr_value("value"),
        Some("0.0")
    );
}

#[test]
fn test_mismatched_instance_aborts_render() {
    let (generator, _) = generator();
    let mut json = bond_instance();
    json["paymentFrequency"] = json!("monthly");
    let err = generator.generate_html(BOND, &json).unwrap_err();
    assert!(err.is_render_error());
    assert!(matches!(err, FormError::Addressing { path } if path == "paymentFrequency.periodMultiplier"));
}

#[test]
fn test_abstract_without_concrete_subtype_fails() {
    let mut generator = FormGenerator::new(FormOptions::default());
    generator
        .load_from_text(
            r#"{ "namespace": "org.acme.shapes", "declarations": [
                { "kind": "concept", "name": "Shape", "abstract": true },
                { "kind": "concept", "name": "Drawing", "properties": [
                    { "kind": "field", "name": "shape", "type": "Shape" } ] } ] }"#,
        )
        .unwrap();
    let err = generator
        .generate_html("org.acme.shapes.Drawing", &json!({ "shape": {} }))
        .unwrap_err();
    assert!(matches!(err, FormError::NoConcreteType { type_name } if type_name == "org.acme.shapes.Shape"));
}
