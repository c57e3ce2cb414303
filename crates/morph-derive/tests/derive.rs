//! Integration tests exercising the generated `Bind` impls through the
//! morph public API.

use morph::{Adapter, Bind, Mapper, Request, Response, TagGroup};
use serde::Deserialize;

#[derive(Bind, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct OrderPizza {
    #[bind(form = "size", query = "size", path = "Size")]
    size: String,
    #[bind(form = "toppings", query = "toppings")]
    toppings: Vec<String>,
}

#[derive(Bind, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Untagged {
    message: String,
}

#[test]
fn generated_key_tables() {
    assert_eq!(
        <OrderPizza as morph::fields::Bind>::keys(TagGroup::Form),
        &["size", "toppings"]
    );
    assert_eq!(
        <OrderPizza as morph::fields::Bind>::keys(TagGroup::Query),
        &["size", "toppings"]
    );
    assert_eq!(
        <OrderPizza as morph::fields::Bind>::keys(TagGroup::Path),
        &["Size"]
    );
}

#[test]
fn untagged_struct_exposes_no_keys() {
    assert!(<Untagged as morph::fields::Bind>::keys(TagGroup::Form).is_empty());
    assert!(<Untagged as morph::fields::Bind>::keys(TagGroup::Path).is_empty());
    assert!(<Untagged as morph::fields::Bind>::keys(TagGroup::Query).is_empty());
}

#[test]
fn generated_setter_writes_tagged_fields() {
    let mut order = OrderPizza::default();
    let mut binder = Mapper::form().bind(&mut order);
    binder.set("size", &["Large"]);
    binder.set("toppings", &["Pepperoni", "Olives"]);
    binder.set("unknown", &["ignored"]);

    assert_eq!(order.size, "Large");
    assert_eq!(order.toppings, vec!["Pepperoni", "Olives"]);
}

#[test]
fn setter_respects_tag_groups() {
    let mut order = OrderPizza::default();
    // "toppings" is not a path key, so the path mapper must not write it.
    let mut binder = Mapper::path().bind(&mut order);
    binder.set("toppings", &["Pepperoni"]);
    binder.set("Size", &["Large"]);

    assert!(order.toppings.is_empty());
    assert_eq!(order.size, "Large");
}

#[test]
fn derived_struct_works_as_handler_argument() {
    fn show(order: OrderPizza) -> String {
        format!("{order:?}")
    }

    let adapter = Adapter::new();
    let route = adapter.handler(show);

    let req = Request::builder()
        .method(http::Method::POST)
        .uri("/order-pizza")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("size=Large&toppings=Pepperoni&toppings=Olives")
        .build();
    let mut res = Response::new();
    route.serve(&req, &mut res);

    assert_eq!(res.status(), http::StatusCode::OK);
    assert!(res.text().contains("Large"));
    assert!(res.text().contains("Pepperoni"));
}

#[test]
fn untagged_struct_still_binds_json() {
    fn echo(body: Untagged) -> String {
        body.message
    }

    let adapter = Adapter::new();
    let route = adapter.handler(echo);
    let plan = route.plan().expect("planned route");
    assert_eq!(plan.json_targets(), vec![0]);
    assert!(plan.form_targets().is_empty());

    let req = Request::builder()
        .method(http::Method::POST)
        .uri("/echo")
        .header("content-type", "application/json")
        .body(r#"{"message":"poly echo"}"#)
        .build();
    let mut res = Response::new();
    route.serve(&req, &mut res);
    assert_eq!(res.text(), "poly echo");
}
