use std::collections::BTreeMap;

use care_core::{CareError, RouteTemplate};

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn renders_placeholders() {
    let route = RouteTemplate::parse("/api/v1/facility/{facility_id}/patient/{id}/")
        .expect("template hợp lệ");

    assert_eq!(route.placeholders(), vec!["facility_id", "id"]);
    assert_eq!(
        route
            .render(&params(&[("facility_id", "f-01"), ("id", "42")]))
            .expect("đủ tham số"),
        "/api/v1/facility/f-01/patient/42/"
    );
}

#[test]
fn encodes_values() {
    let route = RouteTemplate::parse("/api/v1/items/{name}/").expect("template hợp lệ");
    let rendered = route
        .render(&params(&[("name", "a b/c")]))
        .expect("đủ tham số");
    assert_eq!(rendered, "/api/v1/items/a%20b%2Fc/");
}

#[test]
fn repeated_placeholder_listed_once() {
    let route = RouteTemplate::parse("/{id}/copy/{id}").expect("template hợp lệ");
    assert_eq!(route.placeholders(), vec!["id"]);
    assert_eq!(
        route.render(&params(&[("id", "7")])).expect("đủ tham số"),
        "/7/copy/7"
    );
}

#[test]
fn appends_query_in_order() {
    let route = RouteTemplate::parse("/api/v1/encounter/").expect("template hợp lệ");
    let query = vec![
        ("limit".to_string(), "15".to_string()),
        ("search".to_string(), "nguyễn an".to_string()),
    ];

    assert_eq!(
        route
            .render_with_query(&BTreeMap::new(), &query)
            .expect("không cần tham số"),
        "/api/v1/encounter/?limit=15&search=nguy%E1%BB%85n%20an"
    );
    assert_eq!(
        route.render_with_query(&BTreeMap::new(), &[]).expect("không cần tham số"),
        "/api/v1/encounter/"
    );
}

#[test]
fn reports_template_errors() {
    assert_eq!(
        RouteTemplate::parse("/api/{id").unwrap_err(),
        CareError::UnclosedPlaceholder(5)
    );
    assert_eq!(
        RouteTemplate::parse("/api/id}").unwrap_err(),
        CareError::UnexpectedBrace(7)
    );
    assert_eq!(
        RouteTemplate::parse("/api/{}").unwrap_err(),
        CareError::InvalidPlaceholder(String::new())
    );
    assert_eq!(
        RouteTemplate::parse("/api/{patient-id}").unwrap_err(),
        CareError::InvalidPlaceholder("patient-id".to_string())
    );
}

#[test]
fn missing_param_is_an_error() {
    let route = RouteTemplate::parse("/api/v1/patient/{id}/").expect("template hợp lệ");
    assert_eq!(
        route.render(&BTreeMap::new()).unwrap_err(),
        CareError::MissingParam("id".to_string())
    );
}
