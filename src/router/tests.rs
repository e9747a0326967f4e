use super::core::{ParamConstraint, PathParam};
use super::{parse_routes, RouteMeta, Router};
use http::Method;

#[test]
fn test_root_path() {
    let (re, params) = Router::path_to_regex("/").unwrap();
    assert!(re.is_match("/"));
    assert!(params.is_empty());
}

#[test]
fn test_parameterized_path() {
    let (re, params) = Router::path_to_regex("/items/{id}").unwrap();
    assert!(re.is_match("/items/123"));
    assert!(re.is_match("/items/abc"));
    assert!(!re.is_match("/items/1/2"));
    assert_eq!(
        params,
        vec![PathParam {
            name: "id".to_string(),
            constraint: ParamConstraint::Any
        }]
    );
}

#[test]
fn test_int_constraint() {
    let (re, params) = Router::path_to_regex("/products/{productId:int}").unwrap();
    assert!(re.is_match("/products/42"));
    assert!(re.is_match("/products/-1"));
    assert!(!re.is_match("/products/abc"));
    assert!(!re.is_match("/products/4a"));
    assert_eq!(params[0].name, "productId");
    assert_eq!(params[0].constraint, ParamConstraint::Int);
}

#[test]
fn test_int_constraint_rejects_out_of_range_values() {
    let router = Router::new(vec![RouteMeta::new(
        Method::GET,
        "/products/{productId:int}",
        "get_product",
    )])
    .unwrap();

    assert!(router.route(Method::GET, "/products/99999999999").is_none());
    assert!(router.route(Method::GET, "/products/2147483648").is_none());
    let max = router.route(Method::GET, "/products/2147483647").unwrap();
    assert_eq!(max.get_path_param("productId"), Some("2147483647"));
    assert!(router.route(Method::GET, "/products/-2147483648").is_some());
}

#[test]
fn test_out_of_range_falls_through_to_next_route() {
    let router = Router::new(vec![
        RouteMeta::new(Method::GET, "/items/{id:int}", "by_int"),
        RouteMeta::new(Method::GET, "/items/{slug}", "by_slug"),
    ])
    .unwrap();
    assert_eq!(router.route(Method::GET, "/items/12").unwrap().handler_name, "by_int");
    assert_eq!(
        router.route(Method::GET, "/items/12345678901234").unwrap().handler_name,
        "by_slug"
    );
}

#[test]
fn test_literal_segments_are_escaped() {
    let (re, _) = Router::path_to_regex("/v1.0/items").unwrap();
    assert!(re.is_match("/v1.0/items"));
    assert!(!re.is_match("/v1x0/items"));
}

#[test]
fn test_unknown_constraint_is_rejected() {
    assert!(Router::path_to_regex("/a/{b:uuid}").is_err());
    assert!(Router::path_to_regex("/a/{}").is_err());
}

#[test]
fn test_method_must_match() {
    let router = Router::new(vec![
        RouteMeta::new(Method::GET, "/products/{productId:int}", "get_product"),
        RouteMeta::new(Method::DELETE, "/products/{productId:int}", "delete_product"),
    ])
    .unwrap();

    let get = router.route(Method::GET, "/products/3").unwrap();
    assert_eq!(get.handler_name, "get_product");
    let del = router.route(Method::DELETE, "/products/3").unwrap();
    assert_eq!(del.handler_name, "delete_product");
    assert!(router.route(Method::POST, "/products/3").is_none());
}

#[test]
fn test_first_declared_route_wins() {
    let router = Router::new(vec![
        RouteMeta::new(Method::GET, "/items/special", "special"),
        RouteMeta::new(Method::GET, "/items/{id}", "by_id"),
    ])
    .unwrap();
    assert_eq!(router.route(Method::GET, "/items/special").unwrap().handler_name, "special");
    assert_eq!(router.route(Method::GET, "/items/7").unwrap().handler_name, "by_id");
}

#[test]
fn test_parse_routes_yaml_and_json() {
    let yaml = "routes:\n  - method: get\n    path: /orders\n    handler: list_orders\n";
    let routes = parse_routes(yaml).unwrap();
    assert_eq!(routes, vec![RouteMeta::new(Method::GET, "/orders", "list_orders")]);

    let json = r#"{"routes":[{"method":"POST","path":"/orders","handler":"order_product"}]}"#;
    let routes = parse_routes(json).unwrap();
    assert_eq!(routes[0].method, Method::POST);
    assert_eq!(routes[0].handler_name, "order_product");
}

#[test]
fn test_parse_routes_rejects_bad_entries() {
    assert!(parse_routes("routes:\n  - method: TRACE\n    path: /x\n    handler: h\n").is_err());
    assert!(parse_routes("routes:\n  - method: GET\n    path: x\n    handler: h\n").is_err());
    assert!(parse_routes("routes:\n  - method: GET\n    path: /x\n    handler: ' '\n").is_err());
    assert!(parse_routes("routes: [").is_err());
}
