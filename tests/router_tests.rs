use http::Method;
use httpmediator::router::{load_routes, Router};
use std::io::Write;

#[test]
fn test_load_routes_from_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "routes:\n  - method: get\n    path: /widgets/{{id:int}}\n    handler: get_widget\n  - method: POST\n    path: /widgets\n    handler: create_widget"
    )
    .unwrap();

    let routes = load_routes(file.path()).unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].method, Method::GET);
    assert_eq!(routes[0].path_pattern, "/widgets/{id:int}");

    let router = Router::new(routes).unwrap();
    let m = router.route(Method::GET, "/widgets/12").unwrap();
    assert_eq!(m.handler_name, "get_widget");
    assert_eq!(m.get_path_param("id"), Some("12"));
    assert!(router.route(Method::GET, "/widgets/twelve").is_none());
    assert!(router.route(Method::POST, "/widgets").is_some());
}

#[test]
fn test_load_routes_from_json_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"routes":[{{"method":"DELETE","path":"/widgets/{{id}}","handler":"delete_widget"}}]}}"#
    )
    .unwrap();

    let routes = load_routes(file.path()).unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].method, Method::DELETE);
    assert_eq!(routes[0].handler_name, "delete_widget");
}

#[test]
fn test_load_routes_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_routes(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn test_product_store_routes() {
    let routes = product_store::routes().unwrap();
    let router = Router::new(routes).unwrap();
    assert_eq!(router.len(), 3);

    let m = router.route(Method::GET, "/products/1").unwrap();
    assert_eq!(m.handler_name, "get_product");
    assert_eq!(m.get_path_param("productId"), Some("1"));

    let m = router.route(Method::DELETE, "/products/-4").unwrap();
    assert_eq!(m.handler_name, "delete_product");
    assert_eq!(m.get_path_param("productId"), Some("-4"));

    assert_eq!(
        router.route(Method::POST, "/orders").unwrap().handler_name,
        "order_product"
    );
    assert!(router.route(Method::GET, "/orders").is_none());
    assert!(router.route(Method::GET, "/products").is_none());
}
