//! Handler tests for the catalog domain
//!
//! In-memory repository and image storage behind the real routers.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::Router;
use domain_catalog::*;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use test_utils::TestDatabase;
use tower::ServiceExt;

const BOUNDARY: &str = "shop-test-boundary";

async fn json_body(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Body {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn add_request(body: Body) -> Request<Body> {
    Request::post("/add")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .unwrap()
}

struct Fixture {
    repo: InMemoryCatalogRepository,
    storage: InMemoryImageStorage,
    products: Router,
}

async fn fixture() -> (Fixture, Category) {
    let repo = InMemoryCatalogRepository::new();
    let storage = InMemoryImageStorage::new();
    let category = repo.create_category("Electronics".into()).await.unwrap();

    let products = handlers::product_router(ProductService::new(repo.clone(), storage.clone()));
    (
        Fixture {
            repo,
            storage,
            products,
        },
        category,
    )
}

fn form_fields(category_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("title", "Headphones".to_string()),
        ("description", "Over-ear, wireless".to_string()),
        ("price", "2499.99".to_string()),
        ("categoryId", category_id.to_string()),
    ]
}

fn as_refs<'a>(fields: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

#[tokio::test]
async fn test_add_product_stores_image_and_row() {
    let (fx, category) = fixture().await;
    let fields = form_fields(&category.id.to_string());

    let response = fx
        .products
        .oneshot(add_request(multipart_body(
            &as_refs(&fields),
            Some(("phones.png", &b"\x89PNG"[..])),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["responseMessage"], "Product Added Successfully!");

    let products = fx.repo.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price, Decimal::new(249999, 2));
    assert!(fx.storage.contains(&products[0].image_name).await);
}

#[tokio::test]
async fn test_add_product_missing_image_is_missing_field() {
    let (fx, category) = fixture().await;
    let fields = form_fields(&category.id.to_string());

    let response = fx
        .products
        .oneshot(add_request(multipart_body(&as_refs(&fields), None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["responseMessage"], "bad request - missing field");
    assert!(fx.storage.is_empty().await);
}

#[tokio::test]
async fn test_add_product_unknown_category() {
    let (fx, _) = fixture().await;
    let fields = form_fields("77");

    let response = fx
        .products
        .oneshot(add_request(multipart_body(
            &as_refs(&fields),
            Some(("phones.png", &b"\x89PNG"[..])),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["responseMessage"], "please select correct product category");
    assert!(fx.storage.is_empty().await);
}

#[tokio::test]
async fn test_add_product_without_form_is_missing_request() {
    let (fx, _) = fixture().await;

    let response = fx
        .products
        .oneshot(
            Request::post("/add")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["responseMessage"], "bad request - missing request");
}

#[tokio::test]
async fn test_list_products_empty_is_soft_failure() {
    let (fx, _) = fixture().await;

    let response = fx
        .products
        .oneshot(Request::get("/all").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["responseMessage"], "Products not found!");
}

#[tokio::test]
async fn test_get_product_by_id_branches() {
    let (fx, category) = fixture().await;
    let product = fx
        .repo
        .create_product(NewProduct {
            title: "Lamp".into(),
            description: "Desk lamp".into(),
            price: Decimal::new(1500, 0),
            image_name: "lamp.png".into(),
            category_id: category.id,
        })
        .await
        .unwrap();

    let cases = [
        ("/id".to_string(), StatusCode::BAD_REQUEST, "Product ID is missing"),
        ("/id?productId=0".to_string(), StatusCode::BAD_REQUEST, "Product ID is missing"),
        ("/id?productId=999".to_string(), StatusCode::BAD_REQUEST, "Product not found"),
        (
            format!("/id?productId={}", product.id),
            StatusCode::OK,
            "Product fetched successfully!",
        ),
    ];

    for (uri, status, message) in cases {
        let response = fx
            .products
            .clone()
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), status, "{uri}");
        let body = json_body(response.into_body()).await;
        assert_eq!(body["responseMessage"], message, "{uri}");
    }
}

#[tokio::test]
async fn test_products_by_category_and_similar() {
    let (fx, category) = fixture().await;
    let empty = fx.repo.create_category("Books".into()).await.unwrap();
    fx.repo
        .create_product(NewProduct {
            title: "Speaker".into(),
            description: "Bluetooth".into(),
            price: Decimal::new(3999, 0),
            image_name: "speaker.png".into(),
            category_id: category.id,
        })
        .await
        .unwrap();

    for path in ["category", "similar"] {
        let response = fx
            .products
            .clone()
            .oneshot(
                Request::get(format!("/{path}?categoryId={}", category.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["products"][0]["title"], "Speaker");
    }

    let response = fx
        .products
        .clone()
        .oneshot(
            Request::get(format!("/category?categoryId={}", empty.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["responseMessage"], "Products not found!");

    let response = fx
        .products
        .clone()
        .oneshot(Request::get("/category?categoryId=404").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["responseMessage"], "Category not found!");

    let response = fx
        .products
        .oneshot(Request::get("/category").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["responseMessage"], "Category ID is missing");
}

#[tokio::test]
async fn test_delete_product_then_lookup_fails() {
    let (fx, category) = fixture().await;
    let fields = form_fields(&category.id.to_string());

    fx.products
        .clone()
        .oneshot(add_request(multipart_body(
            &as_refs(&fields),
            Some(("phones.png", &b"\x89PNG"[..])),
        )))
        .await
        .unwrap();
    let product = fx.repo.list_products().await.unwrap().remove(0);

    let response = fx
        .products
        .clone()
        .oneshot(
            Request::delete(format!("/delete/{}", product.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["responseMessage"], "Product deleted successfully!");
    assert!(!fx.storage.contains(&product.image_name).await);

    let response = fx
        .products
        .clone()
        .oneshot(
            Request::delete(format!("/delete/{}", product.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = fx
        .products
        .oneshot(
            Request::get(format!("/id?productId={}", product.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_image_bytes_and_missing() {
    let (fx, _) = fixture().await;
    let name = fx
        .storage
        .store(ImageUpload {
            file_name: Some("logo.png".into()),
            content_type: None,
            bytes: axum::body::Bytes::from_static(b"logo-bytes"),
        })
        .await
        .unwrap();

    let response = fx
        .products
        .clone()
        .oneshot(Request::get(format!("/{name}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"logo-bytes");

    let response = fx
        .products
        .oneshot(Request::get("/missing.png").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_category_add_and_list() {
    let repo = InMemoryCatalogRepository::new();
    let app = handlers::category_router(CategoryService::new(repo));

    let response = app
        .clone()
        .oneshot(Request::get("/all").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["responseMessage"], "Categories not found");

    let response = app
        .clone()
        .oneshot(
            Request::post("/add")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Garden"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["responseMessage"], "Category Added Successfully");

    let response = app
        .clone()
        .oneshot(
            Request::post("/add")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["responseMessage"], "bad request - missing field");

    let response = app
        .oneshot(Request::get("/all").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["categories"][0]["name"], "Garden");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_pg_catalog_repository() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());

    // seeded by migrations
    let categories = repo.list_categories().await.unwrap();
    assert!(categories.iter().any(|c| c.name == "Electronics"));

    let garden = repo.create_category("Garden".into()).await.unwrap();
    assert!(matches!(
        repo.create_category("Garden".into()).await,
        Err(ProductError::DuplicateCategory(_))
    ));

    let product = repo
        .create_product(NewProduct {
            title: "Hose".into(),
            description: "20m".into(),
            price: Decimal::new(124950, 2),
            image_name: "hose.png".into(),
            category_id: garden.id,
        })
        .await
        .unwrap();

    let fetched = repo.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(fetched.price, Decimal::new(124950, 2));
    assert_eq!(repo.list_by_category(garden.id).await.unwrap().len(), 1);

    assert!(repo.delete_product(product.id).await.unwrap());
    assert!(repo.get_product(product.id).await.unwrap().is_none());
}
