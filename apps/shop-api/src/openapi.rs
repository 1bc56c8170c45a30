use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse, axum_helpers::CommonApiResponse)),
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Products, carts, orders and delivery assignment for the online shop"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/product", api = domain_catalog::handlers::ProductApiDoc),
        (path = "/category", api = domain_catalog::handlers::CategoryApiDoc),
        (path = "/cart", api = domain_orders::handlers::CartApiDoc),
        (path = "/order", api = domain_orders::handlers::OrderApiDoc),
        (path = "/user", api = domain_users::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/product/add",
            "/product/{image_name}",
            "/category/all",
            "/cart/fetch",
            "/order/place",
            "/order/delivery-status",
            "/user/delivery-persons",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
