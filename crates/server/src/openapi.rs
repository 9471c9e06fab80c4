use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ApiMessageDoc { pub msg: String }

#[derive(ToSchema)]
pub struct ProductDoc {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Monitor Curvo de 49 Pulgadas")]
    pub name: String,
    #[schema(example = 300)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
    #[schema(rename = "createdAt")]
    pub created_at: String,
    #[schema(rename = "updatedAt")]
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct ProductDataDoc { pub data: ProductDoc }

#[derive(ToSchema)]
pub struct ProductListDoc { pub data: Vec<ProductDoc> }

#[derive(ToSchema)]
pub struct NewProductDoc {
    #[schema(example = "Monitor Curvo de 49 Pulgadas")]
    pub name: String,
    #[schema(example = 399)]
    pub price: f64,
}

#[derive(ToSchema)]
pub struct ProductChangesDoc {
    #[schema(example = "Monitor Curvo de 49 Pulgadas")]
    pub name: String,
    #[schema(example = 399)]
    pub price: f64,
    #[schema(example = true)]
    pub availability: bool,
}

#[derive(ToSchema)]
pub struct DeletedDoc {
    #[schema(example = "Producto Eliminado")]
    pub data: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "AdminProductAPI", version = "1.0.0", description = "API Docs for Products"),
    paths(
        crate::routes::health,
        crate::routes::api_root,
        crate::routes::products::list_products,
        crate::routes::products::get_product,
        crate::routes::products::create_product,
        crate::routes::products::replace_product,
        crate::routes::products::toggle_availability,
        crate::routes::products::delete_product,
    ),
    components(
        schemas(
            HealthResponse,
            ApiMessageDoc,
            ProductDoc,
            ProductDataDoc,
            ProductListDoc,
            NewProductDoc,
            ProductChangesDoc,
            DeletedDoc,
        )
    ),
    tags(
        (name = "Products", description = "API operations related to products"),
        (name = "health")
    )
)]
pub struct ApiDoc;
