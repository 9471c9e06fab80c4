use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;
use service::product::{NewProduct, Product, ProductChanges};
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;
use crate::validation::{
    is_boolean, is_int, is_numeric, is_positive, not_empty, text_form, to_bool, to_i32, to_number, FieldChain, Rule,
    RuleSet, Validated,
};

pub const PRODUCT_DELETED: &str = "Producto Eliminado";

/// Success envelope shared by every product endpoint.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

const ID_RULES: &[Rule] = &[Rule::new(is_int, "ID no valido")];

const NAME_RULES: &[Rule] = &[Rule::new(not_empty, "El nombre del Producto no puede ir vacio")];

const PRICE_RULES: &[Rule] = &[
    Rule::new(is_numeric, "Valor no valido"),
    Rule::new(not_empty, "El precio del Producto no puede ir vacio"),
    Rule::new(is_positive, "Precio no valido"),
];

const AVAILABILITY_RULES: &[Rule] = &[Rule::new(is_boolean, "Valor para disponibilidad no valido")];

fn param_id(params: &HashMap<String, String>) -> Option<i32> {
    params.get("id").and_then(|id| to_i32(Some(&Value::String(id.clone()))))
}

fn name_and_price(body: &Value) -> (String, f64) {
    (text_form(body.get("name")), to_number(body.get("price")))
}

/// `:id` must be an integer.
pub struct ById;

impl RuleSet for ById {
    type Input = i32;
    const CHAINS: &'static [FieldChain] = &[FieldChain::param("id", ID_RULES)];

    fn decode(params: &HashMap<String, String>, _body: &Value) -> Option<i32> {
        param_id(params)
    }
}

pub struct CreateProduct;

impl RuleSet for CreateProduct {
    type Input = NewProduct;
    const CHAINS: &'static [FieldChain] = &[FieldChain::body("name", NAME_RULES), FieldChain::body("price", PRICE_RULES)];

    fn decode(_params: &HashMap<String, String>, body: &Value) -> Option<NewProduct> {
        let (name, price) = name_and_price(body);
        Some(NewProduct { name, price })
    }
}

pub struct ReplaceProduct;

impl RuleSet for ReplaceProduct {
    type Input = (i32, ProductChanges);
    const CHAINS: &'static [FieldChain] = &[
        FieldChain::param("id", ID_RULES),
        FieldChain::body("name", NAME_RULES),
        FieldChain::body("price", PRICE_RULES),
        FieldChain::body("availability", AVAILABILITY_RULES),
    ];

    fn decode(params: &HashMap<String, String>, body: &Value) -> Option<(i32, ProductChanges)> {
        let id = param_id(params)?;
        let (name, price) = name_and_price(body);
        let availability = to_bool(body.get("availability"))?;
        Some((id, ProductChanges { name, price, availability }))
    }
}

#[utoipa::path(
    get, path = "/api/products", tag = "Products",
    responses(
        (status = 200, description = "Successful response", body = crate::openapi::ProductListDoc)
    )
)]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Data<Vec<Product>>>, ApiError> {
    let products = state.products.list().await?;
    info!(count = products.len(), "list products");
    Ok(Data::json(products))
}

#[utoipa::path(
    get, path = "/api/products/{id}", tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to retrieve")),
    responses(
        (status = 200, description = "Successful response", body = crate::openapi::ProductDataDoc),
        (status = 400, description = "Bad Request - Invalid ID"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Validated(id): Validated<ById>,
) -> Result<Json<Data<Product>>, ApiError> {
    let product = state.products.get(id).await?;
    Ok(Data::json(product))
}

#[utoipa::path(
    post, path = "/api/products", tag = "Products",
    request_body = crate::openapi::NewProductDoc,
    responses(
        (status = 201, description = "Product created successfully", body = crate::openapi::ProductDataDoc),
        (status = 400, description = "Bad Request - invalid input data")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Validated(input): Validated<CreateProduct>,
) -> Result<(StatusCode, Json<Data<Product>>), ApiError> {
    let product = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Data::json(product)))
}

#[utoipa::path(
    put, path = "/api/products/{id}", tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to update")),
    request_body = crate::openapi::ProductChangesDoc,
    responses(
        (status = 200, description = "Successful response", body = crate::openapi::ProductDataDoc),
        (status = 400, description = "Bad Request - Invalid ID or invalid input data"),
        (status = 404, description = "Product Not Found")
    )
)]
pub async fn replace_product(
    State(state): State<AppState>,
    Validated((id, changes)): Validated<ReplaceProduct>,
) -> Result<Json<Data<Product>>, ApiError> {
    let product = state.products.replace(id, changes).await?;
    Ok(Data::json(product))
}

#[utoipa::path(
    patch, path = "/api/products/{id}", tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to update")),
    responses(
        (status = 200, description = "Successful response", body = crate::openapi::ProductDataDoc),
        (status = 400, description = "Bad Request - Invalid ID"),
        (status = 404, description = "Product Not Found")
    )
)]
pub async fn toggle_availability(
    State(state): State<AppState>,
    Validated(id): Validated<ById>,
) -> Result<Json<Data<Product>>, ApiError> {
    let product = state.products.toggle_availability(id).await?;
    Ok(Data::json(product))
}

#[utoipa::path(
    delete, path = "/api/products/{id}", tag = "Products",
    params(("id" = i32, Path, description = "The ID of the product to delete")),
    responses(
        (status = 200, description = "Successful response", body = crate::openapi::DeletedDoc),
        (status = 400, description = "Bad Request - Invalid ID"),
        (status = 404, description = "Product Not Found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Validated(id): Validated<ById>,
) -> Result<Json<Data<&'static str>>, ApiError> {
    state.products.delete(id).await?;
    Ok(Data::json(PRODUCT_DELETED))
}
