//! Print the OpenAPI document as JSON.

use color_eyre::eyre::{Context, Result};
use devevent::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialize OpenAPI document")?;
    println!("{json}");
    Ok(())
}
