use anyhow::Result;

use super::plan::render;
use super::plan::write_output;
use crate::api::Catalog;
use crate::config::CatalogArgs;

/// Print the choices a deployment request may name.
pub fn run_catalog(args: &CatalogArgs) -> Result<()> {
    write_output(args.output.as_deref(), &render(&Catalog::new(), args.format)?)
}
