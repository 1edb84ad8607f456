//! Streaming CSV export.

use async_stream::try_stream;
use bytes::Bytes;
use futures::Stream;
use std::sync::Arc;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::repository::ProductRepository;

pub const CSV_HEADER: [&str; 7] = [
    "id",
    "name",
    "sku",
    "quantity",
    "location",
    "status",
    "barcode-reference",
];

pub const DEFAULT_PAGE_SIZE: u64 = 500;

/// Lazily stream every product as CSV, one chunk per repository page.
///
/// The first chunk starts with the header row. Each call starts a fresh
/// pass from the first product.
pub fn csv_stream<R>(
    repository: Arc<R>,
    page_size: u64,
) -> impl Stream<Item = ProductResult<Bytes>> + Send + 'static
where
    R: ProductRepository + ?Sized + 'static,
{
    let page_size = page_size.max(1);

    try_stream! {
        let mut offset = 0u64;
        let mut header = true;

        loop {
            let page = repository.list_page(offset, page_size).await?;
            let fetched = page.len() as u64;

            if fetched > 0 || header {
                yield encode_page(header, &page)?;
                header = false;
            }

            offset += fetched;
            if fetched < page_size {
                break;
            }
        }

        tracing::debug!(rows = offset, "CSV export finished");
    }
}

fn encode_page(with_header: bool, products: &[Product]) -> ProductResult<Bytes> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if with_header {
        writer.write_record(CSV_HEADER).map_err(export_error)?;
    }

    for product in products {
        let quantity = product.quantity.to_string();
        let status = product.status.to_string();
        let id = product.id.to_string();
        writer
            .write_record([
                id.as_str(),
                product.name.as_str(),
                product.sku.as_str(),
                quantity.as_str(),
                product.location.as_str(),
                status.as_str(),
                product.barcode_path.as_str(),
            ])
            .map_err(export_error)?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| ProductError::Export(e.to_string()))?;
    Ok(Bytes::from(buffer))
}

fn export_error(err: csv::Error) -> ProductError {
    ProductError::Export(err.to_string())
}
