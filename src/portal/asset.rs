use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::payload;
use crate::store::Store;
use crate::types::{Document, DocumentKind};

/// A stored document turned back into its original bytes.
#[derive(Debug, Clone)]
pub struct Asset {
    pub document: Document,
    pub bytes: Vec<u8>,
}

/// Loads a document and decodes its payload, undoing compression and
/// verifying the checksum.
pub fn load_asset(store: &dyn Store, kind: DocumentKind, id: i64) -> Result<Asset> {
    let document = store.get_document(kind, id)?.ok_or(Error::NotFound)?;
    let bytes = payload::restore(&document.payload, document.compressed, &document.checksum)?;
    Ok(Asset { document, bytes })
}

/// Records a served download. Failures are logged and ignored.
pub fn record_download(store: &dyn Store, kind: DocumentKind, id: i64, at: DateTime<Utc>) {
    if let Err(e) = store.record_download(kind, id, at) {
        tracing::warn!(kind = %kind, id, "Failed to record download: {e}");
    }
}
