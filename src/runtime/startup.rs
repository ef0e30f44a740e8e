use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::error;

use crate::catalog::{self, Catalog, CatalogError, CatalogSource, LoadReport};
use crate::config;
use crate::favorites::{FAVORITES_FILENAME, Favorites};

/// Catalog used when neither the command line nor the config names one.
pub const DEFAULT_CATALOG: &str = "music.json";

pub type CatalogResult = Result<(Catalog, LoadReport), CatalogError>;

/// The first CLI argument wins over `catalog.source`.
pub fn catalog_source(arg: Option<String>, settings: &config::Settings) -> CatalogSource {
    let raw = arg
        .or_else(|| settings.catalog.source.clone())
        .unwrap_or_else(|| DEFAULT_CATALOG.to_string());
    CatalogSource::parse(&raw)
}

/// Load the catalog off the UI thread. The receiver yields exactly one result.
pub fn spawn_catalog_load(source: CatalogSource) -> Receiver<CatalogResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = catalog::load(&source);
        if let Err(ref e) = result {
            error!(%source, error = %e, "catalog load failed");
        }
        let _ = tx.send(result);
    });
    rx
}

pub fn open_favorites(settings: &config::Settings) -> Favorites {
    if settings.storage.favorites {
        Favorites::load(settings.data_dir().join(FAVORITES_FILENAME))
    } else {
        Favorites::in_memory()
    }
}
