//! Temporary on-disk pantry for integration tests.

use std::sync::Arc;

use chrono::NaiveDate;
use pantry::domain::ItemKey;
use pantry::infrastructure::bootstrap::{open_database, Services};
use pantry::infrastructure::config::Config;
use pantry::port::outbound::predictor::DemandPredictor;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Services wired to a fresh database file that is removed on drop.
pub struct TempPantry {
    _dir: TempDir,
    pub services: Services,
}

impl TempPantry {
    pub fn create() -> Self {
        Self::with_predictor(None)
    }

    pub fn with_predictor(predictor: Option<Arc<dyn DemandPredictor>>) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("pantry.db");
        let pool = open_database(path.to_str().expect("utf-8 temp path")).expect("open database");
        let services = Services::with_collaborators(&Config::default(), pool, None, predictor);
        Self {
            _dir: dir,
            services,
        }
    }

    /// Current quantity of the named item.
    pub fn quantity(&self, name: &str) -> Decimal {
        self.services
            .inventory
            .get_item(&ItemKey::from(name))
            .expect("item exists")
            .current_quantity
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
