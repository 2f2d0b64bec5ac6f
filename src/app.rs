// src/app.rs
use chrono::Utc;

use crate::auth::{AuthConfig, AuthService};
use crate::config::Config;
use crate::db::Database;
use crate::uploads::UploadStore;

/// Everything a request handler needs. Built once in `main` and shared
/// read-only by every worker.
pub struct App {
    pub config: Config,
    pub db: Database,
    pub auth: AuthService,
    pub uploads: UploadStore,
}

impl App {
    pub fn new(config: Config) -> Self {
        let db = Database::new(config.database_path.clone());
        let auth = AuthService::new(AuthConfig {
            session_ttl_secs: config.session_ttl_secs,
            password_rounds: config.password_rounds,
        });
        let uploads = UploadStore::new(
            config.photos_dir(),
            config.videos_dir(),
            config.max_upload_bytes,
        );
        Self {
            config,
            db,
            auth,
            uploads,
        }
    }

    pub fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}
