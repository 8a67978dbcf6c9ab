use std::sync::Arc;

use crate::config::AppConfig;
use crate::shared::utils::DbPool;
use crate::views::ViewInvalidator;

pub struct AppState {
    pub conn: DbPool,
    pub config: AppConfig,
    pub views: Arc<dyn ViewInvalidator>,
}
