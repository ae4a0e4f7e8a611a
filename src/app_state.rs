use std::sync::Arc;

use crate::config::Config;
use crate::database::PostgreDatabase;
use crate::resolver::IcoResolver;

pub struct AppState {
    pub db: Arc<PostgreDatabase>,
    pub config: Config,
    pub resolver: IcoResolver,
}
