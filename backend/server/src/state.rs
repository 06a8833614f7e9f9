use std::sync::Arc;

use super::{
    config::Config, database::SubmissionStore, storage::PdfStore, supabase::Supabase,
};

pub struct AppState {
    pub submissions: Arc<dyn SubmissionStore>,
    pub reports: Arc<dyn PdfStore>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Arc<Self>, reqwest::Error> {
        let supabase = Arc::new(Supabase::new(&config.supabase_url, &config.service_key)?);

        Ok(Self::with_stores(supabase.clone(), supabase))
    }

    pub fn with_stores(
        submissions: Arc<dyn SubmissionStore>,
        reports: Arc<dyn PdfStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            submissions,
            reports,
        })
    }
}
