use std::sync::Arc;

use anyhow::Result;
use redline_workflow::ReviewBackend;

pub async fn handle(backend: Arc<dyn ReviewBackend>, show_legend: bool) -> Result<()> {
    redline_tui::run(backend, show_legend).await
}
