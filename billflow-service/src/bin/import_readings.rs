use anyhow::{bail, Result};
use billflow_service::{
    config::AppConfig,
    import, observability,
    store::{JsonFileStore, StoreError},
};
use std::{env, fs::File};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: import_readings <csv_file_path>");
    }
    let file_path = &args[1];

    // Same config as the server, so rows land in its data file.
    let cfg = AppConfig::load()?;
    let store = JsonFileStore::new(cfg.store.data_path.clone());

    let file = File::open(file_path).map_err(|e| anyhow::anyhow!("failed to open {file_path}: {e}"))?;
    let parsed = import::parse_readings_csv(file, cfg.utc_offset()?)?;

    for (line, reason) in &parsed.rejected {
        tracing::warn!(line, reason = %reason, "skipping row");
    }

    let imported = parsed.rows.len();
    let rejected = parsed.rejected.len();
    store
        .update(|ds| {
            ds.record_all(parsed.rows);
            Ok::<_, StoreError>(())
        })
        .await?;

    tracing::info!(imported, rejected, path = %store.path().display(), "readings imported");

    Ok(())
}
