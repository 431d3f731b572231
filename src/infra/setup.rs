use crate::{
    adapters::http::app_state::AppState,
    infra::{config::AppConfig, store::build_store},
    use_cases::waitlist::WaitlistUseCases,
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Opens the configured store and wires the use cases. Install tracing first:
/// store setup logs migrations and skipped legacy items.
pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let store = build_store(&config).await?;

    let waitlist_use_cases = WaitlistUseCases::new(
        store,
        config.ref_code_style,
        config.ref_code_max_attempts,
    );

    Ok(AppState {
        config: Arc::new(config),
        waitlist_use_cases: Arc::new(waitlist_use_cases),
    })
}

pub fn init_tracing(log_file: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "waitlist_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs)
    let file = (!log_file.is_empty())
        .then(|| File::create(log_file))
        .transpose()
        .unwrap_or_else(|e| {
            eprintln!("cannot create log file {log_file}: {e}");
            None
        });
    let json_layer = file.map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    use tracing::instrument::WithSubscriber;

    use crate::{adapters::persistence::StoreBackend, test_utils::test_config};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_store_setup_logs_reach_installed_subscriber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waitlist.json");
        std::fs::write(&path, r#"["a@example.com", "junk"]"#).unwrap();

        let mut config = test_config();
        config.store_backend = StoreBackend::File;
        config.waitlist_file = path.to_string_lossy().into_owned();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = fmt::Subscriber::builder()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let app_state = init_app_state(config)
            .with_subscriber(subscriber)
            .await
            .unwrap();

        assert_eq!(app_state.waitlist_use_cases.total_count().await.unwrap(), 1);
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Migrated legacy waitlist file"));
        assert!(output.contains("Skipping invalid or repeated legacy waitlist email"));
    }
}
