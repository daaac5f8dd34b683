mod app;

use app::UiApp;
use eframe::NativeOptions;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let options = NativeOptions::default();
    if let Err(e) = eframe::run_native(
        "Verify - image prediction",
        options,
        Box::new(|_cc| {
            let app = UiApp::new()?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(app))
        }),
    ) {
        eprintln!("Application stopped with error: {e}");
    }
}
