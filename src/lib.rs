pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod filter;
pub mod models;
pub mod notify;
pub mod session;
pub mod stats;
pub mod store;
pub mod totals;

#[cfg(feature = "desktop")]
mod commands;


use tracing_subscriber::EnvFilter;

pub use config::AppConfig;
pub use db::Database;
pub use error::{AppError, Result};
pub use session::Session;
pub use store::Store;

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    // A second call (tests, re-entry) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::{clients, dashboard, invoices, session, settings, AppState};
    use tauri::{
        menu::{Menu, MenuItem},
        tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
        Manager,
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let config = AppConfig::from_env()?;
            init_tracing(&config);
            tracing::info!("starting invoice desk");

            let db = Database::for_app(app.handle(), &config)?;
            app.manage(AppState::new(Session::new(db, config)));

            let quit = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
            let menu = Menu::with_items(app, &[&quit])?;

            let mut tray = TrayIconBuilder::new()
                .menu(&menu)
                .show_menu_on_left_click(false);
            if let Some(icon) = app.default_window_icon() {
                tray = tray.icon(icon.clone());
            }

            let _tray = tray
                .on_tray_icon_event(|tray, event| {
                    if let TrayIconEvent::Click {
                        button: MouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } = event
                    {
                        let app = tray.app_handle();
                        if let Some(window) = app.get_webview_window("main") {
                            if window.is_visible().unwrap_or(false) {
                                let _ = window.hide();
                            } else {
                                let _ = window.show();
                                let _ = window.set_focus();
                            }
                        }
                    }
                })
                .on_menu_event(|app, event| {
                    if event.id == "quit" {
                        app.exit(0);
                    }
                })
                .build(app)?;

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Session
            session::restore_session,
            session::login,
            session::logout,
            session::get_snapshot,
            session::set_active_tab,
            session::dismiss_notification,
            // Dashboard
            dashboard::get_dashboard,
            // Invoices
            invoices::get_invoices,
            invoices::change_invoice_status,
            invoices::open_invoice_editor,
            invoices::editor_select_client,
            invoices::editor_update_details,
            invoices::editor_add_item,
            invoices::editor_update_item,
            invoices::editor_remove_item,
            invoices::preview_totals,
            invoices::save_invoice,
            invoices::cancel_invoice_editor,
            // Clients
            clients::get_clients,
            clients::add_client,
            clients::save_client,
            // Settings
            settings::get_profile,
            settings::update_profile,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
