use gtk::prelude::*;
use gtk::{glib, Application};
use libadwaita::prelude::*;
use libadwaita::{ApplicationWindow, ColorScheme, HeaderBar, StyleManager, ToolbarView, WindowTitle};

mod config;
mod data;
mod feed;
mod map_view;
mod marker;
mod state;

use data::{TimeRange, APP_ID, MIN_MAGNITUDE_CHOICES};
use map_view::MapView;

fn main() -> glib::ExitCode {
    init_tracing();

    // Initialize Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _guard = rt.enter();

    let app = Application::builder().application_id(APP_ID).build();

    app.connect_activate(build_ui);

    let exit_code = app.run();

    // Keep runtime alive until app exits
    drop(_guard);
    drop(rt);

    exit_code
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_ui(app: &Application) {
    let style_manager = StyleManager::default();
    style_manager.set_color_scheme(ColorScheme::PreferDark);

    let settings = config::load();

    let title = WindowTitle::new("Earthquake Visualizer", "");
    let view = MapView::new(&settings, title.clone());

    // Time range selector
    let range_labels: Vec<&str> = TimeRange::ALL.iter().map(|r| r.label()).collect();
    let range_dropdown = gtk::DropDown::builder()
        .model(&gtk::StringList::new(&range_labels))
        .tooltip_text("Time range")
        .build();
    let initial_range = TimeRange::ALL
        .iter()
        .position(|r| *r == settings.time_range)
        .unwrap_or(1);
    range_dropdown.set_selected(initial_range as u32);

    let view_for_range = view.clone();
    range_dropdown.connect_selected_notify(move |dropdown| {
        if let Some(range) = TimeRange::ALL.get(dropdown.selected() as usize) {
            view_for_range.select_time_range(*range);
        }
    });

    // Minimum magnitude selector
    let magnitude_labels: Vec<&str> = MIN_MAGNITUDE_CHOICES.iter().map(|(label, _)| *label).collect();
    let magnitude_dropdown = gtk::DropDown::builder()
        .model(&gtk::StringList::new(&magnitude_labels))
        .tooltip_text("Minimum magnitude")
        .build();
    let initial_magnitude = MIN_MAGNITUDE_CHOICES
        .iter()
        .position(|(_, value)| (*value - settings.min_magnitude).abs() < f64::EPSILON)
        .unwrap_or(0);
    magnitude_dropdown.set_selected(initial_magnitude as u32);

    let view_for_magnitude = view.clone();
    magnitude_dropdown.connect_selected_notify(move |dropdown| {
        if let Some((_, value)) = MIN_MAGNITUDE_CHOICES.get(dropdown.selected() as usize) {
            view_for_magnitude.select_min_magnitude(*value);
        }
    });

    // Refresh button re-issues the current time range
    let refresh_button = gtk::Button::builder()
        .icon_name("view-refresh-symbolic")
        .tooltip_text("Reload earthquake data")
        .build();
    let view_for_refresh = view.clone();
    refresh_button.connect_clicked(move |_| {
        view_for_refresh.refresh();
    });

    let header_bar = HeaderBar::builder().build();
    header_bar.set_title_widget(Some(&title));
    header_bar.pack_start(&range_dropdown);
    header_bar.pack_start(&magnitude_dropdown);
    header_bar.pack_end(&refresh_button);

    let toolbar_view = ToolbarView::builder().build();
    toolbar_view.add_top_bar(&header_bar);
    toolbar_view.set_content(Some(view.root()));

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Earthquake Visualizer")
        .default_width(1000)
        .default_height(700)
        .build();

    // Load custom CSS for the legend and marker popovers
    let css_provider = gtk::CssProvider::new();
    css_provider.load_from_data(
        ".legend {
            background-color: alpha(@window_bg_color, 0.85);
            border-radius: 12px;
            padding: 10px 14px;
            box-shadow: 0 4px 12px alpha(black, 0.3);
        }
        .map-popover > contents {
            background-color: alpha(@card_bg_color, 0.95);
            border-radius: 12px;
            box-shadow: 0 4px 16px alpha(black, 0.6);
        }",
    );

    gtk::style_context_add_provider_for_display(
        &gtk::prelude::WidgetExt::display(&window),
        &css_provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    window.set_content(Some(&toolbar_view));
    window.present();

    // Initial fetch on startup
    view.refresh();
}
