use std::cell::RefCell;
use std::rc::Rc;

use gtk::prelude::*;
use gtk::{glib, Align, Label, Orientation};
use libadwaita::prelude::*;
use libadwaita::{StatusPage, WindowTitle};
use libshumate::prelude::{LocationExt, MarkerExt};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::data::{Feature, TimeRange, FEED_ERROR_MESSAGE};
use crate::feed;
use crate::marker::{self, MagnitudeColor};
use crate::state::{visible_events, Phase, ViewState};

/// The map page: a stack of loading / error / map children, the marker
/// layer on the map, and the shared view state driving all three.
#[derive(Clone)]
pub struct MapView {
    root: gtk::Stack,
    marker_layer: Option<libshumate::MarkerLayer>,
    error_page: StatusPage,
    title: WindowTitle,
    state: Rc<RefCell<ViewState>>,
}

impl MapView {
    pub fn new(settings: &Settings, title: WindowTitle) -> Self {
        // Create the map widget using libshumate
        let map = libshumate::SimpleMap::new();

        let map_source = libshumate::RasterRenderer::from_url(settings.tile_url.as_str());
        map.set_map_source(Some(&map_source));

        // Get the viewport to create the marker layer
        let marker_layer = if let Some(map_view) = map.map() {
            if let Some(viewport) = map_view.viewport() {
                let layer = libshumate::MarkerLayer::new(&viewport);
                map_view.add_layer(&layer);

                // World overview at startup; zoom bounded so the map never
                // tiles the world more than once horizontally.
                viewport.set_min_zoom_level(2);
                viewport.set_max_zoom_level(8);
                map_view.go_to_full(0.0, 0.0, 2.0);

                Some(layer)
            } else {
                None
            }
        } else {
            None
        };

        map.set_vexpand(true);
        map.set_hexpand(true);

        // Layer the fixed legend over the map surface
        let map_overlay = gtk::Overlay::new();
        map_overlay.set_child(Some(&map));
        map_overlay.add_overlay(&build_legend());

        let error_page = StatusPage::builder()
            .icon_name("network-error-symbolic")
            .title(FEED_ERROR_MESSAGE)
            .build();

        let root = gtk::Stack::builder()
            .transition_type(gtk::StackTransitionType::Crossfade)
            .build();
        root.add_named(&build_loading_page(), Some("loading"));
        root.add_named(&error_page, Some("error"));
        root.add_named(&map_overlay, Some("map"));

        let state = ViewState::new(settings.time_range, settings.min_magnitude);

        Self {
            root,
            marker_layer,
            error_page,
            title,
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn root(&self) -> &gtk::Stack {
        &self.root
    }

    /// Re-issue the current time range, e.g. from the refresh button.
    pub fn refresh(&self) {
        let (token, range) = {
            let mut state = self.state.borrow_mut();
            (state.begin_fetch(), state.time_range)
        };
        self.spawn_fetch(token, range);
    }

    pub fn select_time_range(&self, range: TimeRange) {
        let token = self.state.borrow_mut().select_time_range(range);
        self.spawn_fetch(token, range);
    }

    /// Threshold changes only re-filter the in-memory records; no fetch.
    pub fn select_min_magnitude(&self, min_magnitude: f64) {
        self.state.borrow_mut().min_magnitude = min_magnitude;
        self.render();
    }

    fn spawn_fetch(&self, token: u64, range: TimeRange) {
        self.render();
        info!("fetching {} feed", range.as_str());

        let view = self.clone();
        glib::spawn_future_local(async move {
            let result = feed::fetch_feed(range).await;
            match &result {
                Ok(feed) => info!(
                    "loaded {} events from the {} feed",
                    feed.features.len(),
                    range.as_str()
                ),
                Err(e) => warn!("feed fetch failed: {e}"),
            }

            let applied = view.state.borrow_mut().finish_fetch(token, result);
            if applied {
                view.render();
            } else {
                debug!("discarding stale response for fetch {token}");
            }
        });
    }

    /// Swap the visible page and redraw markers from current state.
    fn render(&self) {
        let state = self.state.borrow();
        match state.phase {
            Phase::Loading => self.root.set_visible_child_name("loading"),
            Phase::Failed => {
                if let Some(message) = &state.error {
                    self.error_page.set_title(message);
                }
                self.root.set_visible_child_name("error");
            }
            Phase::Ready => {
                if let Some(meta) = &state.metadata {
                    self.title
                        .set_subtitle(&format!("{} · {} events", meta.title, meta.count));
                }
                self.rebuild_markers(&state);
                self.root.set_visible_child_name("map");
            }
        }
    }

    fn rebuild_markers(&self, state: &ViewState) {
        let Some(layer) = &self.marker_layer else {
            return;
        };
        layer.remove_all();

        let visible = visible_events(&state.records, state.min_magnitude);
        debug!("rendering {} of {} events", visible.len(), state.records.len());
        for event in visible {
            create_event_marker(layer, event);
        }
    }
}

/// Place one styled circle on the layer, with a popover on click.
fn create_event_marker(layer: &libshumate::MarkerLayer, event: &Feature) {
    let style = marker::style_for(event.properties.mag.unwrap_or(0.0));
    let dot = marker::marker_widget(style);

    let popover = gtk::Popover::new();
    popover.add_css_class("map-popover");
    popover.set_child(Some(&build_popup_content(event)));
    popover.set_parent(&dot);

    let gesture = gtk::GestureClick::new();
    gesture.connect_released(move |_, _, _, _| {
        popover.popup();
    });
    dot.add_controller(gesture);

    let marker = libshumate::Marker::new();
    marker.set_child(Some(&dot));
    marker.set_location(event.latitude(), event.longitude());
    layer.add_marker(&marker);
}

fn build_popup_content(event: &Feature) -> gtk::Box {
    let content = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(4)
        .margin_top(10)
        .margin_bottom(10)
        .margin_start(10)
        .margin_end(10)
        .build();

    let place = event.properties.place.clone().unwrap_or_default();
    let place_label = Label::builder()
        .label(&place)
        .wrap(true)
        .max_width_chars(32)
        .xalign(0.0)
        .build();
    place_label.add_css_class("heading");
    content.append(&place_label);

    let magnitude = event
        .properties
        .mag
        .map(|m| m.to_string())
        .unwrap_or_default();
    let details = [
        format!("Magnitude: {magnitude}"),
        format!("Depth: {} km", event.depth_km()),
        format!("Time: {}", format_event_time(event)),
    ];
    for text in details {
        let label = Label::builder().label(&text).xalign(0.0).build();
        content.append(&label);
    }

    content
}

/// Event time rendered through the local timezone.
fn format_event_time(event: &Feature) -> String {
    event
        .time()
        .map(|t| t.with_timezone(&chrono::Local).format("%c").to_string())
        .unwrap_or_default()
}

fn build_loading_page() -> gtk::Box {
    let page = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(12)
        .halign(Align::Center)
        .valign(Align::Center)
        .build();

    let spinner = gtk::Spinner::builder()
        .spinning(true)
        .width_request(32)
        .height_request(32)
        .build();
    page.append(&spinner);

    let label = Label::builder().label("Loading earthquakes...").build();
    label.add_css_class("dim-label");
    page.append(&label);

    page
}

fn build_legend() -> gtk::Box {
    let legend = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(6)
        .halign(Align::End)
        .valign(Align::End)
        .margin_end(12)
        .margin_bottom(12)
        .build();
    legend.add_css_class("legend");

    let title = Label::builder().label("Magnitude").xalign(0.0).build();
    title.add_css_class("heading");
    legend.append(&title);

    let buckets = [
        (MagnitudeColor::Green, "≤ 3.0"),
        (MagnitudeColor::Orange, "3.1 – 5.0"),
        (MagnitudeColor::Red, "> 5.0"),
    ];
    for (color, text) in buckets {
        let row = gtk::Box::builder()
            .orientation(Orientation::Horizontal)
            .spacing(8)
            .build();
        row.append(&marker::legend_dot(color));

        let label = Label::builder().label(text).xalign(0.0).build();
        row.append(&label);

        legend.append(&row);
    }

    legend
}
