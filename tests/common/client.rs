use std::collections::BTreeSet;
use std::net::SocketAddr;

use axum::Router;

use forest_map::client::bounds::Bounds;
use forest_map::client::{ListEntry, MapView, MarkerId, MarkerSpec, StatusMessage};

/// Serve `app` on an ephemeral loopback port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });
    format!("http://{addr}")
}

/// Minimal headless view that keeps what a user would see.
#[derive(Debug, Default)]
pub struct HeadlessView {
    pub markers: Vec<MarkerSpec>,
    pub active_markers: BTreeSet<MarkerId>,
    pub list: Vec<ListEntry>,
    pub active_items: BTreeSet<String>,
    pub hidden: BTreeSet<String>,
    pub fitted: Option<Bounds>,
    pub status: Option<StatusMessage>,
}

impl HeadlessView {
    pub fn list_codes(&self) -> Vec<String> {
        self.list.iter().map(|e| e.code.clone()).collect()
    }
}

impl MapView for HeadlessView {
    fn clear_markers(&mut self) {
        self.markers.clear();
        self.active_markers.clear();
    }

    fn add_marker(&mut self, marker: &MarkerSpec) {
        self.markers.push(marker.clone());
    }

    fn set_marker_active(&mut self, marker: MarkerId, active: bool) {
        if active {
            self.active_markers.insert(marker);
        } else {
            self.active_markers.remove(&marker);
        }
    }

    fn open_popup(&mut self, _marker: MarkerId) {}

    fn pan_to(&mut self, _lat: f64, _lng: f64) {}

    fn fit_bounds(&mut self, bounds: &Bounds) {
        self.fitted = Some(*bounds);
    }

    fn replace_list(&mut self, entries: &[ListEntry]) {
        self.list = entries.to_vec();
        self.active_items.clear();
        self.hidden.clear();
    }

    fn set_item_active(&mut self, key: &str, active: bool) {
        if active {
            self.active_items.insert(key.to_string());
        } else {
            self.active_items.remove(key);
        }
    }

    fn scroll_item_into_view(&mut self, _key: &str) {}

    fn set_item_visible(&mut self, key: &str, visible: bool) {
        if visible {
            self.hidden.remove(key);
        } else {
            self.hidden.insert(key.to_string());
        }
    }

    fn set_status(&mut self, status: &StatusMessage) {
        self.status = Some(status.clone());
    }
}
