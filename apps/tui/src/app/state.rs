use std::path::PathBuf;
use std::time::Instant;

use color_eyre::Result;
use ratatui::layout::Rect;
use throbber_widgets_tui::ThrobberState;

use crate::client::{ClientError, EvaluationRecord};
use crate::config::init_app_config;
use crate::geodata::{load_layers, Bounds, MapLayers};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppScreen {
    Intro,
    Map,
}

/// The single active selection. At most one feature is selected at a
/// time; selecting another feature replaces this without prompting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFeature {
    pub name: String,
    pub id: String,
}

/// A side effect requested by a state transition. Handlers stay pure;
/// the event loop owns the actual network dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchEvaluations { token: u64, green_id: String },
    SubmitEvaluation {
        token: u64,
        green_id: String,
        comment: String,
    },
}

/// Completion of a dispatched effect, tagged with the selection token it
/// was issued under.
#[derive(Debug)]
pub enum NetEvent {
    EvaluationsFetched {
        token: u64,
        result: Result<Vec<EvaluationRecord>, ClientError>,
    },
    SubmitFinished {
        token: u64,
        result: Result<(), ClientError>,
    },
}

/// Visible longitude/latitude window of the map canvas.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Viewport {
    pub fn from_bounds(bounds: &Bounds) -> Self {
        let pad_lon = (bounds.max_lon - bounds.min_lon).max(0.001) * 0.05;
        let pad_lat = (bounds.max_lat - bounds.min_lat).max(0.001) * 0.05;
        Self {
            min_lon: bounds.min_lon - pad_lon,
            min_lat: bounds.min_lat - pad_lat,
            max_lon: bounds.max_lon + pad_lon,
            max_lat: bounds.max_lat + pad_lat,
        }
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Maps a terminal cell inside `area` back to geographic coordinates.
    /// Row 0 of the area is the viewport's northern edge.
    pub fn cell_to_lonlat(&self, area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        let lon = self.lon_span().mul_add(fx, self.min_lon);
        let lat = self.lat_span().mul_add(-fy, self.max_lat);
        Some((lon, lat))
    }

    /// Pans by a fraction of the visible span.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let shift_lon = self.lon_span() * dx;
        let shift_lat = self.lat_span() * dy;
        self.min_lon += shift_lon;
        self.max_lon += shift_lon;
        self.min_lat += shift_lat;
        self.max_lat += shift_lat;
    }

    /// Zooms around the viewport center; factors below 1 zoom in.
    pub fn zoom(&mut self, factor: f64) {
        let center_lon = (self.min_lon + self.max_lon) / 2.0;
        let center_lat = (self.min_lat + self.max_lat) / 2.0;
        let half_lon = self.lon_span() / 2.0 * factor;
        let half_lat = self.lat_span() / 2.0 * factor;
        self.min_lon = center_lon - half_lon;
        self.max_lon = center_lon + half_lon;
        self.min_lat = center_lat - half_lat;
        self.max_lat = center_lat + half_lat;
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub intro_scroll: u16,
    pub layers: Option<MapLayers>,
    pub viewport: Viewport,
    pub data_dir: PathBuf,
    pub server_url: String,
    /// Greenspace under the pointer; restyled while hovered, restored to
    /// its own base style on leave. Never affects selection.
    pub hovered: Option<usize>,
    pub hovered_ndvi: Option<f64>,
    /// Keyboard focus for Tab cycling.
    pub focused: Option<usize>,
    pub selected: Option<SelectedFeature>,
    /// Bumped on every selection change and dismissal; responses carrying
    /// an older token are discarded.
    pub selection_token: u64,
    pub evaluations: Vec<EvaluationRecord>,
    pub evaluations_loading: bool,
    pub draft: String,
    pub submitting: bool,
    pub status_message: String,
    pub show_help: bool,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub throbber: ThrobberState,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            screen: AppScreen::Intro,
            intro_scroll: 0,
            layers: None,
            viewport: Viewport::from_bounds(&Bounds::fallback()),
            data_dir: PathBuf::from("./data"),
            server_url: "http://localhost:3001".to_string(),
            hovered: None,
            hovered_ndvi: None,
            focused: None,
            selected: None,
            selection_token: 0,
            evaluations: Vec::new(),
            evaluations_loading: false,
            draft: String::new(),
            submitting: false,
            status_message: String::new(),
            show_help: false,
            animation_counter: 0.0,
            last_frame: Instant::now(),
            throbber: ThrobberState::default(),
        }
    }

    /// Reads configuration and loads the three GeoJSON layers.
    pub fn initialize(&mut self) -> Result<()> {
        let config = init_app_config();
        self.data_dir = config.data_dir;
        self.server_url = config.server_url;

        let layers = load_layers(&self.data_dir)?;
        self.viewport = Viewport::from_bounds(&layers.bounds);
        self.status_message = format!(
            "Loaded {} greenspaces, {} roads, {} NDVI samples",
            layers.greenspaces.len(),
            layers.roads.len(),
            layers.points.len()
        );
        self.layers = Some(layers);
        Ok(())
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Update animation counter (cycles between 0 and 2*PI)
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.evaluations_loading || self.submitting {
            self.throbber.calc_next();
        }
    }

    pub fn greenspace_count(&self) -> usize {
        self.layers.as_ref().map_or(0, |l| l.greenspaces.len())
    }

    /// Hover state transition; leaving a feature simply drops the index,
    /// the renderer falls back to each feature's own base style.
    pub fn update_hover(&mut self, hit: Option<usize>) {
        self.hovered = hit;
    }

    pub fn focus_next(&mut self) {
        let count = self.greenspace_count();
        if count == 0 {
            return;
        }
        self.focused = Some(self.focused.map_or(0, |i| (i + 1) % count));
    }

    pub fn focus_prev(&mut self) {
        let count = self.greenspace_count();
        if count == 0 {
            return;
        }
        self.focused = Some(self.focused.map_or(count - 1, |i| (i + count - 1) % count));
    }

    pub fn scroll_intro(&mut self, delta: i32, max: u16) {
        let current = i32::from(self.intro_scroll);
        let next = (current + delta).clamp(0, i32::from(max));
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        {
            self.intro_scroll = next as u16;
        }
    }

    /// Selects a greenspace by layer index, replacing any prior selection.
    ///
    /// Re-selecting the current feature is a no-op so a double click never
    /// duplicates the fetch. A distinct selection bumps the token exactly
    /// once and requests one evaluations fetch.
    pub fn select_greenspace(&mut self, index: usize) -> Option<Effect> {
        let greenspace = self.layers.as_ref()?.greenspaces.get(index)?;
        let name = greenspace.label();
        let id = greenspace.id.clone();

        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            return None;
        }

        self.selected = Some(SelectedFeature {
            name,
            id: id.clone(),
        });
        self.focused = Some(index);
        self.selection_token += 1;
        self.evaluations.clear();
        self.evaluations_loading = true;
        self.draft.clear();
        self.status_message.clear();

        Some(Effect::FetchEvaluations {
            token: self.selection_token,
            green_id: id,
        })
    }

    /// Explicit dismissal: the only way selection is cleared. Clears the
    /// displayed list and the pending draft, and invalidates in-flight
    /// responses by bumping the token.
    pub fn dismiss_selection(&mut self) {
        self.selected = None;
        self.selection_token += 1;
        self.evaluations.clear();
        self.evaluations_loading = false;
        self.draft.clear();
        self.submitting = false;
    }

    /// Submit is enabled only with a selection and a draft that survives
    /// trimming; the trimmed text is what goes on the wire.
    pub fn submit_draft(&mut self) -> Option<Effect> {
        if self.submitting {
            return None;
        }
        let selected = self.selected.as_ref()?;
        let comment = self.draft.trim();
        if comment.is_empty() {
            return None;
        }
        self.submitting = true;
        Some(Effect::SubmitEvaluation {
            token: self.selection_token,
            green_id: selected.id.clone(),
            comment: comment.to_string(),
        })
    }

    /// Applies a completed network operation. Responses whose token no
    /// longer matches the current selection are discarded so a superseded
    /// fetch can never overwrite the newer feature's panel.
    pub fn apply_net_event(&mut self, event: NetEvent) -> Option<Effect> {
        match event {
            NetEvent::EvaluationsFetched { token, result } => {
                if token != self.selection_token {
                    return None;
                }
                self.evaluations_loading = false;
                match result {
                    Ok(list) => self.evaluations = list,
                    Err(e) => {
                        self.status_message = format!("Error: failed to load evaluations: {e}");
                    }
                }
                None
            }
            NetEvent::SubmitFinished { token, result } => {
                self.submitting = false;
                if token != self.selection_token {
                    return None;
                }
                match result {
                    Ok(()) => {
                        // Append-then-refresh: re-fetch rather than insert locally.
                        self.draft.clear();
                        self.status_message = "Evaluation submitted".to_string();
                        let selected = self.selected.as_ref()?;
                        self.evaluations_loading = true;
                        Some(Effect::FetchEvaluations {
                            token,
                            green_id: selected.id.clone(),
                        })
                    }
                    Err(e) => {
                        // Draft stays intact so the user can retry.
                        self.status_message = format!("Error: submit failed: {e}");
                        None
                    }
                }
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodata::feature::base_color_for;
    use crate::geodata::Greenspace;
    use geo_types::MultiPolygon;

    fn greenspace(id: &str, name: Option<&str>) -> Greenspace {
        Greenspace {
            id: id.to_string(),
            name: name.map(str::to_string),
            boundary: MultiPolygon(vec![]),
            base_color: base_color_for(id),
        }
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.layers = Some(MapLayers {
            roads: vec![],
            points: vec![],
            greenspaces: vec![
                greenspace("101", Some("Park A")),
                greenspace("202", None),
            ],
            skipped_points: 0,
            bounds: Bounds::fallback(),
        });
        app
    }

    fn record(id: i64, green_id: &str, comment: &str) -> EvaluationRecord {
        EvaluationRecord {
            id,
            green_id: green_id.to_string(),
            comment: comment.to_string(),
            created_at: "2026-08-07 10:00:00".to_string(),
        }
    }

    #[test]
    fn selection_is_idempotent() {
        let mut app = test_app();

        let first = app.select_greenspace(0);
        assert!(matches!(
            first,
            Some(Effect::FetchEvaluations { token: 1, .. })
        ));

        let second = app.select_greenspace(0);
        assert_eq!(second, None);
        assert_eq!(app.selection_token, 1);
    }

    #[test]
    fn switching_selection_replaces_and_refetches() {
        let mut app = test_app();
        app.select_greenspace(0);
        app.draft = "half-typed".to_string();

        let effect = app.select_greenspace(1);
        assert!(matches!(
            effect,
            Some(Effect::FetchEvaluations { token: 2, .. })
        ));
        assert_eq!(
            app.selected.as_ref().map(|s| s.id.as_str()),
            Some("202")
        );
        assert_eq!(
            app.selected.as_ref().map(|s| s.name.as_str()),
            Some("Greenspace 202")
        );
        assert!(app.draft.is_empty());
    }

    #[test]
    fn stale_fetch_response_is_discarded() {
        let mut app = test_app();
        app.select_greenspace(0); // token 1, fetch for "101" in flight
        app.select_greenspace(1); // token 2 supersedes it

        let effect = app.apply_net_event(NetEvent::EvaluationsFetched {
            token: 1,
            result: Ok(vec![record(1, "101", "stale data")]),
        });

        assert_eq!(effect, None);
        assert!(app.evaluations.is_empty());
        assert!(app.evaluations_loading);
    }

    #[test]
    fn matching_fetch_response_is_applied() {
        let mut app = test_app();
        app.select_greenspace(0);

        app.apply_net_event(NetEvent::EvaluationsFetched {
            token: 1,
            result: Ok(vec![record(1, "101", "nice park")]),
        });

        assert!(!app.evaluations_loading);
        assert_eq!(app.evaluations.len(), 1);
        assert_eq!(app.evaluations[0].comment, "nice park");
    }

    #[test]
    fn dismissal_clears_list_and_draft() {
        let mut app = test_app();
        app.select_greenspace(0);
        app.evaluations = vec![record(1, "101", "nice park")];
        app.draft = "another one".to_string();

        app.dismiss_selection();

        assert_eq!(app.selected, None);
        assert!(app.evaluations.is_empty());
        assert!(app.draft.is_empty());
    }

    #[test]
    fn dismissal_invalidates_in_flight_fetch() {
        let mut app = test_app();
        app.select_greenspace(0); // token 1
        app.dismiss_selection(); // token 2

        app.apply_net_event(NetEvent::EvaluationsFetched {
            token: 1,
            result: Ok(vec![record(1, "101", "late arrival")]),
        });

        assert!(app.evaluations.is_empty());
    }

    #[test]
    fn submit_requires_selection_and_nonblank_draft() {
        let mut app = test_app();
        app.draft = "orphan comment".to_string();
        assert_eq!(app.submit_draft(), None);

        app.select_greenspace(0);
        app.draft = "   ".to_string();
        assert_eq!(app.submit_draft(), None);

        app.draft = "  nice park  ".to_string();
        let effect = app.submit_draft();
        assert_eq!(
            effect,
            Some(Effect::SubmitEvaluation {
                token: 1,
                green_id: "101".to_string(),
                comment: "nice park".to_string(),
            })
        );
    }

    #[test]
    fn failed_submit_keeps_draft_for_retry() {
        let mut app = test_app();
        app.select_greenspace(0);
        app.draft = "nice park".to_string();
        app.submit_draft();

        let effect = app.apply_net_event(NetEvent::SubmitFinished {
            token: 1,
            result: Err(ClientError::Status {
                status: 500,
                body: "database is locked".to_string(),
            }),
        });

        assert_eq!(effect, None);
        assert_eq!(app.draft, "nice park");
        assert!(app.status_message.starts_with("Error"));
        assert!(app.status_message.contains("500"));
    }

    #[test]
    fn successful_submit_clears_draft_and_refetches() {
        let mut app = test_app();
        app.select_greenspace(0);
        app.draft = "nice park".to_string();
        app.submit_draft();

        let effect = app.apply_net_event(NetEvent::SubmitFinished {
            token: 1,
            result: Ok(()),
        });

        assert_eq!(
            effect,
            Some(Effect::FetchEvaluations {
                token: 1,
                green_id: "101".to_string(),
            })
        );
        assert!(app.draft.is_empty());
        assert_eq!(app.status_message, "Evaluation submitted");
    }

    #[test]
    fn hover_changes_never_touch_selection() {
        let mut app = test_app();
        app.select_greenspace(0);

        app.update_hover(Some(1));
        app.update_hover(None);

        assert_eq!(
            app.selected.as_ref().map(|s| s.id.as_str()),
            Some("101")
        );
    }

    #[test]
    fn viewport_cell_mapping_covers_corners() {
        let viewport = Viewport {
            min_lon: 120.0,
            min_lat: 30.0,
            max_lon: 121.0,
            max_lat: 31.0,
        };
        let area = Rect::new(0, 0, 10, 10);

        let (lon, lat) = viewport.cell_to_lonlat(area, 0, 0).unwrap();
        assert!((lon - 120.05).abs() < 1e-9);
        assert!((lat - 30.95).abs() < 1e-9);

        let (lon, lat) = viewport.cell_to_lonlat(area, 9, 9).unwrap();
        assert!((lon - 120.95).abs() < 1e-9);
        assert!((lat - 30.05).abs() < 1e-9);

        assert_eq!(viewport.cell_to_lonlat(area, 10, 5), None);
    }
}
