use crate::api::models::{Collection, Source, SourceConnection};
use crate::core::api_key::ApiKeyState;
use crate::core::collections::SourceConnectionMap;
use crate::core::dashboard::{Toast, UiEvent};
use crate::core::dialog::{DialogOrigin, DialogState};
use crate::core::view::{DashboardView, ExampleProject, PanelState};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};

const DESCRIPTION_WIDTH: usize = 40;

/// Renders dashboard view state as terminal tables
pub struct TableDisplay {
    max_width: Option<u16>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: None,
            use_colors: true,
        }
    }

    pub fn with_max_width(mut self, width: u16) -> Self {
        self.max_width = Some(width.max(40));
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Whole dashboard: collections, sources, API key, example projects, dialog
    pub fn render_view(&self, view: &DashboardView) -> String {
        let mut sections = vec![
            self.section("Collections", self.render_collections_panel(view)),
            self.section("Create a collection", self.render_sources_panel(view)),
            self.section("API key", self.render_api_key(&view.api_key)),
            self.section(
                "Example projects",
                self.render_example_projects(view.example_projects),
            ),
        ];
        if view.dialog.is_open() {
            sections.push(self.section("Connect source", self.render_dialog(&view.dialog)));
        }
        sections.join("\n\n")
    }

    fn section(&self, title: &str, body: String) -> String {
        format!("{}\n{}", title, body)
    }

    fn render_collections_panel(&self, view: &DashboardView) -> String {
        let panel = &view.collections;
        match panel.state() {
            PanelState::Loading => "Loading collections...".to_string(),
            PanelState::Empty => "No collections yet. Pick a source below to create one.".to_string(),
            PanelState::Ready => {
                let mut rendered = self.render_collections(&panel.top, &panel.connections);
                if panel.has_more() {
                    rendered.push_str(&format!(
                        "\nShowing {} of {} collections (see all at /collections)",
                        panel.top.len(),
                        panel.total
                    ));
                }
                rendered
            }
        }
    }

    fn render_sources_panel(&self, view: &DashboardView) -> String {
        match view.sources.state() {
            PanelState::Loading => "Loading sources...".to_string(),
            PanelState::Empty => "No sources available.".to_string(),
            PanelState::Ready => self.render_sources(&view.sources.sources),
        }
    }

    pub fn render_collections(
        &self,
        collections: &[Collection],
        connections: &SourceConnectionMap,
    ) -> String {
        let mut table = self.new_table(&["Name", "Readable ID", "Status", "Sources"]);

        for collection in collections {
            let sources = match connections.get(&collection.id) {
                Some(list) if list.is_empty() => "none".to_string(),
                Some(list) => list
                    .iter()
                    .map(|c| c.short_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                None => "-".to_string(),
            };

            table.add_row(vec![
                Cell::new(&collection.name),
                self.dim(&collection.readable_id),
                self.status_cell(&collection.status),
                Cell::new(sources),
            ]);
        }

        table.to_string()
    }

    pub fn render_sources(&self, sources: &[Source]) -> String {
        let mut table = self.new_table(&["Name", "Short name", "Description"]);

        for source in sources {
            let description = source.description.as_deref().unwrap_or("");
            table.add_row(vec![
                Cell::new(&source.name),
                self.dim(&source.short_name),
                Cell::new(truncate_text(description, DESCRIPTION_WIDTH)),
            ]);
        }

        table.to_string()
    }

    pub fn render_connections(&self, collection_id: &str, connections: &[SourceConnection]) -> String {
        if connections.is_empty() {
            return format!("{}: no source connections", collection_id);
        }

        let mut table = self.new_table(&["ID", "Name", "Source", "Status"]);
        for connection in connections {
            table.add_row(vec![
                self.dim(&connection.id),
                Cell::new(&connection.name),
                Cell::new(&connection.short_name),
                self.status_cell(connection.status.as_deref().unwrap_or("unknown")),
            ]);
        }
        format!("{}\n{}", collection_id, table)
    }

    pub fn render_api_key(&self, state: &ApiKeyState) -> String {
        match state {
            ApiKeyState::Loading => "Loading API key...".to_string(),
            ApiKeyState::Missing => "No API key available".to_string(),
            ApiKeyState::Present(key) => key.masked(),
        }
    }

    pub fn render_example_projects(&self, projects: &[ExampleProject]) -> String {
        let mut table = self.new_table(&["#", "Project", "Description"]);
        for project in projects {
            table.add_row(vec![
                self.dim(&project.id.to_string()),
                Cell::new(project.title),
                Cell::new(project.description),
            ]);
        }
        table.to_string()
    }

    pub fn render_dialog(&self, state: &DialogState) -> String {
        let DialogState::Open {
            selection,
            origin,
            error,
        } = state
        else {
            return "Closed".to_string();
        };

        let mut lines = Vec::new();
        lines.push(match selection {
            Some(selection) => format!("Source: {} ({})", selection.name, selection.short_name),
            None => "Source: not selected".to_string(),
        });
        lines.push(match origin {
            DialogOrigin::UserClick => "Opened from source list".to_string(),
            DialogOrigin::ResumedError => "Resumed after a failed connection".to_string(),
        });
        if let Some(error) = error {
            lines.push(format!("Error: {}", error.summary()));
            if let Some(details) = &error.error_details {
                lines.push(format!("Details: {}", details));
            }
        }
        lines.join("\n")
    }

    /// One line per outbound event, for hosts that only print
    pub fn render_event(&self, event: &UiEvent) -> String {
        match event {
            UiEvent::Navigate(path) => format!("-> navigate {}", path),
            UiEvent::ReplaceLocation(location) => format!("-> replace location {}", location),
            UiEvent::Toast(Toast::Info(text)) => format!("-> toast: {}", text),
        }
    }

    fn new_table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        if self.use_colors {
            table.set_header(headers.iter().map(|h| {
                Cell::new(h)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan)
            }));
        } else {
            table.set_header(headers.to_vec());
        }
        table
    }

    fn dim(&self, text: &str) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(Color::DarkGrey)
        } else {
            Cell::new(text)
        }
    }

    fn status_cell(&self, status: &str) -> Cell {
        if !self.use_colors {
            return Cell::new(status);
        }
        let color = match status.to_lowercase().as_str() {
            "ready" | "active" | "completed" => Color::Green,
            "error" | "failed" => Color::Red,
            _ => Color::Yellow,
        };
        Cell::new(status).fg(color)
    }
}

/// Cut `text` to `max_chars` characters, ending with "..." when shortened
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }
    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}
