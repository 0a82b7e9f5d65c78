use std::env;
use std::fs;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::execute;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};

use tui_managedtree::{
    AutoExpand, TreeChange, TreeEvent, TreeLabelParts, TreeLabelProvider, TreeModel, TreeView,
    TreeViewConfig, TreeViewState, TreeViewStyle,
};

// Controls offered by an activated file row, cycled with Tab.
const FILE_CONTROLS: [&str; 2] = ["open", "copy path"];

struct Node {
    name: String,
    path: PathBuf,
    parent: Option<usize>,
    children: Vec<usize>,
    is_dir: bool,
}

struct SourcesModel {
    nodes: Vec<Node>,
    roots: Vec<usize>,
}

impl SourcesModel {
    const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn push_node(&mut self, node: Node) -> usize {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }
}

impl TreeModel for SourcesModel {
    type Id = usize;
    type Key = PathBuf;

    fn roots(&self) -> &[usize] {
        &self.roots
    }

    fn children(&self, id: usize) -> &[usize] {
        &self.nodes[id].children
    }

    fn parent(&self, id: usize) -> Option<usize> {
        self.nodes[id].parent
    }

    // Paths survive a rescan, node indices do not.
    fn key(&self, id: usize) -> PathBuf {
        self.nodes[id].path.clone()
    }

    fn contains(&self, id: usize) -> bool {
        id < self.nodes.len()
    }

    fn is_expandable(&self, id: usize) -> bool {
        self.nodes[id].is_dir && !self.nodes[id].children.is_empty()
    }

    fn focusable_elements(&self, id: usize) -> usize {
        if self.nodes[id].is_dir {
            0
        } else {
            FILE_CONTROLS.len()
        }
    }

    fn size_hint(&self) -> usize {
        self.nodes.len()
    }
}

struct Label;

impl TreeLabelProvider<SourcesModel> for Label {
    fn label_parts<'a>(&'a self, model: &'a SourcesModel, id: usize) -> TreeLabelParts<'a> {
        let node = &model.nodes[id];
        TreeLabelParts {
            name: node.name.as_str(),
            prefix: Some(if node.is_dir { "+".into() } else { "-".into() }),
        }
    }
}

struct DemoArgs {
    roots: Vec<PathBuf>,
    max_depth: usize,
}

impl DemoArgs {
    fn usage() {
        eprintln!("Usage: sources [PATH...]");
        eprintln!("  PATH   Directories shown as top-level sources (default: current dir)");
        eprintln!("Options:");
        eprintln!("  -d, --depth <N>  Max depth below each source (default: 4)");
        eprintln!("  -h, --help       Show this help");
    }

    fn parse() -> Self {
        let mut roots = Vec::new();
        let mut depth: Option<usize> = None;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => {
                    Self::usage();
                    std::process::exit(0);
                }
                "-d" | "--depth" => {
                    if let Some(value) = args.next() {
                        depth = value.parse().ok();
                    }
                }
                _ => roots.push(PathBuf::from(arg)),
            }
        }

        if roots.is_empty() {
            roots.push(env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        }
        Self {
            roots,
            max_depth: depth.unwrap_or(4),
        }
    }
}

fn build_model(roots: &[PathBuf], max_depth: usize) -> SourcesModel {
    let mut model = SourcesModel::new();
    for root in roots {
        let root = root.canonicalize().unwrap_or_else(|_| root.clone());
        let Ok(metadata) = fs::symlink_metadata(&root) else {
            continue;
        };
        let id = model.push_node(Node {
            name: root.display().to_string(),
            path: root.clone(),
            parent: None,
            children: Vec::new(),
            is_dir: metadata.is_dir(),
        });
        model.roots.push(id);
        if metadata.is_dir() {
            build_children(&mut model, id, &root, 0, max_depth);
        }
    }
    model
}

fn build_children(
    model: &mut SourcesModel,
    parent_id: usize,
    path: &Path,
    depth: usize,
    max_depth: usize,
) {
    if depth >= max_depth {
        return;
    }
    let Ok(read_dir) = fs::read_dir(path) else {
        return;
    };

    let mut entries: Vec<(String, PathBuf, bool)> = read_dir
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            let is_dir = fs::symlink_metadata(&path).ok()?.is_dir();
            let name = entry.file_name().to_string_lossy().to_string();
            Some((name, path, is_dir))
        })
        .collect();
    // Directories first, then by name.
    entries.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

    for (name, path, is_dir) in entries {
        let node_id = model.push_node(Node {
            name,
            path: path.clone(),
            parent: Some(parent_id),
            children: Vec::new(),
            is_dir,
        });
        model.nodes[parent_id].children.push(node_id);
        if is_dir {
            build_children(model, node_id, &path, depth + 1, max_depth);
        }
    }
}

struct App {
    model: SourcesModel,
    state: TreeViewState<usize, PathBuf>,
    status: String,
    tree_area: Rect,
}

impl App {
    fn status_line(&self) -> String {
        let Some(active) = self.state.active() else {
            return self.status.clone();
        };
        let node = &self.model.nodes[active];
        match self.state.focus_trap() {
            Some(trap) => format!(
                "{}: [{}] (Tab cycles, Esc returns)",
                node.name,
                FILE_CONTROLS[trap.current()]
            ),
            None => format!("{} (active)", node.name),
        }
    }

    fn drain_changes(&mut self) {
        for change in self.state.take_changes() {
            self.status = match change {
                TreeChange::Focused(Some(id)) => {
                    format!("focused {}", self.model.nodes[id].path.display())
                }
                TreeChange::Focused(None) => "focus cleared".to_string(),
                TreeChange::Expanded { id, expanded } => {
                    format!("expanded {} ({} open)", self.model.nodes[id].name, expanded.len())
                }
                TreeChange::Collapsed { id, expanded } => {
                    format!("collapsed {} ({} open)", self.model.nodes[id].name, expanded.len())
                }
                TreeChange::ExpansionChanged(expanded) => format!("{} open", expanded.len()),
                TreeChange::Activated(Some(id)) => {
                    format!("activated {}", self.model.nodes[id].name)
                }
                TreeChange::Activated(None) => "deactivated".to_string(),
            };
        }
    }

    fn click(&mut self, column: u16, row: u16) {
        let inner = Rect {
            x: self.tree_area.x + 1,
            y: self.tree_area.y + 1,
            width: self.tree_area.width.saturating_sub(2),
            height: self.tree_area.height.saturating_sub(2),
        };
        if !inner.contains((column, row).into()) {
            self.state.handle_blur(false);
            return;
        }
        if let Some(id) = self.state.item_at_row(usize::from(row - inner.y)) {
            self.state.handle_click(&self.model, id);
        }
    }
}

fn render(frame: &mut Frame, app: &mut App, style: &TreeViewStyle<'_>) {
    let [tree_area, status_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
    app.tree_area = tree_area;

    let widget = TreeView::new(&app.model, &Label, style.clone());
    frame.render_stateful_widget(widget, tree_area, &mut app.state);

    let status = Paragraph::new(app.status_line()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, status_area);
}

fn run_app(mut terminal: DefaultTerminal, mut app: App, style: &TreeViewStyle<'_>) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, &mut app, style))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let quit = key.code == KeyCode::Char('q')
                    || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    break;
                }
                if app.state.handle_key(&app.model, key) == TreeEvent::Unhandled
                    && key.code == KeyCode::Char('r')
                {
                    app.state.collapse_all();
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => app.click(mouse.column, mouse.row),
                MouseEventKind::ScrollDown => app.state.scroll_down_by(3),
                MouseEventKind::ScrollUp => app.state.scroll_up_by(3),
                _ => {}
            },
            Event::FocusGained => app.state.handle_focus_in(&app.model, true),
            Event::FocusLost => app.state.handle_blur(false),
            _ => {}
        }
        app.drain_changes();
    }

    Ok(())
}

fn main() -> io::Result<()> {
    let args = DemoArgs::parse();
    let model = build_model(&args.roots, args.max_depth);

    let config = TreeViewConfig {
        auto_expand: AutoExpand::depth(1),
        prevent_blur: true,
        ..TreeViewConfig::default()
    };
    let mut state: TreeViewState<usize, PathBuf> = TreeViewState::with_config(&config);
    state.handle_focus_in(&model, true);

    let mut style = config.apply_style(TreeViewStyle::default());
    style.block_style = Style::default()
        .fg(Color::Rgb(221, 227, 235))
        .bg(Color::Rgb(24, 28, 36));
    style.border_style = Style::default().fg(Color::Rgb(92, 110, 140));
    style.line_style = Style::default().fg(Color::Rgb(86, 98, 120));
    style.active_style = Style::default()
        .fg(Color::Rgb(136, 192, 208))
        .add_modifier(Modifier::BOLD);
    style.highlight_style = Style::default()
        .fg(Color::Rgb(255, 255, 255))
        .bg(Color::Rgb(52, 66, 96))
        .add_modifier(Modifier::BOLD);
    style.title = Some(Line::from(format!("Sources ({} roots)", args.roots.len())));

    let mut app = App {
        model,
        state,
        status: "q quits, r collapses everything".to_string(),
        tree_area: Rect::default(),
    };
    app.drain_changes();

    let terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;
    let result = run_app(terminal, app, &style);
    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();
    result
}
