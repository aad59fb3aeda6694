use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState as ListWidgetState, Paragraph, Wrap},
    Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info};

use crate::browser::{Browser, Command, View};
use crate::coordinator::ListState;
use crate::detail::DetailState;
use crate::dispatch::Dispatcher;
use crate::genres::GenreState;
use crate::models::MovieDetail;
use crate::yts::Catalog;

type Term = Terminal<CrosstermBackend<Stdout>>;

pub async fn run<C: Catalog>(
    catalog: Arc<C>,
    genre_sample_limit: Option<u32>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, catalog, genre_sample_limit).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<C: Catalog>(
    terminal: &mut Term,
    catalog: Arc<C>,
    genre_sample_limit: Option<u32>,
) -> anyhow::Result<()> {
    let (events_tx, mut catalog_events) = mpsc::unbounded_channel();
    let mut dispatcher = Dispatcher::new(catalog, events_tx);
    let mut input = spawn_input_reader();
    let mut browser = Browser::new(genre_sample_limit);
    let mut ui = UiState::default();

    for command in browser.start() {
        dispatcher.dispatch(command);
    }

    loop {
        terminal.draw(|f| render(f, &browser, &ui))?;

        tokio::select! {
            Some(event) = catalog_events.recv() => {
                if let Some(command) = browser.apply(event) {
                    dispatcher.dispatch(command);
                }
            }
            input_event = input.recv() => match input_event {
                None => break,
                Some(Event::Key(key)) => match handle_key(&mut browser, &mut ui, key) {
                    KeyOutcome::Quit => break,
                    KeyOutcome::Continue(commands) => {
                        for command in commands {
                            dispatcher.dispatch(command);
                        }
                    }
                },
                // Resizes and the like only need the redraw at the top of the loop.
                Some(_) => {}
            }
        }
    }

    info!("Leaving catalog browser");
    Ok(())
}

/// Terminal reads block, so they run on their own thread.
fn spawn_input_reader() -> UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Press => {}
            Ok(event) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(err) => {
                error!("Terminal input failed: {}", err);
                break;
            }
        }
    });
    rx
}

#[derive(Debug, Default)]
struct UiState {
    editing_search: bool,
    detail_scroll: u16,
}

#[derive(Debug, PartialEq)]
enum KeyOutcome {
    Continue(Vec<Command>),
    Quit,
}

impl KeyOutcome {
    fn none() -> Self {
        KeyOutcome::Continue(Vec::new())
    }

    fn one(command: Option<Command>) -> Self {
        KeyOutcome::Continue(command.into_iter().collect())
    }
}

fn handle_key(browser: &mut Browser, ui: &mut UiState, key: KeyEvent) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    if ui.editing_search {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                ui.editing_search = false;
                KeyOutcome::none()
            }
            KeyCode::Backspace => KeyOutcome::one(browser.pop_search_char()),
            KeyCode::Char(c) => KeyOutcome::one(Some(browser.push_search_char(c))),
            _ => KeyOutcome::none(),
        };
    }

    match browser.view() {
        View::Detail => match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                browser.close_detail();
                ui.detail_scroll = 0;
                KeyOutcome::none()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                ui.detail_scroll = ui.detail_scroll.saturating_add(1);
                KeyOutcome::none()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                ui.detail_scroll = ui.detail_scroll.saturating_sub(1);
                KeyOutcome::none()
            }
            KeyCode::Char('x') => KeyOutcome::Quit,
            _ => KeyOutcome::none(),
        },
        View::List => match key.code {
            KeyCode::Char('x') => KeyOutcome::Quit,
            KeyCode::Char('/') => {
                ui.editing_search = true;
                KeyOutcome::none()
            }
            KeyCode::Char('q') => KeyOutcome::one(Some(browser.cycle_quality())),
            KeyCode::Char('r') => KeyOutcome::one(Some(browser.cycle_minimum_rating())),
            KeyCode::Char('g') => KeyOutcome::one(browser.cycle_genre()),
            KeyCode::Char('s') => KeyOutcome::one(Some(browser.cycle_sort())),
            KeyCode::Char('o') => KeyOutcome::one(Some(browser.toggle_order())),
            KeyCode::Char('l') => KeyOutcome::one(Some(browser.cycle_page_size())),
            KeyCode::Char('t') => KeyOutcome::one(Some(browser.toggle_rt_ratings())),
            KeyCode::Right | KeyCode::Char('n') => KeyOutcome::one(browser.next_page()),
            KeyCode::Left | KeyCode::Char('p') => KeyOutcome::one(browser.previous_page()),
            KeyCode::Down | KeyCode::Char('j') => {
                browser.select_next();
                KeyOutcome::none()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                browser.select_previous();
                KeyOutcome::none()
            }
            KeyCode::Enter => {
                ui.detail_scroll = 0;
                KeyOutcome::one(browser.open_selected())
            }
            _ => KeyOutcome::none(),
        },
    }
}

fn render(f: &mut ratatui::Frame, browser: &Browser, ui: &UiState) {
    match browser.view() {
        View::List => render_list(f, browser, ui),
        View::Detail => render_detail(f, browser, ui),
    }
}

fn render_list(f: &mut ratatui::Frame, browser: &Browser, ui: &UiState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.size());

    let title = Paragraph::new(Line::from(vec![Span::styled(
        "Movie Catalog",
        Style::default().add_modifier(Modifier::BOLD),
    )]))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, layout[0]);

    render_filters(f, layout[1], browser, ui);

    match browser.list_state() {
        ListState::Idle | ListState::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(loading, layout[2]);
        }
        ListState::Failed(err) => {
            let failed = Paragraph::new(format!("Error: {}", err))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(failed, layout[2]);
        }
        ListState::Ready(_) => {
            let items: Vec<ListItem> = browser
                .movies()
                .iter()
                .map(|movie| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            movie.title.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!(
                            "  {:.1} / 10 | {} | {} min",
                            movie.rating, movie.year, movie.runtime
                        )),
                        Span::styled(
                            format!("  {}", movie.genres.join(", ")),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect();

            if items.is_empty() {
                let none = Paragraph::new("No movies match these filters.")
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(none, layout[2]);
            } else {
                let list = List::new(items)
                    .block(Block::default().borders(Borders::ALL))
                    .highlight_style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                    .highlight_symbol("> ");
                let mut state = ListWidgetState::default().with_selected(Some(browser.selected()));
                f.render_stateful_widget(list, layout[2], &mut state);
            }
        }
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            page_indicator(browser),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(
            "   /: search  q: quality  r: rating  g: genre  s: sort  o: order  \
             l: per page  t: RT  \u{2190}/\u{2192}: page  Enter: details  x: quit",
        ),
    ]))
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, layout[3]);
}

/// Arrows appear only where a move is possible.
fn page_indicator(browser: &Browser) -> String {
    let pagination = browser.pagination();
    let previous = if pagination.current_page() > 1 { "<" } else { " " };
    let next = if pagination.current_page() < pagination.total_pages() {
        ">"
    } else {
        " "
    };
    format!("{} {} {}", previous, pagination.label(), next)
}

fn render_filters(f: &mut ratatui::Frame, area: Rect, browser: &Browser, ui: &UiState) {
    let options = browser.filters();

    let genre = match browser.genre_state() {
        GenreState::Failed(_) => {
            Span::styled("genres unavailable", Style::default().fg(Color::Red))
        }
        GenreState::Idle | GenreState::Loading => {
            Span::styled("loading...", Style::default().fg(Color::DarkGray))
        }
        GenreState::Ready(genres) if genres.is_empty() => {
            Span::styled("none sampled", Style::default().fg(Color::DarkGray))
        }
        GenreState::Ready(_) if options.genre.is_empty() => Span::raw("Any"),
        GenreState::Ready(_) => Span::raw(options.genre.clone()),
    };

    let search_style = if ui.editing_search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search_label = if ui.editing_search { "Search (editing): " } else { "Search: " };

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("Quality: {}   ", options.quality.as_param())),
            Span::raw(format!("Rating: {}+   ", options.minimum_rating)),
            Span::raw("Genre: "),
            genre,
            Span::raw(format!("   Sort: {}   ", options.sort_by.label())),
            Span::raw(format!("Order: {}", options.order_by.as_param())),
        ]),
        Line::from(format!(
            "Per page: {}   RT ratings: {}",
            options.limit,
            if options.with_rt_ratings { "on" } else { "off" }
        )),
        Line::from(vec![
            Span::styled(search_label, search_style),
            Span::styled(options.query_term.clone(), search_style),
        ]),
    ];

    let filters =
        Paragraph::new(lines).block(Block::default().title("Filters").borders(Borders::ALL));
    f.render_widget(filters, area);
}

fn render_detail(f: &mut ratatui::Frame, browser: &Browser, ui: &UiState) {
    let area = f.size();
    let block = Block::default()
        .title("Movie details (Esc to go back)")
        .borders(Borders::ALL);

    let paragraph = match browser.detail_state() {
        DetailState::Idle | DetailState::Loading => {
            Paragraph::new("Loading...").style(Style::default().fg(Color::Yellow))
        }
        DetailState::Failed(err) => {
            Paragraph::new(format!("Error: {}", err)).style(Style::default().fg(Color::Red))
        }
        DetailState::Loaded(movie) => {
            Paragraph::new(detail_lines(movie)).scroll((ui.detail_scroll, 0))
        }
    };

    f.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
}

fn detail_lines(movie: &MovieDetail) -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let summary = &movie.summary;

    let mut lines = vec![
        Line::from(Span::styled(summary.title.clone(), heading.fg(Color::White))),
        Line::from(format!(
            "Rating: {:.1}   Year: {}   Runtime: {} mins",
            summary.rating, summary.year, summary.runtime
        )),
        Line::from(format!("Genres: {}", summary.genres.join(", "))),
        Line::from(format!(
            "Language: {}   Downloads: {}   Likes: {}",
            movie.language.as_deref().unwrap_or("unknown"),
            movie.download_count,
            movie.like_count
        )),
        Line::from(""),
        Line::from(movie.description.clone()),
        Line::from(""),
        Line::from(Span::styled("Cast", heading)),
    ];

    if movie.cast.is_empty() {
        lines.push(Line::from("  (none listed)"));
    }
    for member in &movie.cast {
        lines.push(Line::from(format!("  {} as {}", member.name, member.character_name)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Trailer", heading)));
    lines.push(Line::from(format!(
        "  {}",
        movie.trailer_url().unwrap_or_else(|| "(none)".to_string())
    )));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Downloads", heading)));
    for torrent in &movie.torrents {
        lines.push(Line::from(format!(
            "  {} ({})  {}  seeds {} / peers {}",
            torrent.quality, torrent.kind, torrent.size, torrent.seeds, torrent.peers
        )));
        lines.push(Line::from(Span::styled(
            format!("    {}", torrent.url),
            Style::default().fg(Color::Cyan),
        )));
    }

    lines
}
