use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::app::App;
use crate::format::{kickoff_long, kickoff_short};
use crate::model::{Match, MatchStatus};
use crate::route::Route;
use crate::screens::{
    LeagueDetailScreen, LeagueListScreen, LoadState, MatchDetailScreen, MatchFilter,
    PredictionView, Screen,
};

const ACCENT: Color = Color::Rgb(16, 185, 129);
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Header banner
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    draw_header(f, chunks[0]);

    let tick = app.tick;
    match &mut app.screen {
        Screen::LeagueList(screen) => draw_league_list(f, screen, tick, chunks[1]),
        Screen::LeagueDetail(screen) => draw_league_detail(f, screen, tick, chunks[1]),
        Screen::MatchDetail(screen) => draw_match_detail(f, screen, tick, chunks[1]),
    }

    draw_footer(f, &app.route, chunks[2]);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(inner);

    if chunks[0].width < 24 || chunks[0].height < 4 {
        let p = Paragraph::new(Span::styled(
            "⚽ cevix",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        f.render_widget(p, chunks[0]);
    } else {
        let brand = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(Color::White))
            .lines(vec!["cevix".into()])
            .build();
        f.render_widget(brand, chunks[0]);
    }

    let tagline = vec![
        Line::from(""),
        Line::from(Span::styled("⚽", Style::default().fg(ACCENT))),
        Line::from(Span::styled("Pronósticos de Fútbol", Style::default().fg(ACCENT))),
    ];
    f.render_widget(Paragraph::new(tagline), chunks[1]);
}

fn draw_footer(f: &mut Frame, route: &Route, area: Rect) {
    let hints = match route {
        Route::LeagueList => "↑↓ mover · Enter ver partidos · r recargar · q salir",
        Route::LeagueDetail { .. } => {
            "↑↓ mover · Enter ver pronóstico · Tab/a/u/f filtrar · Esc volver · r recargar · q salir"
        }
        Route::MatchDetail { .. } => "Esc volver · r recargar · q salir",
    };
    let p = Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    f.render_widget(p, area);
}

fn draw_loading(f: &mut Frame, tick: usize, area: Rect) {
    let frame = SPINNER[tick % SPINNER.len()];
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Cargando...", frame),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_error(f: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No se pudieron cargar los datos",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            "Pulsa r para reintentar",
            Style::default().fg(ACCENT),
        )),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn draw_notice(f: &mut Frame, text: &str, area: Rect) {
    let p = Paragraph::new(vec![Line::from(""), Line::from(text.to_string())])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn status_badge(status: &MatchStatus) -> Span<'static> {
    let color = if status.is_scheduled() { Color::Yellow } else { Color::Green };
    Span::styled(
        format!(" {} ", status.label()),
        Style::default().fg(Color::Black).bg(color),
    )
}

fn score_or_vs(status: &MatchStatus) -> String {
    match status {
        MatchStatus::Scheduled => "VS".to_string(),
        MatchStatus::Finished { home, away } => format!("{} - {}", home, away),
    }
}

fn back_hint(f: &mut Frame, text: &str, area: Rect) {
    let p = Paragraph::new(Span::styled(format!("← {}", text), Style::default().fg(ACCENT)));
    f.render_widget(p, area);
}

fn draw_league_list(f: &mut Frame, screen: &mut LeagueListScreen, tick: usize, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let title = vec![
        Line::from(Span::styled(
            "Ligas de Fútbol",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Selecciona una liga para ver partidos y pronósticos",
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[0]);

    let leagues = match &screen.leagues {
        LoadState::Loading => return draw_loading(f, tick, chunks[1]),
        LoadState::Failed(message) => return draw_error(f, message, chunks[1]),
        LoadState::Loaded(leagues) if leagues.is_empty() => {
            return draw_notice(f, "No hay ligas disponibles", chunks[1])
        }
        LoadState::Loaded(leagues) => leagues,
    };

    let items: Vec<ListItem> = leagues
        .iter()
        .map(|league| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(format!("{}  ", league.logo)),
                    Span::styled(
                        league.name.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    Span::styled(format!("    {}  ", league.country), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!(" {} ", league.season),
                        Style::default().fg(Color::Black).bg(Color::Cyan),
                    ),
                    Span::styled("  Ver partidos →", Style::default().fg(ACCENT)),
                ]),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" LIGAS ").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray));

    f.render_stateful_widget(list, chunks[1], &mut screen.list);
}

fn match_item(fixture: &Match) -> ListItem<'static> {
    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", fixture.home_logo)),
            Span::styled(
                fixture.home_team.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   {}   ", score_or_vs(&fixture.status)),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                fixture.away_team.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", fixture.away_logo)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("    {}  ", kickoff_short(&fixture.kickoff.naive_local())),
                Style::default().fg(Color::Gray),
            ),
            status_badge(&fixture.status),
        ]),
    ];
    if fixture.status.is_scheduled() {
        lines.push(Line::from(Span::styled("    Ver pronóstico →", Style::default().fg(ACCENT))));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn draw_league_detail(f: &mut Frame, screen: &mut LeagueDetailScreen, tick: usize, area: Rect) {
    let league = match &screen.detail {
        LoadState::Loaded(detail) => detail.league.clone(),
        _ => None,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                                    // Back
            Constraint::Length(if league.is_some() { 4 } else { 0 }), // League banner
            Constraint::Length(3),                                    // Filters
            Constraint::Min(0),                                       // Matches
        ])
        .split(area);

    back_hint(f, "Volver a ligas", chunks[0]);

    if let Some(league) = &league {
        let banner = vec![
            Line::from(vec![
                Span::raw(format!("{}  ", league.logo)),
                Span::styled(
                    league.name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!("    {} • {}", league.country, league.season),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(banner).block(Block::default().borders(Borders::ALL));
        f.render_widget(p, chunks[1]);
    }

    let tabs = Tabs::new(MatchFilter::ALL.iter().map(|filter| filter.label()))
        .select(screen.filter.index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[2]);

    match &screen.detail {
        LoadState::Loading => return draw_loading(f, tick, chunks[3]),
        LoadState::Failed(message) => return draw_error(f, message, chunks[3]),
        LoadState::Loaded(_) => {}
    }

    let items: Vec<ListItem> = screen.visible_matches().into_iter().map(match_item).collect();
    if items.is_empty() {
        return draw_notice(f, "No hay partidos", chunks[3]);
    }

    let title = format!(" PARTIDOS · {} ", screen.league_id);
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray));

    f.render_stateful_widget(list, chunks[3], &mut screen.list);
}

fn draw_match_header(f: &mut Frame, fixture: &Match, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Badge
            Constraint::Length(1), // Date
            Constraint::Min(0),    // Teams
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(status_badge(&fixture.status)).alignment(Alignment::Center),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            kickoff_long(&fixture.kickoff.naive_local()),
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35), // Home
            Constraint::Percentage(30), // Score / VS
            Constraint::Percentage(35), // Away
        ])
        .split(rows[2]);

    for (logo, team, col) in [
        (&fixture.home_logo, &fixture.home_team, cols[0]),
        (&fixture.away_logo, &fixture.away_team, cols[2]),
    ] {
        let side = vec![
            Line::from(""),
            Line::from(logo.clone()),
            Line::from(Span::styled(
                team.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
        ];
        f.render_widget(Paragraph::new(side).alignment(Alignment::Center), col);
    }

    let center = score_or_vs(&fixture.status);
    let center_style = if fixture.status.is_scheduled() {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::White)
    };
    if cols[1].width < 25 || cols[1].height < 4 {
        let p = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(center, center_style.add_modifier(Modifier::BOLD))),
        ])
        .alignment(Alignment::Center);
        f.render_widget(p, cols[1]);
    } else {
        let big = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(center_style)
            .lines(vec![center.into()])
            .alignment(Alignment::Center)
            .build();
        f.render_widget(big, cols[1]);
    }
}

fn draw_prediction(f: &mut Frame, view: &PredictionView, area: Rect) {
    let block = Block::default()
        .title(" Pronóstico ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Winner
            Constraint::Length(6), // Bars
            Constraint::Min(0),    // Analysis
        ])
        .split(inner);

    let prediction = view.prediction;
    let confidence_color = if prediction.confidence.is_high() { Color::Green } else { Color::Yellow };
    let winner = vec![
        Line::from(Span::styled("Resultado más probable", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            prediction.predicted_winner.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" Confianza: {} ", prediction.confidence.label()),
            Style::default().fg(Color::Black).bg(confidence_color),
        )),
    ];
    let p = Paragraph::new(winner)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT)));
    f.render_widget(p, rows[0]);

    let bar_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 3])
        .split(rows[1]);
    let colors = [Color::Green, Color::Yellow, Color::Blue];
    for ((bar, color), row) in view.bars.iter().zip(colors).zip(bar_rows.iter()) {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(*row);
        let label_cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(parts[0]);
        f.render_widget(
            Paragraph::new(Span::styled(
                bar.label.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            label_cols[0],
        );
        f.render_widget(
            Paragraph::new(Span::styled(
                bar.percent_label(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Right),
            label_cols[1],
        );
        let filled = bar.width(parts[1].width);
        let track = Line::from(vec![
            Span::styled("█".repeat(usize::from(filled)), Style::default().fg(color)),
            Span::styled(
                "░".repeat(usize::from(parts[1].width - filled)),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(track), parts[1]);
    }

    let analysis = vec![
        Line::from(Span::styled(
            "Análisis",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(prediction.analysis.clone()),
    ];
    let p = Paragraph::new(analysis)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, rows[2]);
}

fn draw_match_detail(f: &mut Frame, screen: &MatchDetailScreen, tick: usize, area: Rect) {
    let detail = match &screen.detail {
        LoadState::Loading => return draw_loading(f, tick, area),
        LoadState::Failed(message) => return draw_error(f, message, area),
        LoadState::Loaded(detail) => detail,
    };
    let Some(fixture) = &detail.fixture else {
        return draw_notice(f, &format!("Partido no encontrado: {}", screen.match_id), area);
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Back
            Constraint::Length(9), // Match header
            Constraint::Min(0),    // Prediction or notice
        ])
        .split(area);

    back_hint(f, "Volver", chunks[0]);
    draw_match_header(f, fixture, chunks[1]);

    if let Some(view) = detail.prediction_view() {
        return draw_prediction(f, &view, chunks[2]);
    }
    let notice = Rect {
        height: chunks[2].height.min(4),
        ..chunks[2]
    };
    if fixture.status.is_scheduled() {
        draw_notice(f, "Pronóstico no disponible", notice);
    } else {
        draw_notice(f, "Este partido ya ha finalizado", notice);
    }
}
