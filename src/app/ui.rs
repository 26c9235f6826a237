use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Sparkline, Table, Wrap},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    app::{
        calc::grid_layout,
        config::Config,
        cycle::CycleBundle,
        utils::format_pct,
    },
    models::{Freshness, IndexSeries, Quote},
};

const INTRADAY_HEIGHT: u16 = 9;

pub fn render(
    frame: &mut Frame,
    bundle: Option<&CycleBundle>,
    config: &Config,
    paused: bool,
    popup_message: &Option<String>,
    error_popup: &Option<String>,
) {
    let series = bundle
        .and_then(|bundle| bundle.index_series().as_ref())
        .filter(|series| !series.is_empty());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(movers_height(config.movers_count)),
            Constraint::Length(if series.is_some() { INTRADAY_HEIGHT } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let now = Local::now();
    frame.render_widget(header(bundle, config, now), chunks[0]);
    frame.render_widget(footer(config, paused), chunks[4]);
    if let Some(series) = series {
        render_intraday(frame, series, chunks[2]);
    }

    match bundle {
        Some(bundle) => {
            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(38),
                    Constraint::Percentage(38),
                    Constraint::Percentage(24),
                ])
                .split(chunks[1]);

            frame.render_widget(
                movers_table("Top Gainers", bundle.movers().gainers(), config, now),
                middle[0],
            );
            frame.render_widget(
                movers_table("Top Losers", bundle.movers().losers(), config, now),
                middle[1],
            );
            frame.render_widget(breadth_panel(bundle), middle[2]);

            let bottom = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(chunks[3]);

            render_heatmap(frame, bundle, config, bottom[0]);
            frame.render_widget(sectors_table(bundle), bottom[1]);
        }
        None => {
            let waiting = Paragraph::new("No market data yet. Press 'r' to fetch.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(waiting, chunks[3]);
        }
    }

    if let Some(message) = popup_message {
        render_popup(frame, message, Color::Cyan);
    }
    if let Some(message) = error_popup {
        render_popup(frame, message, Color::Red);
    }
}

/// Table rows plus borders and header line.
pub fn movers_height(movers_count: usize) -> u16 {
    u16::try_from(movers_count)
        .unwrap_or(u16::MAX)
        .saturating_add(3)
}

/// Close prices above, volume below.
fn render_intraday(frame: &mut Frame, series: &IndexSeries, area: Rect) {
    let title = match (series.last(), series.low(), series.high()) {
        (Some(last), Some(low), Some(high)) => format!(
            "{} intraday (5m) | last {:.2} | range {:.2} - {:.2}",
            series.name(),
            last.close(),
            low,
            high
        ),
        _ => format!("{} intraday (5m)", series.name()),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(inner);

    let trend = match (series.points().first(), series.last()) {
        (Some(first), Some(last)) if last.close() < first.open() => Color::Red,
        _ => Color::Green,
    };

    let prices = series.price_levels();
    frame.render_widget(
        Sparkline::default()
            .data(&prices)
            .style(Style::default().fg(trend)),
        rows[0],
    );

    let volumes = series.volumes();
    frame.render_widget(
        Sparkline::default()
            .data(&volumes)
            .style(Style::default().fg(Color::DarkGray)),
        rows[1],
    );
}

fn header<'a>(bundle: Option<&CycleBundle>, config: &Config, now: DateTime<Local>) -> Paragraph<'a> {
    let mut spans = vec![Span::styled(
        "Market Pulse ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if let Some(bundle) = bundle {
        if let Some(index) = bundle.index() {
            spans.push(Span::raw(format!("| {} {:.2} ", index.name(), index.last())));
            spans.push(Span::styled(
                format_pct(index.change_pct()),
                Style::default().fg(change_color(index.change_pct())),
            ));
            if *index.is_simulated() {
                spans.push(Span::styled(" (sim)", Style::default().fg(Color::Yellow)));
            }
        }

        let (label, color) = data_quality(bundle, config, now);
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(
            " | updated {} via {}",
            bundle.fetched_at().format("%H:%M:%S"),
            config.provider.to_str()
        )));
    }

    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL))
}

/// Banner text: stale beats simulated beats live.
fn data_quality(bundle: &CycleBundle, config: &Config, now: DateTime<Local>) -> (String, Color) {
    if bundle.age(now) > config.stale_after() {
        return (String::from("STALE"), Color::Red);
    }
    if bundle.is_degraded() {
        return (
            format!(
                "DEGRADED: {}/{} simulated",
                bundle.simulated_count(),
                bundle.basket().len()
            ),
            Color::Yellow,
        );
    }
    (String::from("LIVE"), Color::Green)
}

fn footer<'a>(config: &Config, paused: bool) -> Paragraph<'a> {
    let refresh = if paused {
        String::from("auto-refresh paused")
    } else {
        format!("auto-refresh every {}s", config.refresh_interval.as_secs())
    };
    Paragraph::new(format!("q quit | r refresh | p pause/resume | {}", refresh))
        .style(Style::default().fg(Color::DarkGray))
}

fn movers_table<'a>(
    title: &'a str,
    quotes: &[Quote],
    config: &Config,
    now: DateTime<Local>,
) -> Table<'a> {
    let header = Row::new(["Symbol", "Price", "Change", "Data"].map(|h| {
        Cell::from(h).style(Style::default().fg(Color::Yellow))
    }));

    let rows = quotes.iter().map(|quote| {
        let freshness = quote.freshness(now, config.stale_after());
        Row::new([
            Cell::from(quote.symbol().clone()),
            Cell::from(format!("{:.2}", quote.last_price())),
            Cell::from(format_pct(quote.change_pct()))
                .style(Style::default().fg(change_color(quote.change_pct()))),
            Cell::from(freshness.to_str().to_string())
                .style(Style::default().fg(freshness_color(freshness))),
        ])
    });

    let widths = [
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(10),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
}

fn breadth_panel<'a>(bundle: &CycleBundle) -> Paragraph<'a> {
    let breadth = bundle.breadth();
    let lines = vec![
        Line::from(Span::styled(
            format!("Advancing  {}", breadth.advancing()),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!("Declining  {}", breadth.declining()),
            Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(
            format!("Unchanged  {}", breadth.unchanged()),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(format!("Total      {}", breadth.total())),
        Line::from(format!("Simulated  {}", bundle.simulated_count())),
    ];

    Paragraph::new(lines).block(Block::default().title("Breadth").borders(Borders::ALL))
}

fn render_heatmap(frame: &mut Frame, bundle: &CycleBundle, config: &Config, area: Rect) {
    let block = Block::default().title("Heatmap").borders(Borders::ALL);

    let grid = match grid_layout(bundle.basket(), config.grid_rows, config.grid_cols) {
        Ok(grid) => grid,
        Err(overflow) => {
            let message = Paragraph::new(overflow.to_string())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
            return;
        }
    };

    let rows = grid.iter().map(|row| {
        Row::new(row.iter().map(|cell| match cell.symbol() {
            Some(symbol) => {
                let price = bundle
                    .basket()
                    .get(symbol)
                    .map(|quote| format!(" {:.0}", quote.last_price()))
                    .unwrap_or_default();
                Cell::from(format!(
                    "{}{} {}",
                    symbol,
                    price,
                    format_pct(cell.change_pct())
                ))
                .style(Style::default().fg(Color::Black).bg(heat_color(cell.change_pct())))
            }
            None => Cell::from(""),
        }))
    });

    let widths = vec![Constraint::Ratio(1, config.grid_cols.max(1) as u32); config.grid_cols];
    let table = Table::new(rows, widths).column_spacing(1).block(block);
    frame.render_widget(table, area);
}

fn sectors_table<'a>(bundle: &CycleBundle) -> Table<'a> {
    let mut sectors: Vec<(&String, &Decimal)> = bundle.sectors().iter().collect();
    sectors.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let rows = sectors.into_iter().map(|(sector, mean)| {
        let bar_len = mean
            .abs()
            .checked_mul(Decimal::from(4))
            .and_then(|len| len.round().to_usize())
            .unwrap_or(20)
            .min(20);
        Row::new([
            Cell::from(sector.clone()),
            Cell::from("█".repeat(bar_len)).style(Style::default().fg(change_color(mean))),
            Cell::from(format_pct(mean)).style(Style::default().fg(change_color(mean))),
        ])
    });

    let widths = [
        Constraint::Length(16),
        Constraint::Length(20),
        Constraint::Length(9),
    ];

    Table::new(rows, widths).block(
        Block::default()
            .title("Sector Performance")
            .borders(Borders::ALL),
    )
}

fn render_popup(frame: &mut Frame, message: &str, color: Color) {
    let area = centered_rect(50, 20, frame.area());
    let popup = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn change_color(change_pct: &Decimal) -> Color {
    if change_pct.is_zero() {
        Color::Yellow
    } else if change_pct.is_sign_negative() {
        Color::Red
    } else {
        Color::Green
    }
}

fn heat_color(change_pct: &Decimal) -> Color {
    let strong = Decimal::from(2);
    if change_pct.is_zero() {
        Color::Yellow
    } else if *change_pct >= strong {
        Color::Green
    } else if *change_pct > Decimal::ZERO {
        Color::LightGreen
    } else if *change_pct <= -strong {
        Color::Red
    } else {
        Color::LightRed
    }
}

fn freshness_color(freshness: Freshness) -> Color {
    match freshness {
        Freshness::Live => Color::Green,
        Freshness::Simulated => Color::Yellow,
        Freshness::Stale => Color::Red,
    }
}
