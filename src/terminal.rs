//! `ratatui`/`crossterm` terminal rendering: the consumer-side half of the
//! `render` module's pure layout math (§4.6). Draws one table per sample
//! tick and, when `-d` is set, mirrors the same frame to
//! `<outdir>/out-<N>.txt` as plain text.

use std::io::Write;
use std::path::Path;

use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Terminal;

use netbwtop::error::MonitorError;
use netbwtop::render::{ColumnPlan, FlowRow};

pub type Backend = CrosstermBackend<std::io::Stdout>;
pub type Term = Terminal<Backend>;

pub fn init() -> Result<Terminal<Backend>, MonitorError> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

pub fn restore(terminal: &mut Terminal<Backend>) -> Result<(), MonitorError> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

const HEADER: [&str; 7] = ["Src", "Dst", "Proto", "Rx b/s", "Rx p/s", "Tx b/s", "Tx p/s"];

/// Draw one sample tick's rows, honoring the width-break `plan`. Returns the
/// plain-text lines of what was drawn, for the optional file snapshot.
pub fn draw(
    terminal: &mut Terminal<Backend>,
    rows: &[FlowRow],
    plan: ColumnPlan,
) -> Result<Vec<String>, MonitorError> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header_line(plan));
    for row in rows {
        lines.push(row_line(row, plan));
    }

    terminal.draw(|frame| {
        let header_cells = visible_header(plan).into_iter().map(Cell::from);
        let header = Row::new(header_cells).style(Style::new().add_modifier(Modifier::BOLD));

        let table_rows = rows.iter().map(|row| Row::new(visible_cells(row, plan)));
        let widths = column_widths(plan);

        let table = Table::new(table_rows, widths)
            .header(header)
            .block(Block::default().title("netbwtop").borders(Borders::ALL));

        frame.render_widget(table, frame.area());
    })?;

    Ok(lines)
}

fn visible_header(plan: ColumnPlan) -> Vec<&'static str> {
    let mut cols = vec![HEADER[0], HEADER[1]];
    if plan.show_proto {
        cols.push(HEADER[2]);
    }
    if plan.show_rx {
        cols.push(HEADER[3]);
        cols.push(HEADER[4]);
    }
    if plan.show_tx {
        cols.push(HEADER[5]);
        cols.push(HEADER[6]);
    }
    cols
}

fn visible_cells(row: &FlowRow, plan: ColumnPlan) -> Vec<Cell<'static>> {
    let mut cells = vec![Cell::from(row.src.clone()), Cell::from(row.dst.clone())];
    if plan.show_proto {
        cells.push(Cell::from(row.proto.clone()));
    }
    if plan.show_rx {
        cells.push(Cell::from(format!("{:.0}", row.rx_bps)));
        cells.push(Cell::from(format!("{:.1}", row.rx_pps)));
    }
    if plan.show_tx {
        cells.push(Cell::from(format!("{:.0}", row.tx_bps)));
        cells.push(Cell::from(format!("{:.1}", row.tx_pps)));
    }
    cells
}

fn column_widths(plan: ColumnPlan) -> Vec<Constraint> {
    let mut widths = vec![
        Constraint::Length(plan.endpoint_width.max(1)),
        Constraint::Length(plan.endpoint_width.max(1)),
    ];
    if plan.show_proto {
        widths.push(Constraint::Length(6));
    }
    if plan.show_rx {
        widths.push(Constraint::Length(10));
        widths.push(Constraint::Length(8));
    }
    if plan.show_tx {
        widths.push(Constraint::Length(10));
        widths.push(Constraint::Length(8));
    }
    widths
}

fn header_line(plan: ColumnPlan) -> String {
    visible_header(plan).join("\t")
}

fn row_line(row: &FlowRow, plan: ColumnPlan) -> String {
    let mut fields = vec![row.src.clone(), row.dst.clone()];
    if plan.show_proto {
        fields.push(row.proto.clone());
    }
    if plan.show_rx {
        fields.push(format!("{:.0}", row.rx_bps));
        fields.push(format!("{:.1}", row.rx_pps));
    }
    if plan.show_tx {
        fields.push(format!("{:.0}", row.tx_bps));
        fields.push(format!("{:.1}", row.tx_pps));
    }
    fields.join("\t")
}

/// Write `lines` to `<dir>/out-<counter>.txt`, newline-separated.
pub fn write_snapshot(dir: &Path, counter: u64, lines: &[String]) -> Result<(), MonitorError> {
    let path = dir.join(format!("out-{counter}.txt"));
    let mut file = std::fs::File::create(path)?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}
