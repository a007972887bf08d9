use chrono::{Local, NaiveDate, NaiveTime};
use std::io::{self, Write};
use std::sync::Arc;
use work_calendar::{
    Attention, DayTimeline, InMemoryWorkItemStore, MonthGrid, Role, Session, StaticSessionProvider,
    TimelineWindow, WorkBoard, WorkItem, WorkItemDraft, WorkItemId, WorkStatus,
    load_items_from_csv, load_items_from_json, save_items_to_csv, save_items_to_json, telemetry,
};

const CLI_TOKEN: &str = "cli";

fn cli_session(role: Role) -> Session {
    Session::new("local", "local@cli", role)
}

fn short_id(id: &WorkItemId) -> String {
    id.to_string().chars().take(8).collect()
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.chars().count())));
        line.push_str(" |");
    }
    line
}

fn render_items_as_text_table(items: &[WorkItem]) -> String {
    let headers = [
        "id", "date", "time", "shift", "status", "role", "worker", "department", "detail",
    ];
    let rows: Vec<[String; 9]> = items
        .iter()
        .map(|item| {
            [
                short_id(&item.id),
                item.start_time.format("%Y-%m-%d").to_string(),
                item.start_time.format("%H:%M").to_string(),
                item.shift.to_string(),
                item.status.to_string(),
                item.worker_role.clone(),
                item.worker.clone(),
                item.department.clone(),
                item.detail.clone(),
            ]
        })
        .collect();

    // widths in chars so non-ASCII names line up
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn status_mark(entry_status: WorkStatus, attention: Attention) -> char {
    match (entry_status, attention) {
        (_, Attention::PastDue) => '!',
        (WorkStatus::Pending, _) => 'P',
        (WorkStatus::InProgress, _) => 'I',
        (WorkStatus::Complete, _) => 'C',
    }
}

fn render_timeline(timeline: &DayTimeline) -> String {
    const CELL: usize = 2;
    let label_width = 9;
    let width = timeline.total_slots as usize * CELL;

    let mut out = format!(
        "Timeline {} (tracks={}, slots={})\n",
        timeline.date, timeline.track_count, timeline.total_slots
    );

    let mut header = vec![' '; width];
    for hour in &timeline.hour_labels {
        let at = hour.slot as usize * CELL;
        for (offset, ch) in hour.label.chars().take(2).enumerate() {
            if let Some(cell) = header.get_mut(at + offset) {
                *cell = ch;
            }
        }
    }
    out.push_str(&" ".repeat(label_width));
    out.push_str(&header.into_iter().collect::<String>());
    out.push('\n');

    for track in 0..timeline.track_count {
        let mut row = vec!['.'; width];
        for entry in timeline.track_entries(track) {
            let Some(placement) = entry.placement else {
                continue;
            };
            let mark = status_mark(entry.item.status, entry.attention);
            let start = placement.slot_start as usize * CELL;
            let end = (placement.slot_end() as usize * CELL).min(width);
            for cell in &mut row[start..end] {
                *cell = mark;
            }
        }
        out.push_str(&format!("{:<label_width$}", format!("track {}", track + 1)));
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for entry in &timeline.entries {
        let item = &entry.item;
        let visibility = if entry.placement.is_some() {
            ""
        } else {
            " (outside window)"
        };
        out.push_str(&format!(
            "  [track {}] {}-{} {} {} {} - {}{}\n",
            entry.track + 1,
            item.start_time.format("%H:%M"),
            item.estimated_end_time().format("%H:%M"),
            short_id(&item.id),
            item.status,
            item.worker,
            item.detail,
            visibility
        ));
    }
    out
}

fn render_month(grid: &MonthGrid) -> String {
    let mut out = format!("{}-{:02}\n", grid.year, grid.month);
    out.push_str(" Sun    Mon    Tue    Wed    Thu    Fri    Sat\n");
    let mut column = 0;
    for _ in 0..grid.leading_blanks {
        out.push_str("       ");
        column += 1;
    }
    for cell in &grid.days {
        let marker = if cell.is_today { '*' } else { ' ' };
        let open = cell.items.len();
        let text = if open > 0 {
            format!("{}{:>2}({})", marker, cell.date.format("%d"), open)
        } else {
            format!("{}{:>2}", marker, cell.date.format("%d"))
        };
        out.push_str(&format!("{text:<7}"));
        column += 1;
        if column % 7 == 0 {
            out.push('\n');
        }
    }
    if column % 7 != 0 {
        out.push('\n');
    }
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                                       Show this help\n  list [term]                                Show the board (completed work hidden unless searching)\n  add <YYYY-MM-DD> <HH:MM> <role> <worker> <department> <detail...>\n                                             Create a work item\n  edit <id> <YYYY-MM-DD> <HH:MM> <role> <worker> <department> <detail...>\n                                             Replace a work item's fields\n  status <id> <pending|inprogress|complete>  Progress a work item\n  day <YYYY-MM-DD>                           Show the day timeline with lanes\n  month <YYYY-MM>                            Show the month calendar\n  done [term]                                Search completed work (text or D/M/YYYY)\n  role <admin|user>                          Switch the local session role\n  save <json|csv> <path>                     Export work items to disk\n  load <json|csv> <path>                     Replace work items from disk\n  quit|exit                                  Exit\n\nIds may be shortened to any unique prefix."
    );
}

fn resolve_id(store: &InMemoryWorkItemStore, prefix: &str) -> Result<WorkItemId, String> {
    let matches: Vec<WorkItemId> = store
        .snapshot()
        .into_iter()
        .map(|item| item.id)
        .filter(|id| id.to_string().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("No work item matches '{prefix}'.")),
        _ => Err(format!("Id prefix '{prefix}' is ambiguous.")),
    }
}

fn parse_draft<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<WorkItemDraft, String> {
    let (Some(date_s), Some(time_s), Some(role), Some(worker), Some(department)) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err("Missing fields".to_string());
    };
    let detail = parts.collect::<Vec<_>>().join(" ");
    let date = NaiveDate::parse_from_str(date_s, "%Y-%m-%d")
        .map_err(|_| "Invalid date (YYYY-MM-DD)".to_string())?;
    let time =
        NaiveTime::parse_from_str(time_s, "%H:%M").map_err(|_| "Invalid time (HH:MM)".to_string())?;
    Ok(WorkItemDraft::new(date, time, department, detail, worker, role))
}

fn main() {
    if let Err(err) = telemetry::init_tracing("warn") {
        eprintln!("{err}");
    }

    let store = Arc::new(InMemoryWorkItemStore::new());
    let sessions = Arc::new(
        StaticSessionProvider::new().with_session(CLI_TOKEN, cli_session(Role::Admin)),
    );
    let board = WorkBoard::new(store.clone(), sessions.clone());
    let window = TimelineWindow::default();

    println!("Work Calendar (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" => {
                let term = parts.collect::<Vec<_>>().join(" ");
                match board.search_active(CLI_TOKEN, &term) {
                    Ok(items) => println!("{}", render_items_as_text_table(&items)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "add" => match parse_draft(&mut parts) {
                Ok(draft) => match board.create(CLI_TOKEN, draft) {
                    Ok(item) => {
                        println!("Work item created: {}", item.id);
                        println!("{}", render_items_as_text_table(&[item]));
                    }
                    Err(e) => println!("Error: {}", e),
                },
                Err(msg) => {
                    println!("{msg}");
                    println!(
                        "Usage: add <YYYY-MM-DD> <HH:MM> <role> <worker> <department> <detail...>"
                    );
                }
            },
            "edit" => {
                let Some(prefix) = parts.next() else {
                    println!("Usage: edit <id> <YYYY-MM-DD> <HH:MM> <role> <worker> <department> <detail...>");
                    continue;
                };
                let id = match resolve_id(&store, prefix) {
                    Ok(id) => id,
                    Err(msg) => {
                        println!("{msg}");
                        continue;
                    }
                };
                match parse_draft(&mut parts) {
                    Ok(draft) => match board.edit(CLI_TOKEN, id, draft) {
                        Ok(item) => println!("Work item {} updated.", short_id(&item.id)),
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(msg) => println!("{msg}"),
                }
            }
            "status" => {
                let (Some(prefix), Some(status_s)) = (parts.next(), parts.next()) else {
                    println!("Usage: status <id> <pending|inprogress|complete>");
                    continue;
                };
                let status: WorkStatus = match status_s.parse() {
                    Ok(status) => status,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match resolve_id(&store, prefix) {
                    Ok(id) => match board.set_status(CLI_TOKEN, id, status) {
                        Ok(item) => {
                            println!("Status of {} set to {}.", short_id(&item.id), item.status)
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(msg) => println!("{msg}"),
                }
            }
            "day" => {
                let Some(date_s) = parts.next() else {
                    println!("Usage: day <YYYY-MM-DD>");
                    continue;
                };
                let Ok(date) = NaiveDate::parse_from_str(date_s, "%Y-%m-%d") else {
                    println!("Invalid date (YYYY-MM-DD)");
                    continue;
                };
                let now = Local::now().naive_local();
                match board.day_timeline(CLI_TOKEN, date, &window, now) {
                    Ok(timeline) => print!("{}", render_timeline(&timeline)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "month" => {
                let parsed = parts.next().and_then(|s| {
                    let (year, month) = s.split_once('-')?;
                    Some((year.parse::<i32>().ok()?, month.parse::<u32>().ok()?))
                });
                let Some((year, month)) = parsed else {
                    println!("Usage: month <YYYY-MM>");
                    continue;
                };
                let now = Local::now().naive_local();
                match board.month(CLI_TOKEN, year, month, now) {
                    Ok(grid) => print!("{}", render_month(&grid)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "done" => {
                let term = parts.collect::<Vec<_>>().join(" ");
                match board.search_completed(CLI_TOKEN, &term) {
                    Ok(items) if items.is_empty() => println!("No completed work found."),
                    Ok(items) => println!("{}", render_items_as_text_table(&items)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "role" => match parts.next().map(str::parse::<Role>) {
                Some(Ok(role)) => {
                    sessions.insert(CLI_TOKEN, cli_session(role));
                    println!("Session role set to {role}.");
                }
                Some(Err(e)) => println!("{e}"),
                None => println!("Usage: role <admin|user>"),
            },
            "save" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: save <json|csv> <path>");
                    continue;
                };
                let items = store.snapshot();
                let result = match format {
                    "json" => save_items_to_json(&items, path),
                    "csv" => save_items_to_csv(&items, path),
                    _ => {
                        println!("Unknown format '{format}' (json|csv)");
                        continue;
                    }
                };
                match result {
                    Ok(()) => println!("Saved {} work items to {}.", items.len(), path),
                    Err(e) => println!("Save error: {}", e),
                }
            }
            "load" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: load <json|csv> <path>");
                    continue;
                };
                let loaded = match format {
                    "json" => load_items_from_json(path),
                    "csv" => load_items_from_csv(path),
                    _ => {
                        println!("Unknown format '{format}' (json|csv)");
                        continue;
                    }
                };
                match loaded.and_then(|items| {
                    let count = items.len();
                    store.replace_all(items).map(|()| count)
                }) {
                    Ok(count) => println!("Loaded {} work items from {}.", count, path),
                    Err(e) => println!("Load error: {}", e),
                }
            }
            _ => println!("Unknown command '{cmd}'. Type 'help' for commands."),
        }
    }
}
