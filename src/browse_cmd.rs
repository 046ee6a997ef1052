use std::io::{BufRead as _, Write as _};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;

use dftrack::dashboard::Dashboard;
use dftrack::pagination::PageRequest;
use dftrack::remote::worker::FetchWorker;
use dftrack::render;

use crate::{Context, DEMO_BANNER};

/// How often the loop wakes to settle filters and collect fetch results.
const TICK: Duration = Duration::from_millis(50);

const HELP: &str = "\
commands:
  /text     filter by name or description
  @text     filter by owner
  n, p      next / previous page
  o <row>   open a dataflow
  r         redraw
  q         quit";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    NameFilter(&'a str),
    OwnerFilter(&'a str),
    Next,
    Prev,
    Open(usize),
    Redraw,
    Quit,
    Help,
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix('/') {
        return Command::NameFilter(text.trim());
    }
    if let Some(text) = line.strip_prefix('@') {
        return Command::OwnerFilter(text.trim());
    }
    match line {
        "n" => Command::Next,
        "p" => Command::Prev,
        "r" | "" => Command::Redraw,
        "q" => Command::Quit,
        _ => line
            .strip_prefix("o ")
            .and_then(|n| n.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .map_or(Command::Help, Command::Open),
    }
}

/// Forward stdin lines to the loop. The channel closes on EOF.
fn spawn_input_reader() -> anyhow::Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("dftrack-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .map_err(|e| anyhow::anyhow!("could not start input reader: {e}"))?;
    Ok(rx)
}

fn dispatch(worker: Option<&FetchWorker>, dashboard: &mut Dashboard, req: PageRequest) {
    let Some(worker) = worker else {
        dashboard.load_demo(DEMO_BANNER);
        return;
    };
    let seq = req.seq;
    if let Err(e) = worker.submit(req) {
        dashboard.complete(seq, Err(e));
    }
}

fn draw(dashboard: &Dashboard) {
    print!("{}", render::screen(&dashboard.snapshot(), Utc::now()));
    print!("> ");
    if let Err(e) = std::io::stdout().flush() {
        tracing::debug!("could not flush stdout: {e}");
    }
}

/// # Errors
///
/// Returns an error if the HTTP client or a helper thread cannot be started.
pub fn cmd_browse(ctx: &Context) -> anyhow::Result<i32> {
    let mut dashboard = ctx.dashboard("", "");
    let worker = if ctx.demo {
        None
    } else {
        let (tokens, fetcher) = ctx.clients()?;
        Some(FetchWorker::spawn(tokens, fetcher)?)
    };
    let input = spawn_input_reader()?;
    let mut input_open = true;

    let req = dashboard.start();
    dispatch(worker.as_ref(), &mut dashboard, req);
    draw(&dashboard);

    loop {
        let mut redraw = false;
        if input_open {
            match input.recv_timeout(TICK) {
                Ok(line) => match parse_command(&line) {
                    Command::Quit => break,
                    Command::NameFilter(text) => {
                        dashboard.set_name_filter(text, Instant::now());
                    }
                    Command::OwnerFilter(text) => {
                        dashboard.set_owner_filter(text, Instant::now());
                    }
                    Command::Next => match dashboard.next_page() {
                        Some(req) => dispatch(worker.as_ref(), &mut dashboard, req),
                        None => eprintln!("[dftrack] no next page"),
                    },
                    Command::Prev => match dashboard.prev_page() {
                        Some(req) => dispatch(worker.as_ref(), &mut dashboard, req),
                        None => eprintln!("[dftrack] already on the first page"),
                    },
                    Command::Open(row) => match dashboard.record(row - 1) {
                        Some(view) => println!("{}", render::detail(view)),
                        None => eprintln!("[dftrack] no row {row} on this page"),
                    },
                    Command::Redraw => redraw = true,
                    Command::Help => println!("{HELP}"),
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => input_open = false,
            }
        } else {
            // Piped input is exhausted: finish outstanding work, then exit.
            if !dashboard.snapshot().loading && dashboard.next_deadline().is_none() {
                break;
            }
            thread::sleep(TICK);
        }

        if let Some(req) = dashboard.tick(Instant::now()) {
            dispatch(worker.as_ref(), &mut dashboard, req);
            redraw = true;
        }
        if let Some(worker) = &worker {
            while let Some(outcome) = worker.try_recv() {
                redraw |= dashboard.complete(outcome.seq, outcome.result);
            }
        }
        if redraw {
            draw(&dashboard);
        }
    }
    println!();
    Ok(0)
}
