//! Interactive console loop. The main thread owns the view and selects over
//! user input lines and backend events; it never waits on the network.

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
    thread,
};

use anyhow::{bail, Context};
use client_core::{AnalysisClient, HttpAnalysisClient};
use crossbeam_channel::{bounded, never, select, unbounded, Receiver};

use crate::{
    backend_bridge::{commands::BackendCommand, runtime},
    config::Settings,
    ui::app::{AnalysisView, ViewAction, HELP_TEXT},
};

const COMMAND_QUEUE_CAPACITY: usize = 16;
const EVENT_QUEUE_CAPACITY: usize = 64;

pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let client: Arc<dyn AnalysisClient> = Arc::new(HttpAnalysisClient::new(&settings.endpoint));
    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = bounded(EVENT_QUEUE_CAPACITY);
    let worker = runtime::launch(client, cmd_rx, ui_tx);

    let mut view = AnalysisView::new(settings, cmd_tx.clone());
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Location analysis ({})", settings.endpoint)?;
    writeln!(stdout, "{HELP_TEXT}")?;
    prompt(&mut stdout)?;

    let mut lines = Some(spawn_line_reader());
    let closed_input: Receiver<io::Result<String>> = never();

    loop {
        let mut input_closed = false;
        let input_rx = lines.as_ref().unwrap_or(&closed_input);
        select! {
            recv(input_rx) -> line => match line {
                Ok(line) => {
                    let line = line.context("failed to read input")?;
                    if view.handle_line(&line) == ViewAction::Quit {
                        break;
                    }
                }
                Err(_) => input_closed = true,
            },
            recv(ui_rx) -> event => match event {
                Ok(event) => view.handle_event(event),
                Err(_) => bail!("backend worker stopped unexpectedly"),
            },
        }

        for block in view.take_output() {
            writeln!(stdout, "{block}")?;
        }
        // End of input: let an in-flight request finish before leaving.
        if input_closed {
            lines = None;
        }
        if lines.is_none() && !view.state().is_submitting() {
            break;
        }
        if lines.is_some() {
            prompt(&mut stdout)?;
        }
    }

    let _ = cmd_tx.send(BackendCommand::Shutdown);
    if worker.join().is_err() {
        tracing::warn!("backend worker panicked during shutdown");
    }
    Ok(())
}

fn spawn_line_reader() -> Receiver<io::Result<String>> {
    let (line_tx, line_rx) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

fn prompt(stdout: &mut impl Write) -> io::Result<()> {
    write!(stdout, "> ")?;
    stdout.flush()
}
