//! The interactive session: one board, one event loop.
//!
//! Input lines and ticker events arrive on a single channel and are handled
//! one at a time, so the board is only ever touched from this loop. While the
//! deadline monitor waits for an answer, further ticks are coalesced into one
//! rescan once the open question is resolved.

use crate::cli::{SessionCommand, SessionLine};
use crate::render::{surface_json, surface_table};
use clap::{CommandFactory, Parser};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{Receiver, Sender};
use taskboard_core::board::Board;
use taskboard_core::clock::Clock;
use taskboard_core::config::{Palette, Theme};
use taskboard_core::deadline::compose_display_text;
use taskboard_core::error::AppError;
use taskboard_core::model::{SurfaceId, TaskId};
use taskboard_core::monitor::{DeadlineMonitor, Prompter, TickReport};
use taskboard_core::view::MemorySurfaces;
use time::macros::format_description;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Line(String),
    Tick,
    Closed,
}

/// Reads stdin line by line on a background thread, then reports `Closed`.
pub fn spawn_stdin_reader(sender: Sender<Event>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(Event::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read stdin");
                    break;
                }
            }
        }
        let _ = sender.send(Event::Closed);
    })
}

pub struct Session<C> {
    board: Board<MemorySurfaces>,
    monitor: DeadlineMonitor,
    clock: C,
    aliases: HashMap<String, String>,
    palette: Palette,
    json: bool,
    current: SurfaceId,
    closed: bool,
}

enum Flow {
    Continue,
    Exit,
}

impl<C: Clock> Session<C> {
    pub fn new(
        board: Board<MemorySurfaces>,
        monitor: DeadlineMonitor,
        clock: C,
        theme: Theme,
        aliases: HashMap<String, String>,
        json: bool,
    ) -> Self {
        Self {
            board,
            monitor,
            clock,
            aliases,
            palette: theme.palette(),
            json,
            current: SurfaceId::All,
            closed: false,
        }
    }

    pub fn run(&mut self, events: &Receiver<Event>) -> Result<(), AppError> {
        while !self.closed {
            let Ok(event) = events.recv() else {
                break;
            };
            match event {
                Event::Line(line) => {
                    if let Flow::Exit = self.handle_line(&line, events) {
                        break;
                    }
                }
                Event::Tick => {
                    self.check_deadlines(events);
                }
                Event::Closed => break,
            }
        }
        tracing::debug!("session finished");
        Ok(())
    }

    fn handle_line(&mut self, raw: &str, events: &Receiver<Event>) -> Flow {
        let line = raw.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Flow::Exit;
        }

        if line == "help" || line == "?" {
            print_help();
            return Flow::Continue;
        }

        let args = match split_command_line(line).map(|args| self.expand_alias(args)) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                return Flow::Continue;
            }
        };

        if args.is_empty() {
            return Flow::Continue;
        }

        let parsed = match SessionLine::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                return Flow::Continue;
            }
        };

        if let Err(err) = self.run_command(parsed.command, events) {
            eprintln!("ERROR: {}", err);
        }
        Flow::Continue
    }

    fn expand_alias(&self, args: Vec<String>) -> Vec<String> {
        let Some(expansion) = args.first().and_then(|first| self.aliases.get(first)) else {
            return args;
        };
        match split_command_line(expansion) {
            Ok(mut expanded) => {
                expanded.extend(args.into_iter().skip(1));
                expanded
            }
            Err(err) => {
                tracing::warn!(alias = %args[0], error = %err, "ignoring malformed alias");
                args
            }
        }
    }

    fn run_command(
        &mut self,
        command: SessionCommand,
        events: &Receiver<Event>,
    ) -> Result<(), AppError> {
        match command {
            SessionCommand::Add {
                text,
                section,
                deadline,
            } => {
                let text = text.unwrap_or_default();
                let now = self.clock.now();
                let Some(id) = self.board.add_task(&text, section, deadline.as_deref(), now)
                else {
                    tracing::debug!("ignored blank task submission");
                    return Ok(());
                };
                println!("Added task: {} ({})", self.label(id), id);
                self.check_deadlines(events);
            }
            SessionCommand::Done { id } => {
                if !self.board.complete_task(id) {
                    return Err(task_not_found(id));
                }
                println!("Completed task: {} ({})", self.label(id), id);
            }
            SessionCommand::Reveal { id, surface } => {
                let task = self.board.get_task(id).ok_or_else(|| task_not_found(id))?;
                if !task.completed {
                    return Err(AppError::invalid_input(format!(
                        "{id} is not completed yet"
                    )));
                }
                if !self.board.reveal_delete(surface, id) {
                    return Err(AppError::invalid_input(format!(
                        "{id} is not shown on {surface}"
                    )));
                }
                println!("Delete control shown for {id} on {surface}");
            }
            SessionCommand::Delete { id, surface } => {
                if self.board.get_task(id).is_none() {
                    return Err(task_not_found(id));
                }
                let task = self.board.activate_delete(surface, id).ok_or_else(|| {
                    AppError::invalid_input(format!(
                        "no delete control for {id} on {surface}; complete it and reveal first"
                    ))
                })?;
                println!("Deleted task: {} ({})", task.text, task.id);
            }
            SessionCommand::Deadline { id, datetime } => {
                if self.board.get_task(id).is_none() {
                    return Err(task_not_found(id));
                }
                let now = self.clock.now();
                if self.board.update_deadline(id, &datetime, now) {
                    println!("Updated task: {} ({})", self.label(id), id);
                    self.check_deadlines(events);
                }
            }
            SessionCommand::Show { surface } => {
                if let Some(surface) = surface {
                    self.current = surface;
                }
                self.print_surface(self.current)?;
            }
            SessionCommand::List => self.print_surface(self.current)?,
            SessionCommand::Tick => {
                let report = self.check_deadlines(events);
                if report.is_empty() {
                    println!("No elapsed deadlines");
                }
            }
            SessionCommand::Clock => {
                let format = format_description!("[hour]:[minute]:[second]");
                let now = self.clock.now().to_offset(self.board.settings().offset);
                let rendered = now
                    .format(format)
                    .map_err(|err| AppError::invalid_data(err.to_string()))?;
                println!("Current Time: {rendered}");
            }
        }

        Ok(())
    }

    /// Runs the deadline monitor, rescanning once if ticks arrived while a
    /// question was open.
    fn check_deadlines(&mut self, events: &Receiver<Event>) -> TickReport {
        let mut combined = TickReport::default();
        loop {
            let mut prompter = ChannelPrompter::new(events);
            let report = self.monitor.tick(&mut self.board, &mut prompter, &self.clock);
            for id in &report.deleted {
                println!("Deleted task: {id}");
            }
            for id in &report.rescheduled {
                println!("Updated task: {} ({})", self.label(*id), id);
            }
            combined.escalated.extend(report.escalated);
            combined.deleted.extend(report.deleted);
            combined.rescheduled.extend(report.rescheduled);

            if prompter.closed {
                self.closed = true;
                break;
            }
            if !prompter.ticked {
                break;
            }
        }
        combined
    }

    fn print_surface(&self, surface: SurfaceId) -> Result<(), AppError> {
        let items = self.board.surfaces().items(surface);
        if self.json {
            println!("{}", surface_json(surface, items));
        } else {
            println!("{}", surface_table(surface, items, &self.palette));
        }
        io::stdout().flush()?;
        Ok(())
    }

    fn label(&self, id: TaskId) -> String {
        self.board
            .get_task(id)
            .map(|task| compose_display_text(task, self.board.settings().offset))
            .unwrap_or_default()
    }
}

fn task_not_found(id: TaskId) -> AppError {
    AppError::invalid_input(format!("task not found: {id}"))
}

/// Answers monitor prompts with the next input line from the event channel.
struct ChannelPrompter<'a> {
    events: &'a Receiver<Event>,
    ticked: bool,
    closed: bool,
}

impl<'a> ChannelPrompter<'a> {
    fn new(events: &'a Receiver<Event>) -> Self {
        Self {
            events,
            ticked: false,
            closed: false,
        }
    }

    fn next_line(&mut self, message: &str) -> Result<Option<String>, AppError> {
        if self.closed {
            return Ok(None);
        }
        println!("? {message}");
        io::stdout().flush()?;

        loop {
            match self.events.recv() {
                Ok(Event::Line(line)) => return Ok(Some(line)),
                Ok(Event::Tick) => self.ticked = true,
                Ok(Event::Closed) | Err(_) => {
                    self.closed = true;
                    return Ok(None);
                }
            }
        }
    }
}

impl Prompter for ChannelPrompter<'_> {
    fn confirm(&mut self, message: &str) -> Result<bool, AppError> {
        let answer = self.next_line(&format!("{message} [y/N]"))?;
        Ok(matches!(
            answer.as_deref().map(|value| value.trim().to_ascii_lowercase()).as_deref(),
            Some("y" | "yes")
        ))
    }

    fn input(&mut self, message: &str) -> Result<Option<String>, AppError> {
        self.next_line(message)
    }
}

pub fn print_help() {
    let mut cmd = SessionLine::command();
    let help = cmd.render_help();
    println!("{help}");
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}
