// Improvement potential. Redraw only when something changed instead of on every tick.

use std::fmt;
use std::io;
use std::iter;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use chessboard_client::client::{ClickRejection, ClientState, EventError, NotableEvent};
use chessboard_client::coord::Coord;
use chessboard_client::event::AuthorityReply;
use chessboard_client::promotion::PromotionError;
use crossterm::event::{
    self as term_event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::style::{self, Stylize};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use scopeguard::defer;

use crate::client_config::ClientConfig;
use crate::http_authority::HttpAuthority;
use crate::{network, tui};


enum IncomingEvent {
    Authority(AuthorityReply),
    Terminal(term_event::Event),
    Tick,
}

enum Flow {
    Continue,
    Quit,
}

struct InputState {
    keyboard_input: String,
    command_error: Option<String>,
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(
            stdout,
            style::Print(line),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            cursor::MoveToNextLine(1),
            cursor::Hide
        )?;
    }
    Ok(())
}

fn render(
    stdout: &mut io::Stdout, app_start_time: Instant, client_state: &ClientState, input: &InputState,
) -> io::Result<()> {
    execute!(stdout, cursor::MoveTo(0, 0))?;
    for line in tui::render_client(client_state) {
        writeln_raw(stdout, line)?;
    }
    writeln_raw(stdout, "")?;

    // Simulate cursor: real cursor blinking is broken with Show/Hide.
    let show_cursor = app_start_time.elapsed().as_millis() % 1000 >= 500;
    let cursor = if show_cursor { '▂' } else { ' ' };
    let input_with_cursor = format!("> {}{}", input.keyboard_input, cursor);
    let input_style = if client_state.is_awaiting_response() {
        style::Color::DarkGrey
    } else {
        style::Color::White
    };
    writeln_raw(stdout, input_with_cursor.with(input_style))?;
    if let Some(ref err) = input.command_error {
        writeln_raw(stdout, err.clone().with(style::Color::Red))?;
    }
    writeln_raw(
        stdout,
        "Click a square or type it + Enter. [n] new game, [Esc] cancel, [PgUp/PgDn] scroll moves, /quit"
            .with(style::Color::DarkGrey),
    )?;
    // Note. Don't clear the whole screen to avoid blinking.
    execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    Ok(())
}

fn click_rejection_message(rejection: ClickRejection) -> Option<String> {
    match rejection {
        // Input arrives faster than the authority answers; dropping it is enough.
        ClickRejection::AwaitingResponse => None,
        ClickRejection::NotSynced => Some("No game loaded: press 'n' to start a new game".to_owned()),
        ClickRejection::PromotionPending => Some("Choose a piece to promote to first".to_owned()),
        ClickRejection::GameOver => Some("Game over: press 'n' to start a new game".to_owned()),
    }
}

fn click(client_state: &mut ClientState, input: &mut InputState, coord: Coord) {
    input.command_error = client_state.click_square(coord).err().and_then(click_rejection_message);
}

fn process_key(client_state: &mut ClientState, input: &mut InputState, event: KeyEvent) -> Flow {
    if event.kind != KeyEventKind::Press {
        return Flow::Continue;
    }
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            return Flow::Quit;
        }
        KeyCode::Char(ch) if input.keyboard_input.is_empty() && client_state.pending_promotion().is_some() => {
            if let Some(kind) = tui::promotion_choice(ch) {
                input.command_error = match client_state.choose_promotion(kind) {
                    Ok(()) | Err(PromotionError::AwaitingResponse) => None,
                    Err(err) => Some(format!("Cannot promote: {:?}", err)),
                };
            } else {
                input.command_error = Some("Choose q, r, b or k".to_owned());
            }
        }
        KeyCode::Char('n') if input.keyboard_input.is_empty() => {
            input.command_error = client_state
                .new_game()
                .err()
                .map(|_| "Wait for the current request to finish".to_owned());
        }
        KeyCode::Char(ch) => {
            input.keyboard_input.push(ch);
        }
        KeyCode::Backspace => {
            input.keyboard_input.pop();
        }
        KeyCode::Esc => {
            input.keyboard_input.clear();
            input.command_error = None;
            client_state.escape();
        }
        KeyCode::PageUp => client_state.history_mut().scroll_up(tui::HISTORY_HEIGHT - 1),
        KeyCode::PageDown => client_state.history_mut().scroll_down(tui::HISTORY_HEIGHT - 1),
        KeyCode::Enter => {
            let command = input.keyboard_input.trim().to_owned();
            input.keyboard_input.clear();
            if let Some(cmd) = command.strip_prefix('/') {
                match cmd {
                    "quit" => return Flow::Quit,
                    "new" => {
                        input.command_error = client_state
                            .new_game()
                            .err()
                            .map(|_| "Wait for the current request to finish".to_owned());
                    }
                    _ => {
                        input.command_error = Some(format!("Unknown command: '{}'", cmd));
                    }
                }
            } else if !command.is_empty() {
                match Coord::from_algebraic(&command) {
                    Some(coord) => click(client_state, input, coord),
                    None => input.command_error = Some(format!("Not a square: '{}'", command)),
                }
            }
        }
        _ => {}
    }
    Flow::Continue
}

fn process_terminal_event(client_state: &mut ClientState, input: &mut InputState, event: term_event::Event) -> Flow {
    match event {
        term_event::Event::Key(event) => process_key(client_state, input, event),
        term_event::Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => {
            if let Some(coord) = tui::square_at(column, row) {
                click(client_state, input, coord);
            }
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

pub fn run(config: ClientConfig, resume: bool) -> anyhow::Result<()> {
    let authority = HttpAuthority::new(&config)?;
    info!("Playing against {}", authority.base_url());

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx.clone();
    let tx_tick = tx;
    let (requests_tx, requests_rx) = mpsc::channel();
    network::spawn_worker(authority, requests_rx, move |reply| {
        tx_net.send(IncomingEvent::Authority(reply)).is_ok()
    });
    thread::spawn(move || {
        loop {
            match term_event::read() {
                Ok(ev) => {
                    if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    error!("Cannot read terminal input: {}", err);
                    break;
                }
            }
        }
    });
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_millis(100));
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, term_event::EnableMouseCapture, cursor::Hide)?;
    defer! {
        let _ = execute!(io::stdout(), term_event::DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    };
    let app_start_time = Instant::now();

    let mut client_state = ClientState::new(config.piece_glyphs(), requests_tx);
    let mut input = InputState { keyboard_input: String::new(), command_error: None };
    let started = if resume { client_state.resume() } else { client_state.new_game() };
    started.map_err(|err| anyhow::anyhow!("Cannot start: {:?}", err))?;

    for event in rx {
        match event {
            IncomingEvent::Authority(reply) => {
                if let Err(EventError::UnexpectedReply(message)) = client_state.process_authority_reply(reply) {
                    input.command_error = Some(message);
                }
            }
            IncomingEvent::Terminal(event) => {
                if let Flow::Quit = process_terminal_event(&mut client_state, &mut input, event) {
                    return Ok(());
                }
            }
            IncomingEvent::Tick => {
                // Any event triggers repaint, so no additional action is required.
            }
        }
        for event in iter::from_fn(|| client_state.next_notable_event()) {
            match event {
                NotableEvent::GameStarted => {
                    input.command_error = None;
                    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                }
                NotableEvent::MoveCompleted(ev) => {
                    if let Some(capture) = ev.capture {
                        info!("{} captured {}", ev.notation, capture);
                    }
                }
                NotableEvent::PromotionRequired(_) => {}
                NotableEvent::GameOver(result) => {
                    info!("Game over: {}", result);
                }
            }
        }
        render(&mut stdout, app_start_time, &client_state, &input)?;
    }
    anyhow::bail!("Unexpected end of events stream");
}
