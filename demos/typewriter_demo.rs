//! Typewriter demo: paced display of a simulated LLM token stream.
//!
//! A producer thread feeds growing prefixes of a canned response at a
//! bursty, irregular rate (long stalls followed by token floods); the
//! scheduler smooths them into a typewriter cadence. Watch the pacing stay
//! even while the bursts arrive, then accelerate when the backlog grows.

use cadence::{ReleaseScheduler, SchedulerActor, SchedulerCommand, SchedulerConfig};
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::{execute, terminal};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Sample text to stream (simulating an LLM response).
const SAMPLE_TEXT: &str = "I'd be happy to explain how adaptive release scheduling works! \
Text arrives from the model in bursts: sometimes a token every few milliseconds, sometimes \
nothing for half a second. Painting it straight to the screen looks jittery and unreadable. \
Instead, arriving text lands in a pending buffer, and a release cycle moves one word at a \
time to the display on a steady cadence. When the buffer grows past a pressure threshold, \
the cycle shortens its delay and releases several words at once, so the display catches up \
without ever skipping or reordering text. When the stream ends, the buffer drains and the \
displayed text converges exactly on the source.";

/// Chunk lengths (in chars) for the simulated bursts; cycled in order.
const BURST_PATTERN: [usize; 8] = [3, 1, 12, 2, 40, 1, 7, 25];

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();

    execute!(stdout, SetForegroundColor(Color::Cyan))?;
    println!("Cadence Typewriter Demo");
    println!("=======================");
    execute!(stdout, ResetColor)?;
    println!("Bursty input, paced output. Ctrl+C to abort.");
    println!();

    let actor = SchedulerActor::spawn(ReleaseScheduler::new(SchedulerConfig {
        delay: Duration::from_millis(30),
        // Trailing bursts can be tiny; release them without a threshold so
        // the demo always converges.
        min_buffer_size: 1,
        ..SchedulerConfig::default()
    }));

    // Producer: deliver the sample text as irregular bursts of prefixes.
    let feeder = {
        let commands = actor.commands().clone();
        thread::spawn(move || {
            let boundaries: Vec<usize> = SAMPLE_TEXT
                .char_indices()
                .map(|(offset, _)| offset)
                .chain(std::iter::once(SAMPLE_TEXT.len()))
                .collect();

            let mut sent_chars = 0;
            let mut burst = 0;
            while sent_chars < boundaries.len() - 1 {
                sent_chars = (sent_chars + BURST_PATTERN[burst % BURST_PATTERN.len()])
                    .min(boundaries.len() - 1);
                burst += 1;

                let prefix = &SAMPLE_TEXT[..boundaries[sent_chars]];
                if commands
                    .send(SchedulerCommand::Source(prefix.to_owned()))
                    .is_err()
                {
                    return;
                }

                // Stall between bursts; every fourth burst is a long stall.
                let stall = if burst % 4 == 0 { 400 } else { 15 };
                thread::sleep(Duration::from_millis(stall));
            }
        })
    };

    // Observer: print newly committed text as it is released.
    let started = Instant::now();
    let mut printed = 0;
    let mut peak_buffer = 0;
    let mut peak_rate = 0.0f64;

    for snapshot in actor.snapshots().iter() {
        peak_buffer = peak_buffer.max(snapshot.buffer_size);
        peak_rate = peak_rate.max(snapshot.release_rate);

        if snapshot.displayed_text.len() >= printed {
            print!("{}", &snapshot.displayed_text[printed..]);
            printed = snapshot.displayed_text.len();
            stdout.flush()?;
        }

        if snapshot.is_complete && snapshot.displayed_text == SAMPLE_TEXT {
            break;
        }
    }

    let _ = feeder.join();
    actor.join();

    println!();
    println!();
    let status = format!(
        "Done in {:.1}s | peak buffer: {peak_buffer} chars | peak release rate: {peak_rate:.0} chars/s",
        started.elapsed().as_secs_f32()
    );
    let (cols, _rows) = terminal::size().unwrap_or((80, 24));
    execute!(stdout, SetForegroundColor(Color::Green))?;
    println!("{}", clip_to_width(&status, cols as usize));
    execute!(stdout, ResetColor)?;

    Ok(())
}

/// Truncate `text` to at most `max_cols` display columns.
fn clip_to_width(text: &str, max_cols: usize) -> &str {
    if UnicodeWidthStr::width(text) <= max_cols {
        return text;
    }
    let mut end = 0;
    let mut cols = 0;
    for (offset, ch) in text.char_indices() {
        let width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + width > max_cols {
            break;
        }
        cols += width;
        end = offset + ch.len_utf8();
    }
    &text[..end]
}
